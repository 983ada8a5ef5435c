use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use debug_backend::api::{APIServer, AppState};
use debug_backend::clock::StartTime;
use debug_backend::socket;
use debug_backend::source::HostSource;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::UnixStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    _dir: tempfile::TempDir,
    path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run/backend.sock");
        let listener = socket::bind(&path).expect("bind socket");
        let state = AppState::new(StartTime::now(), Arc::new(HostSource));
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(APIServer::new(state).serve(listener, async {
            let _ = rx.await;
        }));
        Self {
            _dir: dir,
            path,
            shutdown: Some(tx),
            handle,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.expect("server task").expect("server result");
    }
}

async fn get_json(socket: &Path, uri: &str) -> (StatusCode, Value) {
    let stream = UnixStream::connect(socket).await.expect("connect");
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .expect("handshake");
    tokio::spawn(conn);

    let request = hyper::Request::builder()
        .uri(uri)
        .header(hyper::header::HOST, "localhost")
        .body(Body::empty())
        .expect("request");
    let response = sender.send_request(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn serves_health_over_unix_socket() {
    let server = TestServer::start().await;

    let (status, json) = get_json(&server.path, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");

    server.stop().await;
}

#[tokio::test]
async fn lists_directory_over_unix_socket() {
    let server = TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one"), "1").unwrap();
    std::fs::create_dir(dir.path().join("two")).unwrap();

    let uri = format!("/filesystem?path={}", dir.path().display());
    let (status, json) = get_json(&server.path, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["entries"][0]["name"], "one");
    assert_eq!(json["entries"][1]["isDir"], true);
    assert!(json.get("mounts").is_none());

    let (_, again) = get_json(&server.path, &uri).await;
    assert_eq!(json["entries"], again["entries"]);

    server.stop().await;
}

#[tokio::test]
async fn every_endpoint_answers_ok() {
    let server = TestServer::start().await;

    for uri in [
        "/",
        "/health",
        "/info",
        "/env",
        "/system",
        "/filesystem",
        "/processes",
        "/network",
    ] {
        let (status, json) = get_json(&server.path, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(json.is_object(), "{uri}");
    }

    server.stop().await;
}

#[tokio::test]
async fn socket_is_world_accessible() {
    use std::os::unix::fs::PermissionsExt;

    let server = TestServer::start().await;
    let mode = std::fs::metadata(&server.path)
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o666);
    server.stop().await;
}
