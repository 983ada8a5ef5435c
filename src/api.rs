use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::UnixListener;
use tower_http::catch_panic::CatchPanicLayer;

use crate::clock::{StartTime, format_duration};
use crate::source::FactSource;

pub mod compose;
pub mod models;

/// Immutable state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    start: StartTime,
    source: Arc<dyn FactSource>,
}

impl AppState {
    pub fn new(start: StartTime, source: Arc<dyn FactSource>) -> Self {
        Self { start, source }
    }
}

/// Raw query pairs in request order. Repeated keys are kept so that a
/// duplicate parameter never rejects the request.
type QueryPairs = Query<Vec<(String, String)>>;

/// First value of `key`, or an empty string when absent.
fn first_param(pairs: Vec<(String, String)>, key: &str) -> String {
    pairs
        .into_iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

async fn root() -> Response {
    Json(compose::root()).into_response()
}

async fn health(State(state): State<AppState>) -> Response {
    Json(compose::health(state.start)).into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    blocking(move || compose::info(state.source.as_ref(), state.start)).await
}

async fn env(Query(pairs): QueryPairs) -> Response {
    Json(compose::env(first_param(pairs, "filter"))).into_response()
}

async fn system(State(state): State<AppState>) -> Response {
    blocking(move || compose::system(state.source.as_ref())).await
}

async fn filesystem(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let path = first_param(pairs, "path");
    blocking(move || compose::filesystem(state.source.as_ref(), &path)).await
}

async fn processes(State(state): State<AppState>) -> Response {
    blocking(move || compose::processes(state.source.as_ref())).await
}

async fn network(State(state): State<AppState>) -> Response {
    blocking(move || compose::network(state.source.as_ref())).await
}

/// Runs a composer on the blocking pool; collectors read files and spawn
/// processes.
async fn blocking<F, T>(compose: F) -> Response
where
    F: FnOnce() -> T + Send + 'static,
    T: serde::Serialize + Send + 'static,
{
    match tokio::task::spawn_blocking(compose).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            log::error!("diagnostic task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "diagnostic task failed").into_response()
        }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();
    let response = next.run(request).await;
    log::info!(
        "method={}, uri={}, status={}, latency={}",
        method,
        uri,
        response.status().as_u16(),
        format_duration(started.elapsed())
    );
    response
}

/// Builds the routing table for all diagnostic endpoints.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/env", get(env))
        .route("/system", get(system))
        .route("/filesystem", get(filesystem))
        .route("/processes", get(processes))
        .route("/network", get(network))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: router(state),
        }
    }

    /// Serves requests on `listener` until `shutdown` resolves, then waits for
    /// in-flight requests to finish.
    pub async fn serve(
        self,
        listener: UnixListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
