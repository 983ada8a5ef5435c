//! Debug Backend: a read-only diagnostic service for containers.
//!
//! Exposes process, environment, OS, filesystem, process-table and network
//! facts as JSON over HTTP on a local Unix domain socket. Every request reads
//! its sources fresh; a source that cannot be read only removes its own
//! section of the response.
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};

pub mod api;
pub mod clock;
pub mod collect;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod socket;
pub mod source;

pub use error::{Error, Result};

/// Runs the Debug Backend service until it receives SIGINT or SIGTERM.
///
/// # Errors
///
/// Possible errors include:
/// - The socket directory cannot be created.
/// - The socket cannot be bound.
/// - The server fails while accepting connections.
pub async fn run(config: config::Config) -> Result<()> {
    let start = clock::StartTime::now();
    let listener = socket::bind(&config.socket_path)?;
    log::info!(
        "Starting debug backend service on {}",
        config.socket_path.display()
    );

    let state = api::AppState::new(start, Arc::new(source::HostSource));
    let result = api::APIServer::new(state)
        .serve(listener, shutdown_signal())
        .await
        .map_err(Error::Serve);

    if let Err(err) = socket::remove_stale(&config.socket_path) {
        log::warn!("{err}");
    }
    result
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for SIGINT: {}", err);
            std::future::pending::<()>().await;
        }
    };
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                log::warn!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
    log::info!("Shutting down");
}
