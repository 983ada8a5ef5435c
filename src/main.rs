use clap::Parser;

/// Entry point for the Debug Backend diagnostic service.
///
/// Parses the command line, initializes logging and serves the diagnostic
/// API on the configured Unix domain socket. Log verbosity defaults to `info`
/// and can be changed with `RUST_LOG`.
///
/// Exits with status 1 if the socket cannot be set up or the server fails.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cargo run -- --socket /tmp/debug-backend.sock
/// curl --unix-socket /tmp/debug-backend.sock http://localhost/system
/// ```
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = debug_backend::config::Config::parse();

    if let Err(err) = debug_backend::run(config).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
