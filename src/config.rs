use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_SOCKET_PATH: &str = "/run/guest-services/backend.sock";

/// Read-only diagnostic API served over a Unix domain socket.
#[derive(Debug, Clone, Parser)]
#[command(name = "debug-backend", version)]
pub struct Config {
    /// Unix domain socket to listen on.
    #[arg(long = "socket", value_name = "PATH", default_value = DEFAULT_SOCKET_PATH)]
    pub socket_path: PathBuf,
}
