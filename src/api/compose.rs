//! Per-endpoint composition of collector output.
//!
//! Every composer attempts each of its collectors exactly once. A failed
//! collector only removes (or annotates) its own section; composers never fail.

use std::path::Path;

use super::models::{
    EnvResponse, FilesystemResponse, HealthResponse, InfoResponse, NetworkResponse,
    ProcessesResponse, RootResponse, SystemResponse,
};
use crate::clock::{StartTime, format_duration};
use crate::collect::kernel::{self, UnameField};
use crate::collect::{
    cpu, directory, environment, identity, memory, mounts, network, os_release, processes,
};
use crate::error::ResultOkLogExt;
use crate::source::FactSource;

pub const SERVICE_NAME: &str = "debug-backend";

pub const ENDPOINTS: &[&str] = &[
    "/health",
    "/info",
    "/env",
    "/system",
    "/filesystem",
    "/processes",
    "/network",
];

pub fn root() -> RootResponse {
    RootResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    }
}

pub fn health(start: StartTime) -> HealthResponse {
    HealthResponse {
        status: "healthy",
        uptime: format_duration(start.uptime()),
    }
}

pub fn info(source: &dyn FactSource, start: StartTime) -> InfoResponse {
    InfoResponse {
        hostname: network::hostname().ok_log("hostname").unwrap_or_default(),
        pid: std::process::id(),
        user: identity::collect(source),
        working_dir: std::env::current_dir()
            .ok_log("working directory")
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        executable: std::env::current_exe()
            .ok_log("executable path")
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        runtime_version: env!("CARGO_PKG_VERSION"),
        runtime_os: std::env::consts::OS,
        runtime_arch: std::env::consts::ARCH,
        num_cpu: std::thread::available_parallelism()
            .ok_log("available parallelism")
            .map_or(1, usize::from),
        uptime: format_duration(start.uptime()),
    }
}

pub fn env(filter: String) -> EnvResponse {
    let variables = environment::collect(&filter);
    EnvResponse {
        count: variables.len(),
        filter,
        variables,
    }
}

pub fn system(source: &dyn FactSource) -> SystemResponse {
    SystemResponse {
        uname: kernel::uname(source, UnameField::All).ok_log("uname"),
        kernel_name: kernel::uname(source, UnameField::KernelName).ok_log("kernel name"),
        kernel_release: kernel::uname(source, UnameField::KernelRelease).ok_log("kernel release"),
        machine: kernel::uname(source, UnameField::Machine).ok_log("machine"),
        os_release: os_release::collect(source).ok_log("os release"),
        memory: memory::collect(source).ok_log("memory"),
        cpu: cpu::collect(source).ok_log("cpu"),
    }
}

/// Resolves the requested path, defaulting to `/`.
pub fn effective_path(requested: &str) -> &str {
    if requested.is_empty() { "/" } else { requested }
}

/// Lists `path`; the mount table is attached only for the root directory.
///
/// A listing failure is reported in `error` and suppresses everything else.
pub fn filesystem(source: &dyn FactSource, path: &str) -> FilesystemResponse {
    let path = effective_path(path);
    let mut response = FilesystemResponse {
        path: path.to_owned(),
        ..Default::default()
    };

    let entries = match directory::list(Path::new(path)) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("{err}");
            response.error = Some(err.to_string());
            return response;
        }
    };
    response.count = Some(entries.len());
    response.entries = Some(entries);

    if path == "/" {
        response.mounts = mounts::collect(source).ok_log("mounts");
    }
    response
}

pub fn processes(source: &dyn FactSource) -> ProcessesResponse {
    match processes::collect(source) {
        Ok(entries) => ProcessesResponse {
            count: Some(entries.len()),
            processes: Some(entries),
            error: None,
        },
        Err(err) => {
            log::warn!("{err}");
            ProcessesResponse {
                error: Some(format!("Failed to get processes: {err}")),
                ..Default::default()
            }
        }
    }
}

pub fn network(source: &dyn FactSource) -> NetworkResponse {
    NetworkResponse {
        hostname: network::hostname().ok_log("hostname"),
        interfaces: network::interfaces(source).ok_log("interfaces"),
        dns: network::dns(source).ok_log("dns"),
        hosts: network::hosts(source).ok_log("hosts"),
    }
}
