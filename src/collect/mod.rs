//! System-fact collectors.
//!
//! Each collector reads exactly one category of OS-level fact and returns
//! either a structured record or an error. Collectors never decide how a
//! failure is presented; that is up to the composer in [`crate::api`].
pub mod cpu;
pub mod directory;
pub mod environment;
pub mod identity;
pub mod kernel;
pub mod memory;
pub mod mounts;
pub mod network;
pub mod os_release;
pub mod processes;

pub use cpu::CpuInfo;
pub use directory::{DirectoryListing, FileEntry};
pub use environment::EnvironmentEntry;
pub use identity::UserInfo;
pub use mounts::MountEntry;
pub use network::{DnsConfig, InterfaceEntry};
pub use processes::ProcessEntry;

/// Iterates over the lines of `text` that are not blank after trimming.
pub(crate) fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}
