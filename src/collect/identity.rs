use nix::unistd::{getgid, getuid};

use crate::error::ResultOkLogExt;
use crate::source::FactSource;

/// Identity of the service process.
///
/// `username` and `id_output` come from `whoami` and `id` and are omitted
/// when those commands are unavailable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserInfo {
    pub uid: u32,
    pub gid: u32,
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_output: Option<String>,
}

pub fn collect(source: &dyn FactSource) -> UserInfo {
    UserInfo {
        uid: getuid().as_raw(),
        gid: getgid().as_raw(),
        pid: std::process::id(),
        username: source
            .run_command("whoami", &[])
            .map(|out| out.trim().to_owned())
            .ok_log("username"),
        id_output: source
            .run_command("id", &[])
            .map(|out| out.trim().to_owned())
            .ok_log("id output"),
    }
}
