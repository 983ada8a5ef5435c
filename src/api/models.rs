//! Response bodies, one per endpoint.
//!
//! Optional sections are omitted from the JSON when their source failed.

use std::collections::BTreeMap;

use crate::collect::{
    CpuInfo, DnsConfig, EnvironmentEntry, FileEntry, InterfaceEntry, MountEntry, ProcessEntry,
    UserInfo,
};

#[derive(Debug, serde::Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub hostname: String,
    pub pid: u32,
    pub user: UserInfo,
    pub working_dir: String,
    pub executable: String,
    pub runtime_version: &'static str,
    #[serde(rename = "runtimeOS")]
    pub runtime_os: &'static str,
    pub runtime_arch: &'static str,
    #[serde(rename = "numCPU")]
    pub num_cpu: usize,
    pub uptime: String,
}

#[derive(Debug, serde::Serialize)]
pub struct EnvResponse {
    pub count: usize,
    pub filter: String,
    pub variables: Vec<EnvironmentEntry>,
}

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_release: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
}

/// Either `error` or `entries` with `count` is present, never both.
#[derive(Debug, Default, serde::Serialize)]
pub struct FilesystemResponse {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<FileEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Vec<MountEntry>>,
}

#[derive(Debug, Default, serde::Serialize)]
pub struct ProcessesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<ProcessEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, serde::Serialize)]
pub struct NetworkResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<InterfaceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}
