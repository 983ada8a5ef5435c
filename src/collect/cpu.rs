use std::path::Path;

use crate::fsutil::FileReadError;
use crate::source::FactSource;

pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Logical CPU count and model as reported by `/proc/cpuinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct CpuInfo {
    pub count: usize,
    pub model: String,
}

pub fn collect(source: &dyn FactSource) -> Result<CpuInfo, FileReadError> {
    let text = source.read_file(Path::new(CPUINFO_PATH))?;
    Ok(parse(&text))
}

/// Counts `processor` lines and takes the first `model name` value.
pub fn parse(text: &str) -> CpuInfo {
    let mut info = CpuInfo::default();
    for line in text.lines() {
        if line.starts_with("processor") {
            info.count += 1;
        }
        match line.split_once(':') {
            Some((key, model)) if info.model.is_empty() && key.starts_with("model name") => {
                info.model = model.trim().to_owned();
            }
            _ => {}
        }
    }
    info
}
