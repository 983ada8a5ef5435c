//! Mount table parser for Linux systems.
//!
//! Parses lines in `/proc/mounts` (`fstab(5)`) format: device, mount point,
//! filesystem type, options, then the dump and pass fields which are ignored.

use std::path::Path;

use crate::fsutil::FileReadError;
use crate::source::FactSource;

pub const MOUNTS_PATH: &str = "/proc/mounts";

/// A parsed mount table line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountEntry {
    /// Mounted device or pseudo source (e.g. `/dev/sda1`, `proc`).
    pub device: String,
    /// Where the filesystem is mounted.
    pub mount_point: String,
    /// Filesystem type (e.g. `ext4`, `overlay`).
    pub fs_type: String,
    /// Comma-separated mount options.
    pub options: String,
}

/// Named fields in a mount table line.
#[derive(Debug)]
pub enum MountField {
    Device,
    MountPoint,
    FsType,
    Options,
}

impl std::fmt::Display for MountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MountField::Device => "device",
            MountField::MountPoint => "mount_point",
            MountField::FsType => "fs_type",
            MountField::Options => "options",
        };
        write!(f, "{name}")
    }
}

/// Errors that may occur when parsing a mount table line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing `{field}` in line: `{line}`")]
    MissingField { field: MountField, line: String },
}

/// Reads and parses [`MOUNTS_PATH`].
///
/// # Errors
///
/// Returns a [`FileReadError`] if the mount table cannot be read.
pub fn collect(source: &dyn FactSource) -> Result<Vec<MountEntry>, FileReadError> {
    let text = source.read_file(Path::new(MOUNTS_PATH))?;
    Ok(parse(&text))
}

/// Parses every well-formed line, in source order.
///
/// Lines with fewer than four fields (including blank lines) are skipped.
pub fn parse(text: &str) -> Vec<MountEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_mount_line(line) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("skipping mount line: {err}");
                None
            }
        })
        .collect()
}

/// Parses a single mount table line.
///
/// # Errors
///
/// Returns [`ParseError::MissingField`] naming the first absent field.
pub fn parse_mount_line(line: &str) -> Result<MountEntry, ParseError> {
    let mut fields = line.split_whitespace();
    let mut next = |field: MountField| {
        fields
            .next()
            .map(str::to_owned)
            .ok_or_else(|| ParseError::MissingField {
                field,
                line: line.to_owned(),
            })
    };

    Ok(MountEntry {
        device: next(MountField::Device)?,
        mount_point: next(MountField::MountPoint)?,
        fs_type: next(MountField::FsType)?,
        options: next(MountField::Options)?,
    })
}
