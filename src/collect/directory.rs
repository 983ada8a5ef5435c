//! Non-recursive directory listing with per-entry metadata.

use std::fs::{DirEntry, FileType, Metadata};
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat};

/// Error returned when the directory itself cannot be listed.
#[derive(Debug, thiserror::Error)]
#[error("failed to read directory `{path}`: {source}")]
pub struct ListError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A direct child of a listed directory.
///
/// `size`, `mode` and `mod_time` are omitted when the entry's metadata
/// could not be read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<String>,
}

pub type DirectoryListing = Vec<FileEntry>;

/// Lists the direct children of `path`, sorted by name.
///
/// Symlinks are reported as such and never followed. Entries the OS fails to
/// yield are skipped and logged.
///
/// # Errors
///
/// Returns a [`ListError`] if `path` cannot be opened as a directory.
pub fn list(path: impl AsRef<Path>) -> Result<DirectoryListing, ListError> {
    let path = path.as_ref();
    let read_dir = std::fs::read_dir(path).map_err(|source| ListError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<FileEntry> = read_dir
        .filter_map(|entry| match entry {
            Ok(entry) => Some(file_entry(&entry)),
            Err(err) => {
                log::warn!("skipping unreadable entry in `{}`: {}", path.display(), err);
                None
            }
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn file_entry(entry: &DirEntry) -> FileEntry {
    let file_type = entry.file_type().ok();
    let metadata = match entry.metadata() {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            log::debug!("no metadata for `{}`: {}", entry.path().display(), err);
            None
        }
    };

    FileEntry {
        name: entry.file_name().to_string_lossy().into_owned(),
        is_dir: file_type.is_some_and(|ft| ft.is_dir()),
        kind: file_type.map_or(UNKNOWN_TYPE, type_string),
        size: metadata.as_ref().map(Metadata::len),
        mode: metadata
            .as_ref()
            .map(|m| mode_string(m.file_type(), m.permissions().mode())),
        mod_time: metadata.as_ref().and_then(modification_time),
    }
}

fn modification_time(metadata: &Metadata) -> Option<String> {
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Local>::from(modified).to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Type-only mode string: type letters followed by empty permission slots,
/// e.g. `d---------` for a directory and `Dc---------` for a char device.
fn type_string(file_type: FileType) -> &'static str {
    if file_type.is_dir() {
        "d---------"
    } else if file_type.is_symlink() {
        "L---------"
    } else if file_type.is_fifo() {
        "p---------"
    } else if file_type.is_socket() {
        "S---------"
    } else if file_type.is_char_device() {
        "Dc---------"
    } else if file_type.is_block_device() {
        "D---------"
    } else if file_type.is_file() {
        "----------"
    } else {
        UNKNOWN_TYPE
    }
}

const UNKNOWN_TYPE: &str = "?---------";

fn type_char(file_type: FileType) -> char {
    if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_fifo() {
        'p'
    } else if file_type.is_socket() {
        's'
    } else if file_type.is_char_device() {
        'c'
    } else if file_type.is_block_device() {
        'b'
    } else {
        '-'
    }
}

/// Renders permission bits the way `ls -l` does, e.g. `drwxr-xr-x`.
pub fn mode_string(file_type: FileType, mode: u32) -> String {
    permission_string(type_char(file_type), mode)
}

fn permission_string(type_char: char, mode: u32) -> String {
    const RWX: [char; 3] = ['r', 'w', 'x'];
    let mut out = [type_char, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    for (i, slot) in out[1..].iter_mut().enumerate() {
        if mode & (0o400 >> i) != 0 {
            *slot = RWX[i % 3];
        }
    }

    // setuid, setgid, sticky replace the execute slot of their class
    for (bit, idx, set, unset) in [
        (0o4000, 3, 's', 'S'),
        (0o2000, 6, 's', 'S'),
        (0o1000, 9, 't', 'T'),
    ] {
        if mode & bit != 0 {
            out[idx] = if out[idx] == 'x' { set } else { unset };
        }
    }
    out.iter().collect()
}
