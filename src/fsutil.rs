use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when reading a fact file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read file `{path}`: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reads the whole file at the given path into a [`String`].
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since most fact
/// files are plain ASCII and a stray byte should not hide the rest of the file.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be opened or read.
///
/// # Example
/// ```no_run
/// # use debug_backend::fsutil;
/// let contents = fsutil::read_to_string("/proc/meminfo")?;
/// # Ok::<(), fsutil::FileReadError>(())
/// ```
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
