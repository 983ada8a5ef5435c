//! Unix domain socket setup.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::net::UnixListener;

/// Errors that prevent the service socket from being created.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create socket directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove stale socket `{path}`: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to bind socket `{path}`: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Permissions applied to the bound socket so any local peer may connect.
const SOCKET_MODE: u32 = 0o666;

/// Binds a listener at `path`.
///
/// Creates the parent directory if missing and removes a stale socket file
/// left by a previous run. Failing to relax the socket permissions is only
/// logged.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// - [`Error::CreateDir`] if the parent directory cannot be created.
/// - [`Error::RemoveStale`] if an existing file at `path` cannot be removed.
/// - [`Error::Bind`] if binding fails.
pub fn bind(path: impl AsRef<Path>) -> Result<UnixListener> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    remove_stale(path)?;

    let listener = UnixListener::bind(path).map_err(|source| Error::Bind {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(err) =
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(SOCKET_MODE))
    {
        log::warn!("Failed to chmod socket `{}`: {}", path.display(), err);
    }

    Ok(listener)
}

/// Removes whatever occupies `path`, including a directory tree, ignoring a
/// missing path.
pub fn remove_stale(path: &Path) -> Result<()> {
    let removed = match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(err) => Err(err),
    };
    match removed {
        Ok(()) => {
            log::debug!("Removed stale socket `{}`", path.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::RemoveStale {
            path: path.to_path_buf(),
            source,
        }),
    }
}
