//! Raw fact sources used by the collectors.
//!
//! Collectors never touch `std::fs` or `std::process` for their text inputs
//! directly; they go through [`FactSource`] so the parsing and composition
//! logic can be exercised against canned content.

use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::fsutil::{self, FileReadError};

/// Errors produced when running an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Read-only access to the text sources the collectors parse.
pub trait FactSource: Send + Sync {
    /// Reads a whole fact file (e.g. `/proc/meminfo`).
    fn read_file(&self, path: &Path) -> Result<String, FileReadError>;

    /// Runs `program` with `args` and returns its standard output.
    ///
    /// A non-zero exit status is an error even when output was produced.
    fn run_command(&self, program: &str, args: &[&str]) -> Result<String, CommandError>;
}

/// [`FactSource`] backed by the local filesystem and process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSource;

impl FactSource for HostSource {
    fn read_file(&self, path: &Path) -> Result<String, FileReadError> {
        fsutil::read_to_string(path)
    }

    fn run_command(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                command: display_command(program, args),
                source,
            })?;
        if !output.status.success() {
            return Err(CommandError::Failed {
                command: display_command(program, args),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
