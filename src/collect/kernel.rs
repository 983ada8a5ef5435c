//! Kernel identification via `uname(1)`.

use crate::source::{CommandError, FactSource};

/// Which `uname` field to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnameField {
    All,
    KernelName,
    KernelRelease,
    Machine,
}

impl UnameField {
    fn flag(self) -> &'static str {
        match self {
            UnameField::All => "-a",
            UnameField::KernelName => "-s",
            UnameField::KernelRelease => "-r",
            UnameField::Machine => "-m",
        }
    }
}

/// Runs `uname` for a single field and returns its trimmed output.
pub fn uname(source: &dyn FactSource, field: UnameField) -> Result<String, CommandError> {
    source
        .run_command("uname", &[field.flag()])
        .map(|out| out.trim().to_owned())
}
