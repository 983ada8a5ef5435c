//! Parser for `os-release(5)` files.

use std::collections::BTreeMap;
use std::path::Path;

use crate::fsutil::FileReadError;
use crate::source::FactSource;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Reads and parses [`OS_RELEASE_PATH`].
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be read.
pub fn collect(source: &dyn FactSource) -> Result<BTreeMap<String, String>, FileReadError> {
    let text = source.read_file(Path::new(OS_RELEASE_PATH))?;
    Ok(parse(&text))
}

/// Parses `KEY=VALUE` lines.
///
/// Blank lines, lines starting with `#` and lines without `=` are skipped.
/// Surrounding double quotes are stripped from values.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_owned(), value.trim_matches('"').to_owned()))
        .collect()
}
