use std::collections::BTreeMap;

/// A single environment variable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnvironmentEntry {
    pub name: String,
    pub value: String,
}

/// Returns the current process environment filtered by `filter`.
///
/// The OS splits each entry at its first `=`, so values keep any further `=`
/// characters. Entries that are not valid UTF-8 are converted lossily.
pub fn collect(filter: &str) -> Vec<EnvironmentEntry> {
    filter_sorted(
        std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        }),
        filter,
    )
}

/// Keeps the variables whose name contains `filter` (case-insensitive)
/// and returns them sorted by name.
///
/// An empty filter keeps everything. A name seen twice keeps its last value.
pub fn filter_sorted(
    vars: impl IntoIterator<Item = (String, String)>,
    filter: &str,
) -> Vec<EnvironmentEntry> {
    let needle = filter.to_lowercase();
    vars.into_iter()
        .filter(|(name, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(name, value)| EnvironmentEntry { name, value })
        .collect()
}
