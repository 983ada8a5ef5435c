//! Summary of `/proc/meminfo`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::fsutil::FileReadError;
use crate::source::FactSource;

pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// Line prefixes reported by [`parse`]; everything else is ignored.
const FIELDS: [&str; 5] = ["MemTotal:", "MemFree:", "MemAvailable:", "Buffers:", "Cached:"];

/// Reads and parses [`MEMINFO_PATH`].
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be read.
pub fn collect(source: &dyn FactSource) -> Result<BTreeMap<String, String>, FileReadError> {
    let text = source.read_file(Path::new(MEMINFO_PATH))?;
    Ok(parse(&text))
}

/// Extracts the recognized fields, keyed by label without the trailing `:`.
///
/// Values keep their unit, e.g. `"16315000 kB"`.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        if !FIELDS.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else {
            continue;
        };
        let value = parts.collect::<Vec<_>>().join(" ");
        if value.is_empty() {
            continue;
        }
        out.insert(label.trim_end_matches(':').to_owned(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:       16315000 kB
MemFree:         1234567 kB
MemAvailable:    9876543 kB
Buffers:          123456 kB
Cached:          4567890 kB
SwapCached:            0 kB
Active:          7654321 kB
HugePages_Total:       0
";

    #[test]
    fn test_parse_selects_known_fields() {
        let parsed = parse(MEMINFO);
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed["MemTotal"], "16315000 kB");
        assert_eq!(parsed["Cached"], "4567890 kB");
        assert!(!parsed.contains_key("SwapCached"));
        assert!(!parsed.contains_key("Active"));
    }

    #[test]
    fn test_parse_skips_label_without_value() {
        let parsed = parse("MemTotal:\nMemFree: 10 kB\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["MemFree"], "10 kB");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }
}
