//! Process table as reported by `ps aux`.

use serde_json::{Map, Value};

use super::non_blank_lines;
use crate::source::{CommandError, FactSource};

/// One process row keyed by the listing's column headers, in column order.
pub type ProcessEntry = Map<String, Value>;

pub fn collect(source: &dyn FactSource) -> Result<Vec<ProcessEntry>, CommandError> {
    let output = source.run_command("ps", &["aux"])?;
    Ok(parse(&output))
}

/// Parses tabular process output.
///
/// The first non-blank line names the columns. Each following non-blank line
/// yields one entry; the last column absorbs all remaining tokens so commands
/// with arguments stay intact. Rows with fewer fields than headers are dropped.
pub fn parse(text: &str) -> Vec<ProcessEntry> {
    let mut lines = non_blank_lines(text);
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header.split_whitespace().collect();
    let last = headers.len() - 1;

    lines
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < headers.len() {
                return None;
            }
            let mut entry = Map::with_capacity(headers.len());
            for (j, name) in headers.iter().enumerate() {
                let value = if j == last {
                    fields[j..].join(" ")
                } else {
                    fields[j].to_owned()
                };
                entry.insert((*name).to_owned(), Value::String(value));
            }
            Some(entry)
        })
        .collect()
}
