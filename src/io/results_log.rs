//! Append-only CSV log of per-run match counts

use std::fs::OpenOptions;
use std::io::Write;

/// Append one `"date","count"` line, creating the file on first use.
///
/// The caller supplies the formatted date so runs are testable; the binary
/// passes today's `DD/MM/YYYY`.
pub fn append_match_count(path: &str, date: &str, count: u64) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "\"{date}\",\"{count}\"")
}
