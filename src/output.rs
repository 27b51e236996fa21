//! Result sink: writes the count mapping as `<address>: <count>` lines.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{JournalError, Result};
use crate::processor::IpCounts;
use crate::validation::parse_log_address;

/// Entries ordered by numeric address, with keys that are not valid IPv4
/// addresses after them in lexicographic order.
pub fn sorted_entries(counts: &IpCounts) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by_cached_key(|(addr, _)| {
        let parsed = parse_log_address(addr);
        (parsed.is_none(), parsed, addr.to_string())
    });
    entries
}

/// Render the mapping, one `<address>: <count>` line per entry.
pub fn format_results(counts: &IpCounts) -> String {
    let mut out = String::new();
    for (addr, count) in sorted_entries(counts) {
        out.push_str(addr);
        out.push_str(": ");
        out.push_str(&count.to_string());
        out.push('\n');
    }
    out
}

/// Write the mapping to `path` atomically.
///
/// Content goes to a temporary file in the destination directory which is
/// renamed over `path` only once fully written and synced.
pub fn write_results(path: &Path, counts: &IpCounts) -> Result<()> {
    info!("Writing {} addresses to {:?}", counts.len(), path);

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| JournalError::io(parent, e))?;

    temp_file
        .write_all(format_results(counts).as_bytes())
        .map_err(|e| JournalError::io(path, e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| JournalError::io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| JournalError::io(path, e.error))?;

    Ok(())
}
