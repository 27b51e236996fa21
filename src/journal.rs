//! Batch driver: reads a log file line by line and produces the count mapping.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RunSettings;
use crate::error::{JournalError, Result};
use crate::filter::FilterParams;
use crate::output::write_results;
use crate::processor::{process_line, IpCounts, LineOutcome};
use crate::utils::format_count_with_separator;

/// Per-outcome line counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub lines: u64,
    pub counted: u64,
    pub no_match: u64,
    pub bad_timestamp: u64,
    pub outside_window: u64,
    pub outside_subnet: u64,
    pub bad_address: u64,
}

impl ScanSummary {
    pub fn record(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        let slot = match outcome {
            LineOutcome::Counted => &mut self.counted,
            LineOutcome::NoMatch => &mut self.no_match,
            LineOutcome::BadTimestamp => &mut self.bad_timestamp,
            LineOutcome::OutsideWindow => &mut self.outside_window,
            LineOutcome::OutsideSubnet => &mut self.outside_subnet,
            LineOutcome::BadAddress => &mut self.bad_address,
        };
        *slot += 1;
    }

    pub fn dropped(&self) -> u64 {
        self.lines - self.counted
    }

    /// Log the summary at info level.
    pub fn log(&self, distinct: usize) {
        info!(
            "Read {} lines: {} counted, {} dropped, {} distinct addresses",
            format_count_with_separator(self.lines),
            format_count_with_separator(self.counted),
            format_count_with_separator(self.dropped()),
            format_count_with_separator(distinct as u64),
        );
        debug!(
            "Dropped: {} unmatched, {} bad timestamps, {} outside window, {} outside subnet, {} bad addresses",
            self.no_match,
            self.bad_timestamp,
            self.outside_window,
            self.outside_subnet,
            self.bad_address,
        );
    }
}

/// Feed every line of `reader` through the processor.
///
/// Invalid UTF-8 is replaced rather than rejected, and a trailing `\r\n` or
/// `\n` is stripped. Stops at the first processing error.
pub fn process_reader<R: BufRead>(
    mut reader: R,
    counts: &mut IpCounts,
    params: &FilterParams,
) -> std::result::Result<ScanSummary, ProcessError> {
    let mut summary = ScanSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(ProcessError::Read)?;
        if read == 0 {
            break;
        }
        let mut line = String::from_utf8_lossy(&buf);
        if line.ends_with('\n') {
            let trimmed = line.trim_end_matches('\n').trim_end_matches('\r').len();
            line.to_mut().truncate(trimmed);
        }

        let outcome = process_line(&line, counts, params).map_err(|e| ProcessError::Line {
            line: summary.lines + 1,
            source: e,
        })?;
        summary.record(outcome);
    }

    Ok(summary)
}

/// Failure inside [`process_reader`].
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read log: {0}")]
    Read(#[source] std::io::Error),

    #[error("Line {line}: {source}")]
    Line {
        line: u64,
        #[source]
        source: JournalError,
    },
}

/// Read the log at `path` into `counts`.
pub fn read_log(path: &Path, counts: &mut IpCounts, params: &FilterParams) -> Result<ScanSummary> {
    let file = File::open(path).map_err(|e| JournalError::io(path, e))?;
    debug!("Reading log file {:?}", path);

    process_reader(BufReader::new(file), counts, params).map_err(|e| match e {
        ProcessError::Read(source) => JournalError::io(path, source),
        ProcessError::Line { line, source } => {
            debug!("Aborting at {:?} line {}", path, line);
            source
        }
    })
}

/// Read, filter and count the configured log, then write the results.
///
/// The output file is only written when the whole log was processed.
pub fn run(settings: &RunSettings) -> Result<(IpCounts, ScanSummary)> {
    if settings.filter.is_unfiltered() {
        debug!("No filters configured, counting every matching line");
    }

    let mut counts = IpCounts::new();
    let summary = read_log(&settings.file_log, &mut counts, &settings.filter)?;
    summary.log(counts.len());

    write_results(&settings.file_output, &counts)?;
    Ok((counts, summary))
}
