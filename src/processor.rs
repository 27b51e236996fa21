//! Per-line extraction and filtering.
//!
//! Each log line is matched against one fixed shape: an IPv4-looking token,
//! a run of whitespace or colons, then a `dd.MM.yyyy HH:mm:ss` timestamp.
//! The first match on the line wins and everything else is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{JournalError, Result};
use crate::filter::FilterParams;
use crate::utils::truncate;
use crate::validation::{ip_to_u32, parse_log_address, parse_timestamp};

/// Occurrence counts keyed by the address text found in the log.
pub type IpCounts = HashMap<String, u64>;

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})[\s:]+([0-9]{2}\.[0-9]{2}\.[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2})",
    )
    .expect("line pattern regex is valid")
});

/// Address and timestamp text pulled out of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogMatch<'a> {
    pub address: &'a str,
    pub timestamp: &'a str,
}

/// What happened to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOutcome {
    /// Passed every filter and was counted
    Counted,
    /// Did not contain an address followed by a timestamp
    NoMatch,
    /// Timestamp matched the pattern but is not a real date/time
    BadTimestamp,
    /// Timestamp outside the configured window
    OutsideWindow,
    /// Address outside the configured subnet
    OutsideSubnet,
    /// Address-shaped token with an octet above 255, seen by the subnet check
    BadAddress,
}

impl LineOutcome {
    pub fn is_counted(self) -> bool {
        matches!(self, Self::Counted)
    }
}

/// Find the first address/timestamp pair on `line`.
///
/// # Examples
/// ```
/// use ipjournal::processor::extract;
/// let m = extract("10.0.0.1: 01.01.2020 12:34:56 GET /").unwrap();
/// assert_eq!(m.address, "10.0.0.1");
/// assert_eq!(m.timestamp, "01.01.2020 12:34:56");
/// assert!(extract("no address here").is_none());
/// ```
pub fn extract(line: &str) -> Option<LogMatch<'_>> {
    let caps = LINE_PATTERN.captures(line)?;
    Some(LogMatch {
        address: caps.get(1)?.as_str(),
        timestamp: caps.get(2)?.as_str(),
    })
}

/// Check `address` against the configured subnet.
///
/// Returns the drop reason when the address falls outside, or `None` when it
/// passes (including when no subnet is configured). A start address with a
/// missing or out-of-range mask length is a configuration fault and fails.
fn subnet_drop(address: &str, params: &FilterParams) -> Result<Option<LineOutcome>> {
    let Some(start) = params.start_address else {
        return Ok(None);
    };

    let mask = match (params.mask, params.mask_length) {
        (Some(mask), Some(len)) if (1..=32).contains(&len) => mask,
        (_, len) => {
            return Err(JournalError::InvalidMask(format!(
                "subnet filter on {} needs a mask length between 1 and 32, got {}",
                start,
                len.map_or_else(|| "none".to_string(), |l| l.to_string())
            )))
        }
    };

    let Some(observed) = parse_log_address(address) else {
        return Ok(Some(LineOutcome::BadAddress));
    };

    if ip_to_u32(observed) & mask == ip_to_u32(start) & mask {
        Ok(None)
    } else {
        Ok(Some(LineOutcome::OutsideSubnet))
    }
}

/// Run one line through extraction and the filters, counting it on success.
///
/// Dropped lines leave `counts` untouched and are reported through the
/// returned [`LineOutcome`]. The only error is a misconfigured subnet mask,
/// which recurs on every line and should end the batch.
pub fn process_line(line: &str, counts: &mut IpCounts, params: &FilterParams) -> Result<LineOutcome> {
    let Some(found) = extract(line) else {
        debug!("Line does not match the expected pattern: {}", truncate(line, 120));
        return Ok(LineOutcome::NoMatch);
    };

    let Some(timestamp) = parse_timestamp(found.timestamp) else {
        warn!("Invalid timestamp in log line: {}", found.timestamp);
        return Ok(LineOutcome::BadTimestamp);
    };

    if !params.in_window(&timestamp) {
        debug!("{} at {} is outside the time window", found.address, timestamp);
        return Ok(LineOutcome::OutsideWindow);
    }

    if let Some(dropped) = subnet_drop(found.address, params)? {
        debug!("{} dropped by subnet filter: {:?}", found.address, dropped);
        return Ok(dropped);
    }

    *counts.entry(found.address.to_string()).or_insert(0) += 1;
    Ok(LineOutcome::Counted)
}
