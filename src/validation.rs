//! Centralized parsing and validation of filter inputs.
//!
//! This module provides the primitives shared by the filter builder and the
//! line processor:
//! - IPv4 addresses and their 32-bit numeric form
//! - Subnet mask lengths and masks
//! - Timestamps in the `dd.MM.yyyy` / `dd.MM.yyyy HH:mm:ss` formats

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use ipnet::Ipv4Net;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;

use crate::error::{JournalError, Result};

/// Accepted timestamp layouts, date-only first.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Fixed-width shape of an accepted timestamp. chrono alone would also take
/// single-digit days and months.
static TIMESTAMP_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}(?: [0-9]{2}:[0-9]{2}:[0-9]{2})?$")
        .expect("timestamp shape regex is valid")
});

/// Parse a dotted-decimal IPv4 address supplied as parameter `param`.
///
/// # Examples
/// ```
/// use ipjournal::validation::validate_ipv4;
/// assert!(validate_ipv4("address-start", "192.168.1.1").is_ok());
/// assert!(validate_ipv4("address-start", "::1").is_err());
/// assert!(validate_ipv4("address-start", "invalid").is_err());
/// ```
pub fn validate_ipv4(param: &'static str, value: &str) -> Result<Ipv4Addr> {
    value.parse().map_err(|_| JournalError::InvalidAddress {
        param,
        value: value.to_string(),
    })
}

/// Parse a mask length, which must be an integer in `1..=32`.
///
/// # Examples
/// ```
/// use ipjournal::validation::validate_mask_length;
/// assert_eq!(validate_mask_length("24").unwrap(), 24);
/// assert!(validate_mask_length("0").is_err());
/// assert!(validate_mask_length("33").is_err());
/// ```
pub fn validate_mask_length(value: &str) -> Result<u8> {
    match value.parse::<u8>() {
        Ok(len) if (1..=32).contains(&len) => Ok(len),
        _ => Err(JournalError::InvalidMask(format!(
            "'{}' is not an integer between 1 and 32",
            value
        ))),
    }
}

/// Build the 32-bit mask with the top `len` bits set.
///
/// # Examples
/// ```
/// use ipjournal::validation::mask_from_length;
/// assert_eq!(mask_from_length(24).unwrap(), 0xFFFF_FF00);
/// assert_eq!(mask_from_length(32).unwrap(), 0xFFFF_FFFF);
/// assert!(mask_from_length(0).is_err());
/// ```
pub fn mask_from_length(len: u8) -> Result<u32> {
    if len == 0 {
        return Err(JournalError::InvalidMask(
            "mask length must be at least 1".to_string(),
        ));
    }
    let net = Ipv4Net::new(Ipv4Addr::UNSPECIFIED, len)
        .map_err(|_| JournalError::InvalidMask(format!("{} exceeds 32 bits", len)))?;
    Ok(u32::from(net.netmask()))
}

/// Parse an address token as it appears in a log line.
///
/// Unlike [`validate_ipv4`], each octet may carry leading zeros
/// (`192.168.001.005`). Octets above 255 still fail.
///
/// # Examples
/// ```
/// use ipjournal::validation::parse_log_address;
/// use std::net::Ipv4Addr;
/// assert_eq!(parse_log_address("010.000.000.001"), Some(Ipv4Addr::new(10, 0, 0, 1)));
/// assert!(parse_log_address("999.1.1.1").is_none());
/// ```
pub fn parse_log_address(value: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = value.split('.');
    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// Numeric form of an address, first octet most significant.
pub fn ip_to_u32(ip: Ipv4Addr) -> u32 {
    u32::from_be_bytes(ip.octets())
}

/// Parse a timestamp in either accepted format. Date-only input is midnight.
///
/// # Examples
/// ```
/// use ipjournal::validation::parse_timestamp;
/// assert!(parse_timestamp("01.01.2020").is_some());
/// assert!(parse_timestamp("01.01.2020 12:34:56").is_some());
/// assert!(parse_timestamp("2020-01-01").is_none());
/// assert!(parse_timestamp("31.02.2020").is_none());
/// assert!(parse_timestamp("01.01.2020 12:34:60").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if !TIMESTAMP_SHAPE.is_match(value) {
        return None;
    }
    if value.len() == 10 {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else {
        // %S takes 60 as a leap second, which chrono encodes as nanosecond >= 1e9
        NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
            .ok()
            .filter(|ts| ts.nanosecond() < 1_000_000_000)
    }
}

/// Parse a configured time bound, naming the bound on failure.
pub fn validate_time_bound(bound: &'static str, value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| JournalError::InvalidTime {
        bound,
        value: value.to_string(),
    })
}
