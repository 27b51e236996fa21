//! Filter parameters built from raw configuration strings.

use chrono::NaiveDateTime;
use std::net::Ipv4Addr;

use crate::error::Result;
use crate::validation::{mask_from_length, validate_ipv4, validate_mask_length, validate_time_bound};

/// Raw, unvalidated filter inputs as they come from the config source.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFilter<'a> {
    pub address_start: Option<&'a str>,
    pub address_mask: Option<&'a str>,
    pub time_start: Option<&'a str>,
    pub time_end: Option<&'a str>,
}

/// Subnet and time window constraints applied to every log line.
///
/// Every field is independently optional and a missing field disables that
/// dimension. `mask` and `mask_length` are kept side by side; the line
/// processor rejects a mask whose length is outside `1..=32`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub start_address: Option<Ipv4Addr>,
    pub mask: Option<u32>,
    pub mask_length: Option<u8>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl FilterParams {
    /// Validate the raw inputs, failing on the first malformed one.
    ///
    /// No cross-field checks are made here: a start address without a mask,
    /// or a start time after the end time, is accepted.
    pub fn build(raw: RawFilter<'_>) -> Result<Self> {
        let mut params = Self::default();

        if let Some(address) = present(raw.address_start) {
            params.start_address = Some(validate_ipv4("address-start", address)?);
        }

        if let Some(mask) = present(raw.address_mask) {
            let len = validate_mask_length(mask)?;
            params.mask = Some(mask_from_length(len)?);
            params.mask_length = Some(len);
        }

        if let Some(start) = present(raw.time_start) {
            params.start_time = Some(validate_time_bound("time-start", start)?);
        }

        if let Some(end) = present(raw.time_end) {
            params.end_time = Some(validate_time_bound("time-end", end)?);
        }

        Ok(params)
    }

    /// Whether `timestamp` lies inside the configured window, bounds included.
    pub fn in_window(&self, timestamp: &NaiveDateTime) -> bool {
        if let Some(start) = &self.start_time {
            if timestamp < start {
                return false;
            }
        }
        if let Some(end) = &self.end_time {
            if timestamp > end {
                return false;
            }
        }
        true
    }

    /// True when no filter dimension is configured.
    pub fn is_unfiltered(&self) -> bool {
        self.start_address.is_none()
            && self.mask.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use crate::validation::parse_timestamp;

    fn raw<'a>(
        address_start: Option<&'a str>,
        address_mask: Option<&'a str>,
        time_start: Option<&'a str>,
        time_end: Option<&'a str>,
    ) -> RawFilter<'a> {
        RawFilter {
            address_start,
            address_mask,
            time_start,
            time_end,
        }
    }

    #[test]
    fn test_build_empty() {
        let params = FilterParams::build(RawFilter::default()).unwrap();
        assert_eq!(params, FilterParams::default());
        assert!(params.is_unfiltered());
    }

    #[test]
    fn test_build_empty_strings_are_absent() {
        let params = FilterParams::build(raw(Some(""), Some(""), Some(""), Some(""))).unwrap();
        assert!(params.is_unfiltered());
    }

    #[test]
    fn test_build_full() {
        let params = FilterParams::build(raw(
            Some("192.168.1.1"),
            Some("24"),
            Some("01.01.2020"),
            Some("31.12.2020 23:59:59"),
        ))
        .unwrap();
        assert_eq!(params.start_address, Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(params.mask, Some(0xFFFF_FF00));
        assert_eq!(params.mask_length, Some(24));
        assert_eq!(params.start_time, parse_timestamp("01.01.2020 00:00:00"));
        assert_eq!(params.end_time, parse_timestamp("31.12.2020 23:59:59"));
        assert!(!params.is_unfiltered());
    }

    #[test]
    fn test_build_invalid_address() {
        let err = FilterParams::build(raw(Some("192.168.1"), None, None, None)).unwrap_err();
        assert!(matches!(err, JournalError::InvalidAddress { .. }));
    }

    #[test]
    fn test_build_invalid_mask() {
        for mask in ["0", "33", "-8", "twenty"] {
            let err = FilterParams::build(raw(None, Some(mask), None, None)).unwrap_err();
            assert!(matches!(err, JournalError::InvalidMask(_)), "mask {mask}");
        }
    }

    #[test]
    fn test_build_invalid_time_identifies_bound() {
        let err = FilterParams::build(raw(None, None, Some("2020-01-01"), None)).unwrap_err();
        assert!(matches!(
            err,
            JournalError::InvalidTime {
                bound: "time-start",
                ..
            }
        ));

        let err =
            FilterParams::build(raw(None, None, Some("01.01.2020"), Some("soon"))).unwrap_err();
        assert!(matches!(err, JournalError::InvalidTime { bound: "time-end", .. }));
    }

    #[test]
    fn test_build_no_cross_field_validation() {
        // Start address without mask and an inverted window are both accepted
        let params = FilterParams::build(raw(
            Some("10.0.0.1"),
            None,
            Some("31.12.2020"),
            Some("01.01.2020"),
        ))
        .unwrap();
        assert!(params.start_address.is_some());
        assert!(params.mask.is_none());
        assert!(params.start_time > params.end_time);
    }

    #[test]
    fn test_build_mask_without_address() {
        let params = FilterParams::build(raw(None, Some("16"), None, None)).unwrap();
        assert_eq!(params.mask, Some(0xFFFF_0000));
        assert_eq!(params.mask_length, Some(16));
        assert!(params.start_address.is_none());
    }

    #[test]
    fn test_in_window_inclusive() {
        let params = FilterParams::build(raw(
            None,
            None,
            Some("01.01.2020"),
            Some("01.01.2020 23:59:59"),
        ))
        .unwrap();
        let at = |s| parse_timestamp(s).unwrap();
        assert!(params.in_window(&at("01.01.2020 00:00:00")));
        assert!(params.in_window(&at("01.01.2020 23:59:59")));
        assert!(!params.in_window(&at("31.12.2019 23:59:59")));
        assert!(!params.in_window(&at("02.01.2020 00:00:00")));
    }

    #[test]
    fn test_in_window_open_ended() {
        let at = |s| parse_timestamp(s).unwrap();
        let only_start = FilterParams::build(raw(None, None, Some("01.06.2020"), None)).unwrap();
        assert!(only_start.in_window(&at("01.01.2099")));
        assert!(!only_start.in_window(&at("31.05.2020 23:59:59")));

        let only_end = FilterParams::build(raw(None, None, None, Some("01.06.2020"))).unwrap();
        assert!(only_end.in_window(&at("01.01.1970")));
        assert!(!only_end.in_window(&at("01.06.2020 00:00:01")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    proptest! {
        /// A timestamp is inside [start, end] exactly when start <= t <= end
        #[test]
        fn prop_window_membership(start in 0i64..100_000, len in 0i64..100_000, t in 0i64..300_000) {
            let params = FilterParams {
                start_time: Some(base() + Duration::seconds(start)),
                end_time: Some(base() + Duration::seconds(start + len)),
                ..FilterParams::default()
            };
            let ts = base() + Duration::seconds(t);
            prop_assert_eq!(params.in_window(&ts), start <= t && t <= start + len);
        }

        /// No window configured means every timestamp passes
        #[test]
        fn prop_no_window_accepts_all(t in -1_000_000_000i64..1_000_000_000) {
            let params = FilterParams::default();
            prop_assert!(params.in_window(&(base() + Duration::seconds(t))));
        }
    }
}
