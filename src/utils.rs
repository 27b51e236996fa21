//! Small formatting helpers for log messages.
//!
//! - [`format_count_with_separator`] - Counts with thousands separator (1,234,567)
//! - [`truncate`] - Truncate long log lines with an ellipsis

/// Format a number with thousands separators (commas).
///
/// # Examples
/// ```
/// use ipjournal::utils::format_count_with_separator;
/// assert_eq!(format_count_with_separator(1000), "1,000");
/// assert_eq!(format_count_with_separator(1234567), "1,234,567");
/// ```
pub fn format_count_with_separator(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Truncate a string to at most `max_len` characters, adding "..." if cut.
///
/// Counts characters rather than bytes, so multi-byte log content never
/// splits inside a code point.
///
/// # Examples
/// ```
/// use ipjournal::utils::truncate;
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("this is long", 10), "this is...");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
