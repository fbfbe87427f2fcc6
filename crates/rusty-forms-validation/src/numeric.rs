//! Numeric validation functions

use once_cell::sync::Lazy;
use regex::Regex;

// Optionally-signed integer or decimal in ASCII digits, nothing else
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());

/// Checks that the whole string is an optionally-signed integer or decimal
pub fn is_number(s: &str) -> bool {
    NUMBER_REGEX.is_match(s)
}

/// Parses the leading numeric prefix of a string, the way browsers' `parseFloat` does.
///
/// Leading whitespace is skipped and trailing garbage is ignored, so `"12px"`
/// parses as `12.0`. Returns `None` when no digits start the string.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse::<f64>().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Inclusive upper bound
pub fn is_at_most(value: f64, max: f64) -> bool {
    value <= max
}

/// Exclusive upper bound
pub fn is_below(value: f64, max: f64) -> bool {
    value < max
}

/// Inclusive lower bound
pub fn is_at_least(value: f64, min: f64) -> bool {
    value >= min
}

/// Exclusive lower bound
pub fn is_above(value: f64, min: f64) -> bool {
    value > min
}
