//! Email validation functions

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII word characters with `-+.'` separators, then dot-separated domain labels
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([-+.'][A-Za-z0-9_]+)*@[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*\.[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*$",
    )
    .unwrap()
});

/// Validates conventional `local@domain.tld` format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
