//! String validation functions

use once_cell::sync::Lazy;
use regex::Regex;

static LETTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Checks for at least one ASCII letter anywhere in the string
pub fn has_letter(s: &str) -> bool {
    LETTER_REGEX.is_match(s)
}

/// Length in characters, not bytes
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Inclusive maximum length
pub fn within_max_length(len: usize, max: f64) -> bool {
    (len as f64) <= max
}

/// Inclusive minimum length
pub fn within_min_length(len: usize, min: f64) -> bool {
    (len as f64) >= min
}

/// Unanchored pattern match; anchors belong in the pattern itself
pub fn matches_pattern(pattern: &Regex, s: &str) -> bool {
    pattern.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_letter() {
        assert!(has_letter("abc"));
        assert!(has_letter("123a"));
        assert!(!has_letter("12345"));
        assert!(!has_letter("ÄÖÜ"));
    }

    #[test]
    fn test_length_validators() {
        assert_eq!(char_len("héllo"), 5);

        assert!(within_max_length(5, 5.0));
        assert!(!within_max_length(6, 5.0));

        assert!(within_min_length(3, 3.0));
        assert!(!within_min_length(2, 3.0));
    }

    #[test]
    fn test_pattern_matching() {
        let anchored = Regex::new(r"^\d{3}$").unwrap();
        assert!(matches_pattern(&anchored, "123"));
        assert!(!matches_pattern(&anchored, "1234"));

        let loose = Regex::new(r"\d{3}").unwrap();
        assert!(matches_pattern(&loose, "ab1234"));
    }
}
