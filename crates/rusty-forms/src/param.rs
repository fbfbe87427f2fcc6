//! Rule parameters
//!
//! The value attached to a rule key, e.g. `60` in `max: 60` or the pattern in
//! `regex: /\d{3}/`. Its `Display` form is what replaces `$value` in messages.

use std::fmt;

use regex::Regex;

use crate::value::format_number;

#[derive(Debug, Clone)]
pub enum RuleParam {
    Bool(bool),
    Number(f64),
    Text(String),
    Pattern(Regex),
}

impl RuleParam {
    /// Truthiness used by `required`
    pub fn is_truthy(&self) -> bool {
        match self {
            RuleParam::Bool(b) => *b,
            RuleParam::Number(n) => *n != 0.0 && !n.is_nan(),
            RuleParam::Text(s) => !s.is_empty(),
            RuleParam::Pattern(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleParam::Number(n) => Some(*n),
            RuleParam::Text(s) => rusty_forms_validation::parse_float(s),
            RuleParam::Bool(_) | RuleParam::Pattern(_) => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            RuleParam::Pattern(re) => Some(re),
            _ => None,
        }
    }
}

impl PartialEq for RuleParam {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleParam::Bool(a), RuleParam::Bool(b)) => a == b,
            (RuleParam::Number(a), RuleParam::Number(b)) => a == b,
            (RuleParam::Text(a), RuleParam::Text(b)) => a == b,
            (RuleParam::Pattern(a), RuleParam::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParam::Bool(b) => write!(f, "{}", b),
            RuleParam::Number(n) => f.write_str(&format_number(*n)),
            RuleParam::Text(s) => f.write_str(s),
            RuleParam::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<bool> for RuleParam {
    fn from(b: bool) -> Self {
        RuleParam::Bool(b)
    }
}

impl From<f64> for RuleParam {
    fn from(n: f64) -> Self {
        RuleParam::Number(n)
    }
}

impl From<i32> for RuleParam {
    fn from(n: i32) -> Self {
        RuleParam::Number(f64::from(n))
    }
}

impl From<i64> for RuleParam {
    fn from(n: i64) -> Self {
        RuleParam::Number(n as f64)
    }
}

impl From<usize> for RuleParam {
    fn from(n: usize) -> Self {
        RuleParam::Number(n as f64)
    }
}

impl From<&str> for RuleParam {
    fn from(s: &str) -> Self {
        RuleParam::Text(s.to_string())
    }
}

impl From<String> for RuleParam {
    fn from(s: String) -> Self {
        RuleParam::Text(s)
    }
}

impl From<Regex> for RuleParam {
    fn from(re: Regex) -> Self {
        RuleParam::Pattern(re)
    }
}
