//! Field values as read from a form widget
//!
//! The engine never touches widgets directly. Hosts read a widget and hand over
//! one of these variants; the preset tests coerce from there.

use std::borrow::Cow;
use std::fmt;

use rusty_forms_validation as predicates;

/// Current value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Nothing could be read
    Null,
    /// Text-like inputs: text, password, textarea
    Text(String),
    /// Single-choice drop-down; `None` when nothing is selected
    Selected(Option<String>),
    /// Multi-choice list
    List(Vec<String>),
    /// Number of checked boxes or radios in a toggle group
    Checked(usize),
    /// Numeric value supplied directly by the host
    Number(f64),
}

impl FieldValue {
    /// Shared absence predicate.
    ///
    /// Null and empty sequences are absent. `Number(0.0)` and `Text("0")` are
    /// provided values; `Checked(0)` is an empty selection and therefore absent.
    pub fn is_provided(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Selected(choice) => choice.as_deref().is_some_and(|s| !s.is_empty()),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Checked(count) => *count > 0,
            FieldValue::Number(_) => true,
        }
    }

    /// Strips surrounding whitespace from text values; everything else passes through.
    pub fn trimmed(self) -> Self {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    FieldValue::Text(s)
                } else {
                    FieldValue::Text(trimmed.to_string())
                }
            }
            other => other,
        }
    }

    /// Textual view used by pattern tests
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Selected(choice) => choice.as_deref().map(Cow::Borrowed),
            FieldValue::List(items) => Some(Cow::Owned(items.join(","))),
            FieldValue::Checked(count) => Some(Cow::Owned(count.to_string())),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
        }
    }

    /// Numeric view used by bound tests, parsed like `parseFloat`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Checked(count) => Some(*count as f64),
            FieldValue::List(items) => items.first().and_then(|s| predicates::parse_float(s)),
            other => other.as_text().and_then(|s| predicates::parse_float(&s)),
        }
    }

    /// Characters for text-like values, items for lists
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Null => 0,
            FieldValue::List(items) => items.len(),
            FieldValue::Checked(count) => *count,
            other => other
                .as_text()
                .map(|s| predicates::char_len(&s))
                .unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_provided()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

/// Renders integral floats without a trailing `.0`
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(choice: Option<String>) -> Self {
        FieldValue::Selected(choice)
    }
}
