//! Raw, caller-authored rule declarations
//!
//! ```rust,ignore
//! let rules = RawRules::new()
//!     .field("name", "required")
//!     .field("phone", Regex::new(r"^\d{13}$")?)
//!     .field(
//!         "age",
//!         RawFieldOptions::new()
//!             .rule("required", true)
//!             .rule("number", true)
//!             .rule_with_msg("max", 60, "must be 60 or younger")
//!             .rule("min", 18),
//!     );
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::host::{CustomValidator, MessageSink};
use crate::param::RuleParam;

pub const OPTION_TRIM: &str = "trim";
pub const OPTION_MSG: &str = "msg";
pub const OPTION_MSG_ELEMENT: &str = "msgElement";
pub const OPTION_CUSTOM: &str = "custom";

/// One field's declaration, before normalization
#[derive(Debug, Clone)]
pub enum RawFieldSpec {
    /// `"required"` or a registry rule name
    Literal(String),
    /// Shorthand for `{ regex: pattern }`
    Pattern(Regex),
    /// Shorthand for `{ custom: validator }`
    Custom(CustomValidator),
    Object(RawFieldOptions),
}

/// The value under one key of an object-shaped declaration
#[derive(Clone)]
pub enum RawEntry {
    Param(RuleParam),
    Detailed { value: RuleParam, msg: Option<String> },
    Sink(Arc<dyn MessageSink>),
    Custom(CustomValidator),
}

impl fmt::Debug for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawEntry::Param(param) => f.debug_tuple("Param").field(param).finish(),
            RawEntry::Detailed { value, msg } => f
                .debug_struct("Detailed")
                .field("value", value)
                .field("msg", msg)
                .finish(),
            RawEntry::Sink(_) => f.write_str("Sink(..)"),
            RawEntry::Custom(custom) => f.debug_tuple("Custom").field(custom).finish(),
        }
    }
}

/// Insertion-ordered keys of an object-shaped declaration
#[derive(Debug, Clone, Default)]
pub struct RawFieldOptions {
    entries: IndexMap<String, RawEntry>,
}

impl RawFieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets any key. Re-setting a key keeps its original position.
    pub fn entry(mut self, key: impl Into<String>, entry: RawEntry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    pub fn rule(self, name: impl Into<String>, param: impl Into<RuleParam>) -> Self {
        self.entry(name, RawEntry::Param(param.into()))
    }

    pub fn rule_with_msg(
        self,
        name: impl Into<String>,
        param: impl Into<RuleParam>,
        msg: impl Into<String>,
    ) -> Self {
        self.entry(
            name,
            RawEntry::Detailed {
                value: param.into(),
                msg: Some(msg.into()),
            },
        )
    }

    /// Field-level message for every rule that does not set its own
    pub fn msg(self, msg: impl Into<String>) -> Self {
        self.entry(OPTION_MSG, RawEntry::Param(RuleParam::Text(msg.into())))
    }

    pub fn trim(self, trim: bool) -> Self {
        self.entry(OPTION_TRIM, RawEntry::Param(RuleParam::Bool(trim)))
    }

    /// Overrides where this field's message is shown
    pub fn message_sink(self, sink: Arc<dyn MessageSink>) -> Self {
        self.entry(OPTION_MSG_ELEMENT, RawEntry::Sink(sink))
    }

    pub fn custom(self, validator: CustomValidator) -> Self {
        self.entry(OPTION_CUSTOM, RawEntry::Custom(validator))
    }

    pub fn get(&self, key: &str) -> Option<&RawEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&str> for RawFieldSpec {
    fn from(name: &str) -> Self {
        RawFieldSpec::Literal(name.to_string())
    }
}

impl From<String> for RawFieldSpec {
    fn from(name: String) -> Self {
        RawFieldSpec::Literal(name)
    }
}

impl From<Regex> for RawFieldSpec {
    fn from(pattern: Regex) -> Self {
        RawFieldSpec::Pattern(pattern)
    }
}

impl From<CustomValidator> for RawFieldSpec {
    fn from(validator: CustomValidator) -> Self {
        RawFieldSpec::Custom(validator)
    }
}

impl From<RawFieldOptions> for RawFieldSpec {
    fn from(options: RawFieldOptions) -> Self {
        RawFieldSpec::Object(options)
    }
}

/// Form-level declarations keyed by field name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct RawRules {
    fields: IndexMap<String, RawFieldSpec>,
}

impl RawRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. A repeated name overwrites the earlier declaration.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<RawFieldSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<RawFieldSpec>) {
        self.fields.insert(name.into(), spec.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for RawRules {
    type Item = (String, RawFieldSpec);
    type IntoIter = indexmap::map::IntoIter<String, RawFieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
