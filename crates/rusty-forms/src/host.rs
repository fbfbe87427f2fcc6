//! Host collaborators
//!
//! Everything platform-specific sits behind these traits: reading a widget,
//! showing or hiding a message, and custom validation code.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::BoxError;
use crate::value::FieldValue;

/// Reads a field's current value on demand
pub trait FieldValueAccessor: Send + Sync {
    fn current_value(&self) -> FieldValue;
}

impl<F> FieldValueAccessor for F
where
    F: Fn() -> FieldValue + Send + Sync,
{
    fn current_value(&self) -> FieldValue {
        self()
    }
}

/// Presents a field's outcome: hide on pass, show `message` on failure
pub trait MessageSink: Send + Sync {
    fn update(&self, passed: bool, message: Option<&str>);
}

impl<F> MessageSink for F
where
    F: Fn(bool, Option<&str>) + Send + Sync,
{
    fn update(&self, passed: bool, message: Option<&str>) {
        self(passed, message)
    }
}

/// Resolves field names to their accessor and default message sink.
///
/// `accessor` returning `None` means the field does not exist on the form.
pub trait FieldBinder {
    fn accessor(&self, field: &str) -> Option<Box<dyn FieldValueAccessor>>;

    fn message_sink(&self, field: &str) -> Arc<dyn MessageSink>;
}

/// Read access to other fields' values, for cross-field custom checks
pub trait ValueSource {
    fn value_of(&self, field: &str) -> Option<FieldValue>;
}

impl ValueSource for HashMap<String, FieldValue> {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        self.get(field).cloned()
    }
}

impl ValueSource for IndexMap<String, FieldValue> {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        self.get(field).cloned()
    }
}

/// A source with no fields
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl ValueSource for NoValues {
    fn value_of(&self, _field: &str) -> Option<FieldValue> {
        None
    }
}

/// What a custom validator decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomVerdict {
    Pass,
    Fail { message: Option<String> },
}

impl CustomVerdict {
    pub fn fail(message: impl Into<String>) -> Self {
        CustomVerdict::Fail {
            message: Some(message.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CustomVerdict::Pass)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CustomVerdict::Pass => None,
            CustomVerdict::Fail { message } => message.as_deref(),
        }
    }
}

impl From<bool> for CustomVerdict {
    fn from(passed: bool) -> Self {
        if passed {
            CustomVerdict::Pass
        } else {
            CustomVerdict::Fail { message: None }
        }
    }
}

type CustomFn =
    dyn Fn(&FieldValue, &dyn ValueSource) -> Result<CustomVerdict, BoxError> + Send + Sync;

/// Caller-supplied validator that replaces a field's whole rule chain
#[derive(Clone)]
pub struct CustomValidator(Arc<CustomFn>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &dyn ValueSource) -> Result<CustomVerdict, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a validator that cannot error
    pub fn infallible<F, V>(f: F) -> Self
    where
        F: Fn(&FieldValue, &dyn ValueSource) -> V + Send + Sync + 'static,
        V: Into<CustomVerdict>,
    {
        Self::new(move |value, values| Ok(f(value, values).into()))
    }

    pub fn call(
        &self,
        value: &FieldValue,
        values: &dyn ValueSource,
    ) -> Result<CustomVerdict, BoxError> {
        (self.0)(value, values)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}
