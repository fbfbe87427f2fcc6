// File: src/form.rs
// Purpose: Bind canonical rules to a form and aggregate per-field outcomes

use std::sync::Arc;

use indexmap::IndexMap;

use crate::engine::{evaluate, ValidationOutcome};
use crate::error::{ConfigError, Result, ValidationError};
use crate::host::{FieldBinder, FieldValueAccessor, MessageSink, ValueSource};
use crate::normalize::{CanonicalFieldRule, Normalizer};
use crate::registry::Registry;
use crate::spec::RawRules;
use crate::value::FieldValue;

/// A canonical rule wired to its field's accessor and message sink
pub struct BoundField {
    rule: CanonicalFieldRule,
    accessor: Box<dyn FieldValueAccessor>,
    sink: Arc<dyn MessageSink>,
}

impl BoundField {
    pub fn new(
        rule: CanonicalFieldRule,
        accessor: Box<dyn FieldValueAccessor>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            rule,
            accessor,
            sink,
        }
    }

    pub fn rule(&self) -> &CanonicalFieldRule {
        &self.rule
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    /// Live value with the rule's trim policy applied
    pub fn current_value(&self) -> FieldValue {
        let value = self.accessor.current_value();
        if self.rule.trim {
            value.trimmed()
        } else {
            value
        }
    }
}

/// Sibling lookup over the bound fields, for custom validators
struct FormValues<'a> {
    fields: &'a [BoundField],
}

impl ValueSource for FormValues<'_> {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|bound| bound.name() == field)
            .map(BoundField::current_value)
    }
}

/// Aggregate result of validating every field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Failed fields in declaration order; `None` when a custom validator gave no message
    pub errors: IndexMap<String, Option<String>>,
}

impl ValidationReport {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: IndexMap::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Message for a failed field
    pub fn get_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).and_then(|msg| msg.as_deref())
    }

    pub fn failed_fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    fn record(&mut self, field: &str, outcome: &ValidationOutcome) {
        if !outcome.passed() {
            self.is_valid = false;
            self.errors
                .insert(field.to_string(), outcome.message().map(str::to_string));
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::success()
    }
}

/// Validates every field in order.
///
/// Never stops early on a failed field. Chain-validated fields report to their
/// sink exactly once; custom-validated fields never touch it. Only a custom
/// validator's error aborts the pass.
pub fn validate_all(fields: &[BoundField]) -> Result<ValidationReport, ValidationError> {
    let values = FormValues { fields };
    let mut report = ValidationReport::success();

    if fields.is_empty() {
        tracing::debug!("no validation rules");
        return Ok(report);
    }

    for field in fields {
        let value = field.current_value();
        let outcome = evaluate(&field.rule, &value, &values)?;

        tracing::debug!(field = %field.name(), passed = outcome.passed(), "validated field");

        if let ValidationOutcome::Chain(chain) = &outcome {
            field.sink.update(chain.passed, chain.message.as_deref());
        }

        report.record(field.name(), &outcome);
    }

    Ok(report)
}

/// Handle returned by initialization; validate as many times as needed
pub struct FormValidator {
    fields: Vec<BoundField>,
}

impl FormValidator {
    /// Normalizes `raw` against the preset registry and binds every field
    pub fn init<B>(raw: RawRules, binder: &B) -> Result<Self>
    where
        B: FieldBinder + ?Sized,
    {
        Self::init_with_registry(raw, binder, Registry::presets())
    }

    pub fn init_with_registry<B>(raw: RawRules, binder: &B, registry: &Registry) -> Result<Self>
    where
        B: FieldBinder + ?Sized,
    {
        let rules = Normalizer::new(registry).normalize(raw)?;
        Self::bind(rules.into_values(), binder)
    }

    /// Binds already-normalized rules; a field the binder cannot find is an error
    pub fn bind<I, B>(rules: I, binder: &B) -> Result<Self>
    where
        I: IntoIterator<Item = CanonicalFieldRule>,
        B: FieldBinder + ?Sized,
    {
        let mut fields = Vec::new();

        for rule in rules {
            let accessor =
                binder
                    .accessor(&rule.name)
                    .ok_or_else(|| ConfigError::FieldNotFound {
                        field: rule.name.clone(),
                    })?;

            let sink = match &rule.message_sink {
                Some(sink) => Arc::clone(sink),
                None => binder.message_sink(&rule.name),
            };

            fields.push(BoundField::new(rule, accessor, sink));
        }

        tracing::debug!(fields = fields.len(), "form validator initialized");

        Ok(Self { fields })
    }

    /// Runs every field; `false` if any failed
    pub fn validate(&self) -> Result<bool, ValidationError> {
        Ok(self.validate_report()?.is_valid)
    }

    pub fn validate_report(&self) -> Result<ValidationReport, ValidationError> {
        validate_all(&self.fields)
    }

    pub fn rules(&self) -> impl Iterator<Item = &CanonicalFieldRule> {
        self.fields.iter().map(BoundField::rule)
    }

    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn update(&self, _passed: bool, _message: Option<&str>) {}
}

/// A submitted form as a fixed set of values.
///
/// Binds fields for server-side checks where there is no widget to re-read and
/// nowhere to display messages; use the [`ValidationReport`] instead.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    values: IndexMap<String, FieldValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            values: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }
}

impl FieldBinder for FormData {
    fn accessor(&self, field: &str) -> Option<Box<dyn FieldValueAccessor>> {
        let value = self.values.get(field)?.clone();
        Some(Box::new(move || value.clone()))
    }

    fn message_sink(&self, _field: &str) -> Arc<dyn MessageSink> {
        Arc::new(NullSink)
    }
}

impl ValueSource for FormData {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        self.values.get(field).cloned()
    }
}
