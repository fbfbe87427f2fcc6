// File: src/engine.rs
// Purpose: Evaluate one canonical field rule against a value

use crate::error::ValidationError;
use crate::host::{CustomVerdict, ValueSource};
use crate::normalize::CanonicalFieldRule;
use crate::value::FieldValue;

/// Result of a rule-chain evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub passed: bool,
    pub message: Option<String>,
}

impl FieldOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    pub fn fail(message: String) -> Self {
        Self {
            passed: false,
            message: Some(message),
        }
    }
}

/// Per-field result; custom validators keep their own verdict shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Chain(FieldOutcome),
    Custom(CustomVerdict),
}

impl ValidationOutcome {
    /// Only an explicit pass counts
    pub fn passed(&self) -> bool {
        match self {
            ValidationOutcome::Chain(outcome) => outcome.passed,
            ValidationOutcome::Custom(verdict) => verdict.is_pass(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Chain(outcome) => outcome.message.as_deref(),
            ValidationOutcome::Custom(verdict) => verdict.message(),
        }
    }
}

/// Evaluates `rule` against `value`.
///
/// A custom validator, when present, decides alone and its error propagates.
/// Otherwise `required` runs first, then the chain in declaration order,
/// stopping at the first failing rule.
pub fn evaluate(
    rule: &CanonicalFieldRule,
    value: &FieldValue,
    values: &dyn ValueSource,
) -> Result<ValidationOutcome, ValidationError> {
    if let Some(custom) = &rule.custom {
        let verdict = custom
            .call(value, values)
            .map_err(|source| ValidationError::Custom {
                field: rule.name.clone(),
                source,
            })?;
        return Ok(ValidationOutcome::Custom(verdict));
    }

    Ok(ValidationOutcome::Chain(evaluate_chain(rule, value)))
}

/// Chain evaluation only; ignores any custom validator
pub fn evaluate_chain(rule: &CanonicalFieldRule, value: &FieldValue) -> FieldOutcome {
    if let Some(required) = &rule.required {
        if !required.passes(value) {
            return FieldOutcome::fail(required.render_message());
        }
    }

    for entry in &rule.chain {
        if !entry.passes(value) {
            tracing::trace!(field = %rule.name, rule = %entry.rule, "rule failed");
            return FieldOutcome::fail(entry.render_message());
        }
    }

    FieldOutcome::pass()
}
