//! Shorthand normalization
//!
//! Turns each [`RawFieldSpec`] into a [`CanonicalFieldRule`]: shorthands are
//! expanded, option keys are split from rule keys, every rule's message is
//! resolved, and `required` is pulled out of the chain so it always runs first.
//!
//! Message precedence, highest first: the rule's own `msg`, the field-level
//! `msg`, the registry default.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::host::{CustomValidator, MessageSink};
use crate::param::RuleParam;
use crate::registry::{Registry, RuleDescriptor, REGEX, REQUIRED};
use crate::spec::{
    RawEntry, RawFieldOptions, RawFieldSpec, RawRules, OPTION_CUSTOM, OPTION_MSG,
    OPTION_MSG_ELEMENT, OPTION_TRIM,
};
use crate::value::FieldValue;

const VALUE_TOKEN: &str = "$value";

/// The `required` flag, kept apart from the chain
#[derive(Debug, Clone)]
pub struct RequiredRule {
    pub value: bool,
    pub msg: String,
    descriptor: RuleDescriptor,
}

impl RequiredRule {
    /// Inactive when `value` is false; otherwise runs the registry's `required` test
    pub fn passes(&self, value: &FieldValue) -> bool {
        !self.value || self.descriptor.check(value, &RuleParam::Bool(true))
    }

    pub fn render_message(&self) -> String {
        self.msg.replace(VALUE_TOKEN, &self.value.to_string())
    }
}

/// One resolved rule in a field's chain
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub rule: String,
    pub param: RuleParam,
    /// Resolved template, `$value` still in place
    pub msg: String,
    descriptor: RuleDescriptor,
}

impl ChainEntry {
    pub fn passes(&self, value: &FieldValue) -> bool {
        self.descriptor.check(value, &self.param)
    }

    /// Substitutes the parameter into the message at render time
    pub fn render_message(&self) -> String {
        self.msg.replace(VALUE_TOKEN, &self.param.to_string())
    }
}

impl PartialEq for RequiredRule {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.msg == other.msg
    }
}

impl PartialEq for ChainEntry {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule && self.param == other.param && self.msg == other.msg
    }
}

/// Normalized constraints for one field
#[derive(Clone)]
pub struct CanonicalFieldRule {
    pub name: String,
    pub required: Option<RequiredRule>,
    /// Declaration order, `required` excluded
    pub chain: Vec<ChainEntry>,
    /// When set, `required` and `chain` are empty
    pub custom: Option<CustomValidator>,
    /// Strip whitespace from text values before evaluation
    pub trim: bool,
    /// Raw `msgElement`; overrides the binder's sink
    pub message_sink: Option<Arc<dyn MessageSink>>,
}

impl CanonicalFieldRule {
    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(|entry| entry.rule.as_str())
    }
}

impl fmt::Debug for CanonicalFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalFieldRule")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("chain", &self.chain)
            .field("custom", &self.custom)
            .field("trim", &self.trim)
            .field("message_sink", &self.message_sink.as_ref().map(|_| ".."))
            .finish()
    }
}

impl PartialEq for CanonicalFieldRule {
    fn eq(&self, other: &Self) -> bool {
        let same_custom = match (&self.custom, &other.custom) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        let same_sink = match (&self.message_sink, &other.message_sink) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        self.name == other.name
            && self.required == other.required
            && self.chain == other.chain
            && self.trim == other.trim
            && same_custom
            && same_sink
    }
}

/// Normalizes against a registry
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'r> {
    registry: &'r Registry,
}

impl Default for Normalizer<'static> {
    fn default() -> Self {
        Self::new(Registry::presets())
    }
}

impl<'r> Normalizer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Normalizes every field; the first authoring mistake aborts the whole set
    pub fn normalize(&self, raw: RawRules) -> Result<IndexMap<String, CanonicalFieldRule>> {
        let mut rules = IndexMap::with_capacity(raw.len());
        for (name, spec) in raw {
            let rule = self.normalize_field(&name, spec)?;
            rules.insert(name, rule);
        }
        Ok(rules)
    }

    pub fn normalize_field(&self, name: &str, spec: RawFieldSpec) -> Result<CanonicalFieldRule> {
        let options = self.expand_shorthand(name, spec)?;

        let mut trim = true;
        let mut field_msg: Option<String> = None;
        let mut message_sink = None;
        let mut custom = None;

        // Options first: a field-level msg applies no matter where it was declared
        for (key, entry) in options.iter() {
            match key {
                OPTION_TRIM => match entry {
                    RawEntry::Param(RuleParam::Bool(b)) => trim = *b,
                    _ => return Err(invalid_option(name, key, "a boolean")),
                },
                OPTION_MSG => match entry {
                    RawEntry::Param(RuleParam::Text(msg)) => field_msg = Some(msg.clone()),
                    _ => return Err(invalid_option(name, key, "a message string")),
                },
                OPTION_MSG_ELEMENT => match entry {
                    RawEntry::Sink(sink) => message_sink = Some(Arc::clone(sink)),
                    _ => return Err(invalid_option(name, key, "a message sink")),
                },
                OPTION_CUSTOM => match entry {
                    RawEntry::Custom(validator) => custom = Some(validator.clone()),
                    _ => return Err(invalid_option(name, key, "a custom validator")),
                },
                _ => {}
            }
        }

        let mut required = None;
        let mut chain = Vec::new();

        for (key, entry) in options.iter() {
            if is_option_key(key) {
                continue;
            }

            let descriptor = self
                .registry
                .lookup(key)
                .ok_or_else(|| ConfigError::UnknownKey {
                    field: name.to_string(),
                    key: key.to_string(),
                })?;

            let (param, local_msg) = match entry {
                RawEntry::Param(param) => (param.clone(), None),
                RawEntry::Detailed { value, msg } => (value.clone(), msg.clone()),
                RawEntry::Sink(_) | RawEntry::Custom(_) => {
                    return Err(invalid_option(name, key, "a rule parameter"))
                }
            };

            let msg = local_msg
                .or_else(|| field_msg.clone())
                .or_else(|| descriptor.default_message.as_ref().map(|m| m.to_string()))
                .ok_or_else(|| ConfigError::AmbiguousMessage {
                    field: name.to_string(),
                    rule: key.to_string(),
                })?;

            if !descriptor.is_implemented() {
                return Err(ConfigError::UnimplementedRule {
                    field: name.to_string(),
                    rule: key.to_string(),
                });
            }

            if key == REQUIRED {
                required = Some(RequiredRule {
                    value: param.is_truthy(),
                    msg,
                    descriptor: descriptor.clone(),
                });
                continue;
            }

            let param = if key == REGEX {
                compile_pattern(name, param)?
            } else {
                param
            };

            chain.push(ChainEntry {
                rule: key.to_string(),
                param,
                msg,
                descriptor: descriptor.clone(),
            });
        }

        if custom.is_some() && (required.is_some() || !chain.is_empty()) {
            tracing::debug!(
                field = %name,
                discarded = chain.len() + usize::from(required.is_some()),
                "custom validator replaces declared rules"
            );
            required = None;
            chain.clear();
        }

        let rule = CanonicalFieldRule {
            name: name.to_string(),
            required,
            chain,
            custom,
            trim,
            message_sink,
        };

        tracing::trace!(
            field = %rule.name,
            required = ?rule.required.as_ref().map(|r| r.value),
            chain = ?rule.rule_names().collect::<Vec<_>>(),
            custom = rule.is_custom(),
            trim = rule.trim,
            "normalized field rule"
        );

        Ok(rule)
    }

    fn expand_shorthand(&self, name: &str, spec: RawFieldSpec) -> Result<RawFieldOptions> {
        match spec {
            RawFieldSpec::Literal(literal) if literal == REQUIRED => {
                Ok(RawFieldOptions::new().rule(REQUIRED, true))
            }
            RawFieldSpec::Pattern(pattern) => Ok(RawFieldOptions::new().rule(REGEX, pattern)),
            RawFieldSpec::Literal(literal) if self.registry.contains(&literal) => {
                Ok(RawFieldOptions::new().rule(literal, true))
            }
            RawFieldSpec::Custom(validator) => Ok(RawFieldOptions::new().custom(validator)),
            RawFieldSpec::Literal(literal) => Err(ConfigError::UnsupportedShorthand {
                field: name.to_string(),
                shorthand: format!("{:?}", literal),
            }),
            RawFieldSpec::Object(options) => Ok(options),
        }
    }
}

/// Normalizes against the preset registry
pub fn normalize(raw: RawRules) -> Result<IndexMap<String, CanonicalFieldRule>> {
    Normalizer::default().normalize(raw)
}

fn is_option_key(key: &str) -> bool {
    matches!(
        key,
        OPTION_TRIM | OPTION_MSG | OPTION_MSG_ELEMENT | OPTION_CUSTOM
    )
}

fn invalid_option(field: &str, key: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidOption {
        field: field.to_string(),
        key: key.to_string(),
        expected,
    }
}

// `regex` accepts pattern source text as well as a compiled pattern
fn compile_pattern(field: &str, param: RuleParam) -> Result<RuleParam> {
    match param {
        RuleParam::Pattern(_) => Ok(param),
        RuleParam::Text(source) => Regex::new(&source)
            .map(RuleParam::Pattern)
            .map_err(|source| ConfigError::InvalidPattern {
                field: field.to_string(),
                source,
            }),
        _ => Err(invalid_option(field, REGEX, "a pattern")),
    }
}
