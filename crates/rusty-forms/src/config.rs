//! Rules files
//!
//! Rules can be authored as JSON or TOML. The top level maps field names to
//! either a shorthand string or a table of options and rules:
//!
//! ```toml
//! name = "required"
//! email = "email"
//!
//! [age]
//! required = true
//! number = true
//! max = { value = 60, msg = "must be 60 or younger" }
//! min = 18
//!
//! [phone]
//! regex = '^\d{3,4}-\d{7,8}$'
//!
//! [hobby]
//! custom = "hobby_check"
//! ```
//!
//! Text formats have no pattern literal, so the regex shorthand is spelled
//! `{ regex = "..." }`. `custom` names a validator the host registers in a
//! [`CustomValidators`] map; `msgElement` cannot be expressed in a file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::host::CustomValidator;
use crate::param::RuleParam;
use crate::spec::{
    RawEntry, RawFieldOptions, RawFieldSpec, RawRules, OPTION_CUSTOM, OPTION_MSG_ELEMENT,
};

/// Host-registered custom validators, referenced by name from rules files
pub type CustomValidators = HashMap<String, CustomValidator>;

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RulesDocument {
    fields: IndexMap<String, FieldDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldDocument {
    Shorthand(String),
    Table(IndexMap<String, EntryDocument>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    Scalar(ScalarDocument),
    Detailed(DetailedDocument),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarDocument {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedDocument {
    value: ScalarDocument,
    #[serde(default)]
    msg: Option<String>,
}

impl From<ScalarDocument> for RuleParam {
    fn from(scalar: ScalarDocument) -> Self {
        match scalar {
            ScalarDocument::Bool(b) => RuleParam::Bool(b),
            ScalarDocument::Number(n) => RuleParam::Number(n),
            ScalarDocument::Text(s) => RuleParam::Text(s),
        }
    }
}

/// Parses a JSON rules document
pub fn rules_from_json(source: &str, customs: &CustomValidators) -> Result<RawRules> {
    let document: RulesDocument = serde_json::from_str(source)?;
    document.into_raw_rules(customs)
}

/// Parses a TOML rules document
pub fn rules_from_toml(source: &str, customs: &CustomValidators) -> Result<RawRules> {
    let document: RulesDocument = toml::from_str(source)?;
    document.into_raw_rules(customs)
}

/// Reads a rules file, choosing the format by extension
pub fn load_rules(path: impl AsRef<Path>, customs: &CustomValidators) -> Result<RawRules> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => rules_from_json(&source, customs),
        Some("toml") => rules_from_toml(&source, customs),
        other => Err(ConfigError::Parse(format!(
            "unsupported rules file extension {:?} for {}",
            other.unwrap_or(""),
            path.display()
        ))),
    }
}

impl RulesDocument {
    fn into_raw_rules(self, customs: &CustomValidators) -> Result<RawRules> {
        let mut rules = RawRules::new();

        for (field, document) in self.fields {
            let spec = match document {
                FieldDocument::Shorthand(literal) => RawFieldSpec::Literal(literal),
                FieldDocument::Table(entries) => {
                    RawFieldSpec::Object(table_to_options(&field, entries, customs)?)
                }
            };
            rules.insert(field, spec);
        }

        tracing::debug!(fields = rules.len(), "loaded rules document");

        Ok(rules)
    }
}

fn table_to_options(
    field: &str,
    entries: IndexMap<String, EntryDocument>,
    customs: &CustomValidators,
) -> Result<RawFieldOptions> {
    let mut options = RawFieldOptions::new();

    for (key, entry) in entries {
        let raw = match key.as_str() {
            OPTION_CUSTOM => custom_entry(field, &key, entry, customs)?,
            OPTION_MSG_ELEMENT => {
                return Err(ConfigError::InvalidOption {
                    field: field.to_string(),
                    key: key.clone(),
                    expected: "a message sink, which rules files cannot express",
                })
            }
            _ => match entry {
                EntryDocument::Scalar(scalar) => RawEntry::Param(scalar.into()),
                EntryDocument::Detailed(detailed) => RawEntry::Detailed {
                    value: detailed.value.into(),
                    msg: detailed.msg,
                },
            },
        };
        options = options.entry(key, raw);
    }

    Ok(options)
}

fn custom_entry(
    field: &str,
    key: &str,
    entry: EntryDocument,
    customs: &CustomValidators,
) -> Result<RawEntry> {
    match entry {
        EntryDocument::Scalar(ScalarDocument::Text(name)) => customs
            .get(&name)
            .cloned()
            .map(RawEntry::Custom)
            .ok_or_else(|| ConfigError::UnknownCustom {
                field: field.to_string(),
                name,
            }),
        _ => Err(ConfigError::InvalidOption {
            field: field.to_string(),
            key: key.to_string(),
            expected: "the name of a registered custom validator",
        }),
    }
}
