//! Error types
//!
//! Two kinds of failure exist. `ConfigError` means the rules were authored
//! wrong and stops initialization. A field failing a rule is not an error at
//! all; the only runtime error is a custom validator that returns `Err`.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Authoring mistakes found while building the canonical rules
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field '{field}': invalid rule option/rule '{key}'")]
    UnknownKey { field: String, key: String },

    #[error("field '{field}': unsupported shorthand {shorthand}")]
    UnsupportedShorthand { field: String, shorthand: String },

    #[error("field '{field}': rule '{rule}' has no default message and none was supplied")]
    AmbiguousMessage { field: String, rule: String },

    #[error("field '{field}': rule '{rule}' has no test in this registry")]
    UnimplementedRule { field: String, rule: String },

    #[error("field '{field}': option '{key}' expects {expected}")]
    InvalidOption {
        field: String,
        key: String,
        expected: &'static str,
    },

    #[error("field '{field}': invalid pattern")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("field '{field}': no custom validator named '{name}'")]
    UnknownCustom { field: String, name: String },

    #[error("cannot find a form field with name of '{field}'")]
    FieldNotFound { field: String },

    #[error("failed to parse rules: {0}")]
    Parse(String),

    #[error("failed to read rules file")]
    Io(#[from] std::io::Error),
}

/// Raised while validating; custom validator errors are passed through untouched
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("custom validator for field '{field}' failed")]
    Custom {
        field: String,
        #[source]
        source: BoxError,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
