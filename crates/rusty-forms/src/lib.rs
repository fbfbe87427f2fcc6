//! # rusty-forms
//!
//! Declarative per-field validation rules. A compact description of each
//! field's constraints is normalized once into a canonical rule chain, then
//! evaluated against the field's live value as often as needed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rusty_forms::{FormData, FormValidator, RawFieldOptions, RawRules};
//!
//! let rules = RawRules::new()
//!     .field("name", "required")
//!     .field("email", "email")
//!     .field(
//!         "age",
//!         RawFieldOptions::new()
//!             .rule("required", true)
//!             .rule("number", true)
//!             .rule_with_msg("max", 60, "must be 60 or younger")
//!             .rule("min", 18),
//!     );
//!
//! let form = FormData::from_fields([("name", "Ada"), ("email", "ada@example.com"), ("age", "36")]);
//! let validator = FormValidator::init(rules, &form)?;
//! assert!(validator.validate()?);
//! ```
//!
//! ## Architecture
//!
//! - **`registry`** - immutable table of preset rules (message template + pure test)
//! - **`normalize`** - shorthand expansion and message resolution
//! - **`engine`** - first-failure evaluation of one field
//! - **`form`** - binding to host collaborators and aggregation over all fields
//! - **`config`** - JSON/TOML rules files
//!
//! Widgets and message display stay with the host, behind the traits in
//! [`host`].

pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod host;
pub mod normalize;
pub mod param;
pub mod registry;
pub mod spec;
pub mod value;

pub use config::{load_rules, rules_from_json, rules_from_toml, CustomValidators};
pub use engine::{evaluate, FieldOutcome, ValidationOutcome};
pub use error::{BoxError, ConfigError, ValidationError};
pub use form::{validate_all, BoundField, FormData, FormValidator, NullSink, ValidationReport};
pub use host::{
    CustomValidator, CustomVerdict, FieldBinder, FieldValueAccessor, MessageSink, NoValues,
    ValueSource,
};
pub use normalize::{normalize, CanonicalFieldRule, ChainEntry, Normalizer, RequiredRule};
pub use param::RuleParam;
pub use registry::{Registry, RegistryBuilder, RuleDescriptor, RuleTest};
pub use spec::{RawEntry, RawFieldOptions, RawFieldSpec, RawRules};
pub use value::FieldValue;
