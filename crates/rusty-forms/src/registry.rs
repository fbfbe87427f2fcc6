//! Preset rule registry
//!
//! A registry is an immutable table of named rules, each a default message
//! template plus a pure test function. The preset table is built once per
//! process; deployments that need more (or need the regional extension points
//! implemented) build their own with [`RegistryBuilder`] before normalizing.

use std::borrow::Cow;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rusty_forms_validation as predicates;

use crate::param::RuleParam;
use crate::value::FieldValue;

/// Pure predicate over `(value, parameter)`
pub type RuleTest = fn(&FieldValue, &RuleParam) -> bool;

pub const REQUIRED: &str = "required";
pub const REGEX: &str = "regex";

/// One named rule in a registry
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    pub name: Cow<'static, str>,
    /// Template; `$value` is replaced by the rule's parameter when rendered
    pub default_message: Option<Cow<'static, str>>,
    /// `None` marks an extension point that has no predicate yet
    pub test: Option<RuleTest>,
    /// Only `required` looks at absent values
    skips_absent: bool,
}

impl RuleDescriptor {
    fn preset(name: &'static str, message: &'static str, test: RuleTest) -> Self {
        Self {
            name: Cow::Borrowed(name),
            default_message: Some(Cow::Borrowed(message)),
            test: Some(test),
            skips_absent: name != REQUIRED,
        }
    }

    fn extension_point(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            default_message: None,
            test: None,
            skips_absent: true,
        }
    }

    pub fn is_implemented(&self) -> bool {
        self.test.is_some()
    }

    /// Runs the test. Absent values pass every rule except `required`.
    /// An unimplemented extension point never fails.
    pub fn check(&self, value: &FieldValue, param: &RuleParam) -> bool {
        if self.skips_absent && !value.is_provided() {
            return true;
        }

        match self.test {
            Some(test) => test(value, param),
            None => true,
        }
    }
}

static PRESETS: Lazy<Registry> = Lazy::new(|| RegistryBuilder::with_presets().build());

/// Immutable rule table
#[derive(Debug, Clone)]
pub struct Registry {
    rules: IndexMap<Cow<'static, str>, RuleDescriptor>,
}

impl Registry {
    /// The process-wide preset table
    pub fn presets() -> &'static Registry {
        &PRESETS
    }

    pub fn lookup(&self, name: &str) -> Option<&RuleDescriptor> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|name| name.as_ref())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.values()
    }
}

/// Assembles a [`Registry`]; consumed by `build`
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    rules: IndexMap<Cow<'static, str>, RuleDescriptor>,
}

impl RegistryBuilder {
    /// Empty builder with no rules at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded with the preset rules and regional extension points
    pub fn with_presets() -> Self {
        let mut builder = Self::new();
        for descriptor in preset_descriptors() {
            builder.insert(descriptor);
        }
        builder
    }

    /// Adds a rule, or implements/replaces an existing one of the same name.
    ///
    /// Replacing `required` swaps the absence check the engine runs first;
    /// it still sees absent values.
    pub fn rule(
        mut self,
        name: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
        test: RuleTest,
    ) -> Self {
        let name = name.into();
        let skips_absent = name != REQUIRED;
        self.insert(RuleDescriptor {
            name,
            default_message: Some(message.into()),
            test: Some(test),
            skips_absent,
        });
        self
    }

    /// Removes a rule so that referencing it becomes an unknown-key error
    pub fn without(mut self, name: &str) -> Self {
        self.rules.shift_remove(name);
        self
    }

    pub fn build(self) -> Registry {
        Registry { rules: self.rules }
    }

    fn insert(&mut self, descriptor: RuleDescriptor) {
        self.rules.insert(descriptor.name.clone(), descriptor);
    }
}

fn preset_descriptors() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor::preset(REQUIRED, "the field is required.", test_required),
        RuleDescriptor::preset("number", "the field expects a number.", test_number),
        RuleDescriptor::preset("email", "the field expects an email address.", test_email),
        RuleDescriptor::preset("letter", "the field expects at least one letter.", test_letter),
        RuleDescriptor::extension_point("Chinese.mobileNo"),
        RuleDescriptor::extension_point("Chinese.IDNo"),
        RuleDescriptor::extension_point("Chinese.phoneNo"),
        RuleDescriptor::preset(
            "max",
            "the number should be less than or equal to $value.",
            test_max,
        ),
        RuleDescriptor::preset("max_out", "the number should be less than $value.", test_max_out),
        RuleDescriptor::preset(
            "min",
            "the number should be greater than or equal to $value.",
            test_min,
        ),
        RuleDescriptor::preset(
            "min_out",
            "the number should be greater than $value.",
            test_min_out,
        ),
        RuleDescriptor::preset(
            "maxlength",
            "the text should not be more than $value character(s).",
            test_maxlength,
        ),
        RuleDescriptor::preset(
            "minlength",
            "the text should not be less than $value character(s).",
            test_minlength,
        ),
        RuleDescriptor::preset(REGEX, "the text should match the pattern $value.", test_regex),
    ]
}

fn test_required(value: &FieldValue, _param: &RuleParam) -> bool {
    value.is_provided()
}

fn test_number(value: &FieldValue, _param: &RuleParam) -> bool {
    value
        .as_text()
        .is_some_and(|text| predicates::is_number(&text))
}

fn test_email(value: &FieldValue, _param: &RuleParam) -> bool {
    value
        .as_text()
        .is_some_and(|text| predicates::is_valid_email(&text))
}

fn test_letter(value: &FieldValue, _param: &RuleParam) -> bool {
    value
        .as_text()
        .is_some_and(|text| predicates::has_letter(&text))
}

// A value or bound that does not parse compares false, like NaN
fn compare(value: &FieldValue, param: &RuleParam, cmp: fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), param.as_number()) {
        (Some(v), Some(bound)) => cmp(v, bound),
        _ => false,
    }
}

fn test_max(value: &FieldValue, param: &RuleParam) -> bool {
    compare(value, param, predicates::is_at_most)
}

fn test_max_out(value: &FieldValue, param: &RuleParam) -> bool {
    compare(value, param, predicates::is_below)
}

fn test_min(value: &FieldValue, param: &RuleParam) -> bool {
    compare(value, param, predicates::is_at_least)
}

fn test_min_out(value: &FieldValue, param: &RuleParam) -> bool {
    compare(value, param, predicates::is_above)
}

fn test_maxlength(value: &FieldValue, param: &RuleParam) -> bool {
    param
        .as_number()
        .is_some_and(|max| predicates::within_max_length(value.len(), max))
}

fn test_minlength(value: &FieldValue, param: &RuleParam) -> bool {
    param
        .as_number()
        .is_some_and(|min| predicates::within_min_length(value.len(), min))
}

fn test_regex(value: &FieldValue, param: &RuleParam) -> bool {
    match (param.as_pattern(), value.as_text()) {
        (Some(pattern), Some(text)) => predicates::matches_pattern(pattern, &text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use rstest::rstest;

    fn check(rule: &str, value: impl Into<FieldValue>, param: impl Into<RuleParam>) -> bool {
        Registry::presets()
            .lookup(rule)
            .unwrap()
            .check(&value.into(), &param.into())
    }

    #[rstest]
    #[case("number")]
    #[case("email")]
    #[case("letter")]
    #[case("max")]
    #[case("max_out")]
    #[case("min")]
    #[case("min_out")]
    #[case("maxlength")]
    #[case("minlength")]
    fn test_absent_values_pass(#[case] rule: &str) {
        assert!(check(rule, "", 5));
        assert!(check(rule, FieldValue::Null, 5));
        assert!(check(rule, FieldValue::List(vec![]), 5));
    }

    #[test]
    fn test_absent_values_pass_regex() {
        assert!(check(REGEX, "", Regex::new(r"^\d+$").unwrap()));
    }

    #[test]
    fn test_required() {
        assert!(!check(REQUIRED, "", true));
        assert!(!check(REQUIRED, FieldValue::Null, true));
        assert!(!check(REQUIRED, FieldValue::List(vec![]), true));
        assert!(!check(REQUIRED, FieldValue::Checked(0), true));
        assert!(check(REQUIRED, "0", true));
        assert!(check(REQUIRED, 0.0, true));
    }

    #[test]
    fn test_bounds() {
        assert!(check("max", "10", 10));
        assert!(!check("max", "10.0001", 10));
        assert!(!check("max_out", "10", 10));
        assert!(check("max_out", "9.5", 10));

        assert!(check("min", "18", 18));
        assert!(!check("min_out", "18", 18));
        assert!(check("min_out", "18.5", 18));

        // Unparseable input compares like NaN
        assert!(!check("max", "abc", 10));
        assert!(!check("min", "abc", 10));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        assert!(check("maxlength", "abcde", 5));
        assert!(!check("maxlength", "abcdef", 5));
        assert!(check("minlength", "abc", 3));
        assert!(!check("minlength", "ab", 3));
    }

    #[test]
    fn test_formats() {
        assert!(check("number", "-1.5", true));
        assert!(!check("number", "1.5.5", true));
        assert!(check("email", "a.b@example.org", true));
        assert!(!check("email", "a.b@", true));
        assert!(check("letter", "42a", true));
        assert!(!check("letter", "42", true));
        assert!(check(REGEX, "123", Regex::new(r"^\d{3}$").unwrap()));
        assert!(!check(REGEX, "1234", Regex::new(r"^\d{3}$").unwrap()));
    }

    #[test]
    fn test_extension_points_are_unimplemented() {
        let presets = Registry::presets();
        for name in ["Chinese.mobileNo", "Chinese.IDNo", "Chinese.phoneNo"] {
            let descriptor = presets.lookup(name).unwrap();
            assert!(!descriptor.is_implemented());
            assert!(descriptor.default_message.is_none());
        }
    }

    #[test]
    fn test_builder_implements_extension_point() {
        fn eleven_digits(value: &FieldValue, _: &RuleParam) -> bool {
            value
                .as_text()
                .is_some_and(|s| s.len() == 11 && s.chars().all(|c| c.is_ascii_digit()))
        }

        let registry = RegistryBuilder::with_presets()
            .rule("Chinese.mobileNo", "expects a mobile number.", eleven_digits)
            .build();

        let rule = registry.lookup("Chinese.mobileNo").unwrap();
        assert!(rule.is_implemented());
        assert!(rule.check(&"13800138000".into(), &true.into()));
        assert!(!rule.check(&"1380".into(), &true.into()));
        assert!(rule.check(&"".into(), &true.into()));

        // Position is kept when an existing entry is replaced
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names[4], "Chinese.mobileNo");
    }

    #[test]
    fn test_without_removes_rule() {
        let registry = RegistryBuilder::with_presets().without("letter").build();
        assert!(!registry.contains("letter"));
        assert!(registry.contains("number"));
    }
}
