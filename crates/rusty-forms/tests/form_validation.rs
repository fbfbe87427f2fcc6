//! Integration tests for rusty-forms
//!
//! Drives `FormValidator` through a fake host: field values live in a shared
//! map that tests mutate between passes, and every message-sink call is
//! recorded so the sink contract can be checked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use regex::Regex;
use rstest::rstest;
use rusty_forms::*;

type SinkCall = (String, bool, Option<String>);

#[derive(Clone, Default)]
struct FakeForm {
    values: Arc<Mutex<HashMap<String, FieldValue>>>,
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl FakeForm {
    fn with(fields: &[(&str, FieldValue)]) -> Self {
        let form = Self::default();
        for (name, value) in fields {
            form.set(name, value.clone());
        }
        form
    }

    fn set(&self, field: &str, value: impl Into<FieldValue>) {
        self.values
            .lock()
            .unwrap()
            .insert(field.to_string(), value.into());
    }

    fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl FieldBinder for FakeForm {
    fn accessor(&self, field: &str) -> Option<Box<dyn FieldValueAccessor>> {
        if !self.values.lock().unwrap().contains_key(field) {
            return None;
        }
        let values = Arc::clone(&self.values);
        let field = field.to_string();
        Some(Box::new(move || {
            values
                .lock()
                .unwrap()
                .get(&field)
                .cloned()
                .unwrap_or(FieldValue::Null)
        }))
    }

    fn message_sink(&self, field: &str) -> Arc<dyn MessageSink> {
        let calls = Arc::clone(&self.calls);
        let field = field.to_string();
        Arc::new(move |passed: bool, message: Option<&str>| {
            calls
                .lock()
                .unwrap()
                .push((field.clone(), passed, message.map(str::to_string)));
        })
    }
}

fn registration_rules() -> RawRules {
    RawRules::new()
        .field("name", "required")
        .field(
            "age",
            RawFieldOptions::new()
                .rule("required", true)
                .rule("number", true)
                .rule_with_msg("max", 60, "must be 60 or younger")
                .rule("min", 18),
        )
        .field("email", "email")
        .field(
            "content",
            RawFieldOptions::new()
                .rule("maxlength", 20)
                .rule("minlength", 5)
                .msg("between 5 and 20 characters"),
        )
}

fn registration_form() -> FakeForm {
    FakeForm::with(&[
        ("name", "Ada".into()),
        ("age", "36".into()),
        ("email", "ada@example.com".into()),
        ("content", "hello there".into()),
    ])
}

#[test]
fn test_valid_form_hides_every_message() {
    let form = registration_form();
    let validator = FormValidator::init(registration_rules(), &form).unwrap();

    assert!(validator.validate().unwrap());
    assert_eq!(
        form.calls(),
        vec![
            ("name".to_string(), true, None),
            ("age".to_string(), true, None),
            ("email".to_string(), true, None),
            ("content".to_string(), true, None),
        ]
    );
}

#[test]
fn test_every_field_reported_even_after_failure() {
    let form = registration_form();
    form.set("name", "");
    form.set("age", "61");
    form.set("content", "hi");

    let validator = FormValidator::init(registration_rules(), &form).unwrap();
    let report = validator.validate_report().unwrap();

    assert!(!report.is_valid);
    assert_eq!(
        report.failed_fields().collect::<Vec<_>>(),
        vec!["name", "age", "content"]
    );
    assert_eq!(
        form.calls(),
        vec![
            (
                "name".to_string(),
                false,
                Some("the field is required.".to_string())
            ),
            (
                "age".to_string(),
                false,
                Some("must be 60 or younger".to_string())
            ),
            ("email".to_string(), true, None),
            (
                "content".to_string(),
                false,
                Some("between 5 and 20 characters".to_string())
            ),
        ]
    );
}

#[test]
fn test_revalidation_reads_live_values() {
    let form = registration_form();
    form.set("email", "not-an-email");
    let validator = FormValidator::init(registration_rules(), &form).unwrap();

    assert!(!validator.validate().unwrap());

    form.set("email", "ada@example.com");
    form.clear_calls();
    assert!(validator.validate().unwrap());
    assert_eq!(form.calls().len(), 4);
}

#[test]
fn test_custom_fields_never_touch_the_sink() {
    let form = FakeForm::with(&[
        ("age", "55".into()),
        ("hobby", FieldValue::List(vec!["football".to_string()])),
    ]);

    let hobby_check = CustomValidator::infallible(|value: &FieldValue, values: &dyn ValueSource| {
        let age = values
            .value_of("age")
            .and_then(|age| age.as_number())
            .unwrap_or(0.0);
        let football = matches!(value, FieldValue::List(items) if items.iter().any(|h| h == "football"));

        if age > 50.0 && football {
            CustomVerdict::fail("take it easy on the contact sports")
        } else {
            CustomVerdict::Pass
        }
    });

    let rules = RawRules::new().field("age", "number").field(
        "hobby",
        RawFieldOptions::new()
            .rule("required", true)
            .rule("maxlength", 0)
            .custom(hobby_check),
    );

    let validator = FormValidator::init(rules, &form).unwrap();
    let report = validator.validate_report().unwrap();

    assert!(!report.is_valid);
    assert_eq!(
        report.get_error("hobby"),
        Some("take it easy on the contact sports")
    );
    assert_eq!(form.calls(), vec![("age".to_string(), true, None)]);

    // Declared rules were discarded: maxlength 0 would fail any selection
    form.set("age", "30");
    assert!(validator.validate().unwrap());
}

#[test]
fn test_custom_error_propagates_to_caller() {
    let form = FakeForm::with(&[("token", "abc".into())]);
    let rules = RawRules::new().field(
        "token",
        CustomValidator::new(|_, _| Err("token service unavailable".into())),
    );

    let validator = FormValidator::init(rules, &form).unwrap();
    let err = validator.validate().unwrap_err();
    assert_eq!(err.to_string(), "custom validator for field 'token' failed");
}

#[test]
fn test_message_sink_override() {
    let form = FakeForm::with(&[("sex", FieldValue::Checked(0))]);
    let warnings: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
    let recorded = Arc::clone(&warnings);

    let rules = RawRules::new().field(
        "sex",
        RawFieldOptions::new()
            .rule("required", true)
            .message_sink(Arc::new(move |_passed: bool, message: Option<&str>| {
                recorded.lock().unwrap().push(message.map(str::to_string));
            })),
    );

    let validator = FormValidator::init(rules, &form).unwrap();
    assert!(!validator.validate().unwrap());

    assert!(form.calls().is_empty());
    assert_eq!(
        *warnings.lock().unwrap(),
        vec![Some("the field is required.".to_string())]
    );
}

#[test]
fn test_unknown_key_fails_before_any_evaluation() {
    let form = registration_form();
    let rules = registration_rules().field("name", RawFieldOptions::new().rule("foo", true));

    let err = FormValidator::init(rules, &form).err().unwrap();
    assert!(matches!(err, ConfigError::UnknownKey { ref key, .. } if key == "foo"));
    assert!(form.calls().is_empty());
}

#[test]
fn test_shorthand_equivalence() {
    let pattern = Regex::new(r"^\d{3}$").unwrap();
    let shorthand = normalize(
        RawRules::new()
            .field("x", "required")
            .field("y", pattern.clone()),
    )
    .unwrap();
    let object = normalize(
        RawRules::new()
            .field("x", RawFieldOptions::new().rule("required", true))
            .field("y", RawFieldOptions::new().rule("regex", pattern)),
    )
    .unwrap();

    assert_eq!(shorthand, object);
}

#[rstest]
#[case::empty_text(FieldValue::from(""), false)]
#[case::null(FieldValue::Null, false)]
#[case::empty_list(FieldValue::List(vec![]), false)]
#[case::nothing_checked(FieldValue::Checked(0), false)]
#[case::whitespace_trimmed(FieldValue::from("   "), false)]
#[case::zero_text(FieldValue::from("0"), true)]
#[case::zero_number(FieldValue::Number(0.0), true)]
#[case::one_checked(FieldValue::Checked(1), true)]
#[case::selected(FieldValue::Selected(Some("red".to_string())), true)]
fn test_required_against_value_kinds(#[case] value: FieldValue, #[case] expected: bool) {
    let form = FakeForm::with(&[("field", value)]);
    let validator = FormValidator::init(RawRules::new().field("field", "required"), &form).unwrap();
    assert_eq!(validator.validate().unwrap(), expected);
}

#[rstest]
#[case("max", 10, "10", true)]
#[case("max", 10, "10.0001", false)]
#[case("max_out", 10, "10", false)]
#[case("min", 18, "18", true)]
#[case("min_out", 18, "18", false)]
#[case("maxlength", 5, "abcde", true)]
#[case("maxlength", 5, "abcdef", false)]
#[case("minlength", 3, "abc", true)]
#[case("minlength", 3, "ab", false)]
#[case("maxlength", 5, "", true)]
fn test_boundaries(
    #[case] rule: &str,
    #[case] param: i32,
    #[case] input: &str,
    #[case] expected: bool,
) {
    let form = FakeForm::with(&[("field", input.into())]);
    let rules = RawRules::new().field("field", RawFieldOptions::new().rule(rule, param));
    let validator = FormValidator::init(rules, &form).unwrap();
    assert_eq!(validator.validate().unwrap(), expected);
}

#[test]
fn test_first_failure_wins_across_chain() {
    let form = FakeForm::with(&[("qty", "abc".into())]);
    let rules = RawRules::new().field(
        "qty",
        RawFieldOptions::new()
            .rule("number", true)
            .rule_with_msg("max", 10, "too many"),
    );

    let validator = FormValidator::init(rules, &form).unwrap();
    let report = validator.validate_report().unwrap();
    assert_eq!(report.get_error("qty"), Some("the field expects a number."));
}

#[test]
fn test_non_ascii_digits_and_addresses_are_rejected() {
    let form = FakeForm::with(&[("qty", "٥".into()), ("mail", "用户@例子.公司".into())]);
    let rules = RawRules::new()
        .field(
            "qty",
            RawFieldOptions::new().rule("number", true).rule("max", 10),
        )
        .field("mail", "email");

    let validator = FormValidator::init(rules, &form).unwrap();
    let report = validator.validate_report().unwrap();

    assert_eq!(report.get_error("qty"), Some("the field expects a number."));
    assert_eq!(
        report.get_error("mail"),
        Some("the field expects an email address.")
    );
}

#[test]
fn test_rules_file_round_trip_through_validator() {
    let raw = rules_from_toml(
        r#"
phone = { regex = '^\d{3}-\d{4}$' }

[nickname]
letter = true
maxlength = { value = 8, msg = "at most $value characters" }
"#,
        &CustomValidators::new(),
    )
    .unwrap();

    let form = FakeForm::with(&[("phone", "555-1234".into()), ("nickname", "123456789".into())]);
    let validator = FormValidator::init(raw, &form).unwrap();
    let report = validator.validate_report().unwrap();

    assert!(!report.has_error("phone"));
    assert_eq!(
        report.get_error("nickname"),
        Some("the field expects at least one letter.")
    );

    form.set("nickname", "abcdefghi");
    let report = validator.validate_report().unwrap();
    assert_eq!(report.get_error("nickname"), Some("at most 8 characters"));
}
