use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indexmap::IndexMap;
use rusty_forms::{load_rules, CustomValidators, FieldValue, FormData, FormValidator};
use serde_json::Value;

pub fn execute(rules_path: &Path, values_path: &Path) -> Result<bool> {
    let raw = load_rules(rules_path, &CustomValidators::new())
        .with_context(|| format!("Failed to load rules from {}", rules_path.display()))?;
    tracing::debug!(path = %rules_path.display(), fields = raw.len(), "loaded rules");

    let source = fs::read_to_string(values_path)
        .with_context(|| format!("Failed to read {}", values_path.display()))?;
    let document: IndexMap<String, Value> = serde_json::from_str(&source)
        .with_context(|| format!("{} must be a JSON object", values_path.display()))?;

    let mut form = FormData::new();
    for (field, value) in document {
        let value = to_field_value(&field, value)?;
        form.insert(field, value);
    }
    tracing::debug!(path = %values_path.display(), "loaded field values");

    let validator = FormValidator::init(raw, &form).context("Invalid rules")?;
    let report = validator.validate_report()?;

    for rule in validator.rules() {
        if report.has_error(&rule.name) {
            let message = report.get_error(&rule.name).unwrap_or("invalid");
            println!("{} {}: {}", "✗".red(), rule.name.bold(), message);
        } else {
            println!("{} {}", "✓".green(), rule.name);
        }
    }

    println!();
    if report.is_valid {
        println!("{}", "All fields passed".green().bold());
    } else {
        let failed = report.errors.len();
        println!(
            "{}",
            format!("{} of {} field(s) failed", failed, validator.len())
                .red()
                .bold()
        );
    }

    Ok(report.is_valid)
}

/// Maps JSON onto the widget kinds a browser form would produce
fn to_field_value(field: &str, value: Value) -> Result<FieldValue> {
    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::String(s) => FieldValue::Text(s),
        Value::Number(n) => match n.as_f64() {
            Some(n) => FieldValue::Number(n),
            None => bail!("field '{}': number out of range", field),
        },
        Value::Bool(checked) => FieldValue::Checked(usize::from(checked)),
        Value::Array(items) => FieldValue::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Object(_) => bail!("field '{}': nested objects are not form values", field),
    })
}
