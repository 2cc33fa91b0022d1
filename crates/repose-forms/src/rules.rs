//! Ready-made rules for common field checks.
//!
//! Each takes the message to report; nothing here formats or localizes text.
//! Type-specific rules only judge values of their type (a length rule ignores
//! numbers, a numeric rule ignores arrays), so combine them with [`required`]
//! when a field must also be present.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::rule::{Rule, Validity};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Fails on `null`, blank strings, and empty arrays or objects.
pub fn required(message: impl Into<String>) -> Rule {
    Rule::when(
        |v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        },
        message,
    )
}

/// Character count of strings, item count of arrays.
pub fn min_length(min: usize, message: impl Into<String>) -> Rule {
    Rule::when(move |v| length(v).is_none_or(|n| n >= min), message)
}

pub fn max_length(max: usize, message: impl Into<String>) -> Rule {
    Rule::when(move |v| length(v).is_none_or(|n| n <= max), message)
}

/// Non-empty strings must look like `local@domain.tld`.
pub fn email(message: impl Into<String>) -> Rule {
    Rule::when(
        |v| match v.as_str() {
            Some(s) if !s.is_empty() => EMAIL.is_match(s),
            _ => true,
        },
        message,
    )
}

/// Non-empty strings must match `pattern`.
pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Rule, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(Rule::when(
        move |v| match v.as_str() {
            Some(s) if !s.is_empty() => re.is_match(s),
            _ => true,
        },
        message,
    ))
}

/// Numbers (or numeric strings) must be strictly greater than zero.
pub fn positive(message: impl Into<String>) -> Rule {
    Rule::when(|v| number(v).is_none_or(|n| n > 0.0), message)
}

pub fn min(bound: f64, message: impl Into<String>) -> Rule {
    Rule::when(move |v| number(v).is_none_or(|n| n >= bound), message)
}

pub fn max(bound: f64, message: impl Into<String>) -> Rule {
    Rule::when(move |v| number(v).is_none_or(|n| n <= bound), message)
}

/// Fails unless `predicate` holds; shorthand for custom checks.
pub fn custom(predicate: impl Fn(&Value) -> bool + 'static, message: impl Into<String>) -> Rule {
    Rule::when(predicate, message)
}

/// Wraps a check written as `Result<(), String>`.
pub fn from_result(check: impl Fn(&Value) -> Result<(), String> + 'static) -> Rule {
    Rule::new(move |v| Validity::from(check(v)))
}

fn length(v: &Value) -> Option<usize> {
    match v {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(a) => Some(a.len()),
        _ => None,
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(rule: &Rule, v: Value) -> Option<String> {
        rule.check(&v).into_message()
    }

    #[test]
    fn required_rejects_missing_and_blank() {
        let r = required("required");
        assert_eq!(msg(&r, Value::Null), Some("required".into()));
        assert_eq!(msg(&r, json!("  ")), Some("required".into()));
        assert_eq!(msg(&r, json!([])), Some("required".into()));
        assert_eq!(msg(&r, json!("x")), None);
        assert_eq!(msg(&r, json!(0)), None);
        assert_eq!(msg(&r, json!(false)), None);
    }

    #[test]
    fn length_rules_count_chars() {
        let short = min_length(3, "too short");
        let long = max_length(3, "too long");
        assert!(short.check(&json!("äöü")).is_valid());
        assert!(!short.check(&json!("ab")).is_valid());
        assert!(!long.check(&json!([1, 2, 3, 4])).is_valid());
        assert!(long.check(&json!(12345)).is_valid());
    }

    #[test]
    fn email_shape() {
        let r = email("bad email");
        assert!(r.check(&json!("ada@example.org")).is_valid());
        assert!(!r.check(&json!("ada@example")).is_valid());
        assert!(!r.check(&json!("a b@example.org")).is_valid());
        assert!(r.check(&json!("")).is_valid());
    }

    #[test]
    fn pattern_rejects_bad_regex() {
        assert!(pattern("(", "x").is_err());
        let zip = pattern(r"^\d{5}$", "zip").unwrap();
        assert!(zip.check(&json!("12345")).is_valid());
        assert_eq!(zip.check(&json!("1234")).message(), Some("zip"));
    }

    #[test]
    fn numeric_rules_accept_numeric_strings() {
        let r = positive("must be positive");
        assert!(!r.check(&json!(-1)).is_valid());
        assert!(!r.check(&json!(0)).is_valid());
        assert!(r.check(&json!("5")).is_valid());
        assert!(!r.check(&json!("-2.5")).is_valid());

        let range = [min(1.0, "min"), max(10.0, "max")];
        let failures: Vec<_> = range
            .iter()
            .filter_map(|r| r.check(&json!(11)).into_message())
            .collect();
        assert_eq!(failures, vec!["max"]);
    }

    #[test]
    fn from_result_maps_err_to_message() {
        let r = from_result(|v| {
            if v.as_str() == Some("admin") {
                Err("reserved".into())
            } else {
                Ok(())
            }
        });
        assert_eq!(r.check(&json!("admin")), Validity::Invalid("reserved".into()));
        assert_eq!(r.check(&json!("ada")), Validity::Valid);
    }
}
