//! Declarative request validation. Each endpoint owns a table of field rules
//! evaluated against the raw JSON payload before anything touches the
//! database. All violations are collected, one message per field, keyed by
//! field name.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::error::ApiError;

pub mod entry;
pub mod post;
pub mod profile;
pub mod user;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug)]
pub enum Rule {
    Required,
    Str,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Uri,
    Date,
    Bool,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

/// Evaluate every spec against the payload, aggregating all violations.
pub fn check_fields(payload: &Value, specs: &[FieldSpec]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for spec in specs {
        check_field(&mut errors, payload.get(spec.name), spec.name, spec.rules);
    }
    errors
}

/// Check one value, recording at most one message under `name`. Used directly
/// by the profile validator to report `social.*` violations under the leaf
/// field name.
pub(crate) fn check_field(
    errors: &mut FieldErrors,
    value: Option<&Value>,
    name: &str,
    rules: &[Rule],
) {
    let value = match value {
        None | Some(Value::Null) => {
            if rules.iter().any(|r| matches!(r, Rule::Required)) {
                errors.insert(name.to_string(), format!("{} is required", name));
            }
            return;
        }
        Some(v) => v,
    };

    for rule in rules {
        let violation = match rule {
            Rule::Required => None,
            Rule::Str => {
                (!value.is_string()).then(|| format!("{} must be a string", name))
            }
            Rule::MinLen(min) => match value.as_str() {
                Some(s) if s.chars().count() < *min => {
                    Some(format!("{} must be at least {} characters", name, min))
                }
                _ => None,
            },
            Rule::MaxLen(max) => match value.as_str() {
                Some(s) if s.chars().count() > *max => {
                    Some(format!("{} must be at most {} characters", name, max))
                }
                _ => None,
            },
            Rule::Email => match value.as_str() {
                Some(s) if !email_ok(s) => {
                    Some(format!("{} must be a valid email address", name))
                }
                _ => None,
            },
            // Empty strings pass: optional URI fields may be cleared with ""
            Rule::Uri => match value.as_str() {
                Some(s) if !s.is_empty() && Url::parse(s).is_err() => {
                    Some(format!("{} must be a valid URI", name))
                }
                _ => None,
            },
            Rule::Date => match value.as_str() {
                Some(s) if parse_date(s).is_none() => {
                    Some(format!("{} must be a valid date", name))
                }
                Some(_) => None,
                None => Some(format!("{} must be a valid date", name)),
            },
            Rule::Bool => {
                (!value.is_boolean()).then(|| format!("{} must be a boolean", name))
            }
        };

        if let Some(message) = violation {
            errors.insert(name.to_string(), message);
            break;
        }
    }
}

/// The store's canonical object-identifier format.
pub fn object_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::invalid_identifier(format!("'{}' is not a valid object id", raw)))
}

/// Accepts a plain date (`2020-01-31`) or a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = s.parse::<NaiveDate>() {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn email_ok(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aggregates_all_violations() {
        const SPECS: &[FieldSpec] = &[
            FieldSpec { name: "a", rules: &[Rule::Required, Rule::Str] },
            FieldSpec { name: "b", rules: &[Rule::Required, Rule::Str] },
        ];
        let errors = check_fields(&json!({}), SPECS);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["a"], "a is required");
        assert_eq!(errors["b"], "b is required");
    }

    #[test]
    fn one_message_per_field() {
        const SPECS: &[FieldSpec] = &[FieldSpec {
            name: "name",
            rules: &[Rule::Required, Rule::Str, Rule::MinLen(3)],
        }];
        let errors = check_fields(&json!({"name": 42}), SPECS);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["name"], "name must be a string");
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        const SPECS: &[FieldSpec] = &[FieldSpec { name: "bio", rules: &[Rule::Str] }];
        assert!(check_fields(&json!({}), SPECS).is_empty());
        assert!(check_fields(&json!({ "bio": null }), SPECS).is_empty());
        assert!(!check_fields(&json!({ "bio": 1 }), SPECS).is_empty());
    }

    #[test]
    fn email_rule() {
        assert!(email_ok("a@x.com"));
        assert!(email_ok("first.last@sub.domain.org"));
        assert!(!email_ok("not-an-email"));
        assert!(!email_ok("@x.com"));
        assert!(!email_ok("a@"));
        assert!(!email_ok("a@nodot"));
        assert!(!email_ok("a b@x.com"));
        assert!(!email_ok("a@.com"));
    }

    #[test]
    fn uri_rule_allows_empty_string() {
        const SPECS: &[FieldSpec] =
            &[FieldSpec { name: "website", rules: &[Rule::Str, Rule::Uri] }];
        assert!(check_fields(&json!({"website": ""}), SPECS).is_empty());
        assert!(check_fields(&json!({"website": "https://x.dev"}), SPECS).is_empty());
        assert!(!check_fields(&json!({"website": "not a uri"}), SPECS).is_empty());
    }

    #[test]
    fn date_parsing() {
        assert!(parse_date("2020-01-31").is_some());
        assert!(parse_date("2020-01-31T12:00:00Z").is_some());
        assert!(parse_date("January 2020").is_none());
        assert!(parse_date("2020-13-01").is_none());
    }

    #[test]
    fn object_id_accepts_uuids_only() {
        assert!(object_id("f47ac10b-58cc-4372-a567-0e02b2c3d479").is_ok());

        let err = object_id("12345").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_IDENTIFIER");
    }
}
