use serde_json::Value;

use super::{check_fields, FieldSpec, Rule};
use crate::error::ApiError;

const RULES: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        rules: &[Rule::Required, Rule::Str, Rule::MinLen(3), Rule::MaxLen(30)],
    },
    FieldSpec {
        name: "email",
        rules: &[Rule::Required, Rule::Str, Rule::Email],
    },
    FieldSpec {
        name: "password",
        rules: &[Rule::Required, Rule::Str, Rule::MinLen(8), Rule::MaxLen(20)],
    },
];

/// Registration payload rules.
pub fn validate(payload: &Value) -> Result<(), ApiError> {
    let errors = check_fields(payload, RULES);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}
