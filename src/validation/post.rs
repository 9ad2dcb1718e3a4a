use serde_json::Value;

use super::{check_fields, FieldSpec, Rule};
use crate::error::ApiError;

// Shared by post creation and comment creation: both carry a required text
// and an optional display name.
const RULES: &[FieldSpec] = &[
    FieldSpec { name: "text", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "name", rules: &[Rule::Str] },
];

pub fn validate(payload: &Value) -> Result<(), ApiError> {
    let errors = check_fields(payload, RULES);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}
