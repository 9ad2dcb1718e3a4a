//! Rules for embedded experience and education entries.

use serde_json::Value;

use super::{check_fields, FieldSpec, Rule};
use crate::error::ApiError;

const EXPERIENCE_RULES: &[FieldSpec] = &[
    FieldSpec { name: "title", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "company", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "location", rules: &[Rule::Str] },
    FieldSpec { name: "from", rules: &[Rule::Required, Rule::Date] },
    FieldSpec { name: "to", rules: &[Rule::Date] },
    FieldSpec { name: "current", rules: &[Rule::Bool] },
    FieldSpec { name: "description", rules: &[Rule::Str] },
];

const EDUCATION_RULES: &[FieldSpec] = &[
    FieldSpec { name: "school", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "degree", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "fieldOfStudy", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "from", rules: &[Rule::Required, Rule::Date] },
    FieldSpec { name: "to", rules: &[Rule::Date] },
    FieldSpec { name: "current", rules: &[Rule::Bool] },
    FieldSpec { name: "description", rules: &[Rule::Str] },
];

pub fn validate_experience(payload: &Value) -> Result<(), ApiError> {
    run(payload, EXPERIENCE_RULES)
}

pub fn validate_education(payload: &Value) -> Result<(), ApiError> {
    run(payload, EDUCATION_RULES)
}

fn run(payload: &Value, rules: &[FieldSpec]) -> Result<(), ApiError> {
    let errors = check_fields(payload, rules);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}
