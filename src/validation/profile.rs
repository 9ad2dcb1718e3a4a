use serde_json::Value;

use super::{check_field, check_fields, FieldSpec, Rule};
use crate::error::ApiError;

const RULES: &[FieldSpec] = &[
    FieldSpec { name: "handle", rules: &[Rule::Required, Rule::Str] },
    FieldSpec { name: "company", rules: &[Rule::Str] },
    FieldSpec { name: "website", rules: &[Rule::Str, Rule::Uri] },
    FieldSpec { name: "location", rules: &[Rule::Str] },
    FieldSpec { name: "status", rules: &[Rule::Required, Rule::Str] },
    // Skills arrive as a single delimited string; the handler splits it.
    FieldSpec { name: "skills", rules: &[Rule::Str] },
    FieldSpec { name: "bio", rules: &[Rule::Str] },
    FieldSpec { name: "githubUsername", rules: &[Rule::Str] },
];

const SOCIAL_FIELDS: &[&str] = &["youtube", "twitter", "linkedin", "instagram", "facebook"];

/// Profile upsert payload rules. Violations inside `social` are reported
/// under the leaf field name, not under `social`.
pub fn validate(payload: &Value) -> Result<(), ApiError> {
    let mut errors = check_fields(payload, RULES);

    match payload.get("social") {
        None | Some(Value::Null) => {}
        Some(social) if social.is_object() => {
            for field in SOCIAL_FIELDS {
                check_field(&mut errors, social.get(*field), field, &[Rule::Str]);
            }
        }
        Some(_) => {
            errors.insert("social".to_string(), "social must be an object".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}
