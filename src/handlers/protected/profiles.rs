use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{
    self,
    models::{EducationEntry, ExperienceEntry, Profile, ProfileFields, SocialLinks},
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRequest {
    handle: String,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    status: String,
    skills: Option<String>,
    bio: Option<String>,
    github_username: Option<String>,
    social: Option<SocialLinks>,
}

#[derive(Debug, Deserialize)]
struct ExperienceRequest {
    title: String,
    company: String,
    location: Option<String>,
    from: String,
    to: Option<String>,
    current: Option<bool>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EducationRequest {
    school: String,
    degree: String,
    field_of_study: String,
    from: String,
    to: Option<String>,
    current: Option<bool>,
    description: Option<String>,
}

/// GET /api/profile - The requester's own profile
pub async fn own(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Profile> {
    let profile = fetch_own(&state, user.id).await?;
    Ok(Json(profile))
}

/// POST /api/profile - Create the requester's profile, or update it in place
///
/// A handle change is re-checked for uniqueness against everyone else's
/// profiles; the unique index backs the check up under concurrency.
pub async fn upsert(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<Value>,
) -> ApiResult<Profile> {
    validation::profile::validate(&payload)?;

    let input: ProfileRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed profile payload: {}", e)))?;

    let fields = ProfileFields {
        handle: input.handle,
        company: input.company,
        website: input.website,
        location: input.location,
        status: input.status,
        skills: input.skills.as_deref().map(split_skills).unwrap_or_default(),
        bio: input.bio,
        github_username: input.github_username,
        social: input.social.unwrap_or_default(),
    };

    let existing = db::profiles::find_by_user(&state.pool, user.id).await?;

    let profile = match existing {
        Some(profile) => {
            if profile.handle != fields.handle
                && db::profiles::handle_taken(&state.pool, &fields.handle, user.id).await?
            {
                return Err(ApiError::conflict("handle already exists"));
            }
            db::profiles::update(&state.pool, user.id, &fields).await?
        }
        None => {
            if db::profiles::handle_taken(&state.pool, &fields.handle, user.id).await? {
                return Err(ApiError::conflict("handle already exists"));
            }
            db::profiles::insert(&state.pool, user.id, &fields).await?
        }
    };

    Ok(Json(profile))
}

/// POST /api/profile/experience - Append an experience entry
pub async fn experience_add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<Value>,
) -> ApiResult<Profile> {
    validation::entry::validate_experience(&payload)?;

    let input: ExperienceRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed experience payload: {}", e)))?;

    let from = parse_entry_date(&input.from)?;
    let to = parse_optional_date(input.to.as_deref())?;
    let entry = ExperienceEntry::new(
        input.title,
        input.company,
        input.location,
        from,
        to,
        input.current.unwrap_or(false),
        input.description,
    );

    let profile = fetch_own(&state, user.id).await?;
    let mut entries = profile.experience.0;
    entries.push(entry);

    let updated = db::profiles::save_experience(&state.pool, user.id, &entries).await?;
    Ok(Json(updated))
}

/// DELETE /api/profile/experience/:exp_id - Remove an entry by id
pub async fn experience_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    let exp_id = validation::object_id(&exp_id)?;

    let profile = fetch_own(&state, user.id).await?;
    let mut entries = profile.experience.0;
    let index = entries
        .iter()
        .position(|e| e.id == exp_id)
        .ok_or_else(|| ApiError::not_found("experience entry with given id doesn't exist"))?;
    entries.remove(index);

    let updated = db::profiles::save_experience(&state.pool, user.id, &entries).await?;
    Ok(Json(updated))
}

/// POST /api/profile/education - Append an education entry
pub async fn education_add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<Value>,
) -> ApiResult<Profile> {
    validation::entry::validate_education(&payload)?;

    let input: EducationRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed education payload: {}", e)))?;

    let from = parse_entry_date(&input.from)?;
    let to = parse_optional_date(input.to.as_deref())?;
    let entry = EducationEntry::new(
        input.school,
        input.degree,
        input.field_of_study,
        from,
        to,
        input.current.unwrap_or(false),
        input.description,
    );

    let profile = fetch_own(&state, user.id).await?;
    let mut entries = profile.education.0;
    entries.push(entry);

    let updated = db::profiles::save_education(&state.pool, user.id, &entries).await?;
    Ok(Json(updated))
}

/// DELETE /api/profile/education/:edu_id - Remove an entry by id
pub async fn education_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    let edu_id = validation::object_id(&edu_id)?;

    let profile = fetch_own(&state, user.id).await?;
    let mut entries = profile.education.0;
    let index = entries
        .iter()
        .position(|e| e.id == edu_id)
        .ok_or_else(|| ApiError::not_found("education entry with given id doesn't exist"))?;
    entries.remove(index);

    let updated = db::profiles::save_education(&state.pool, user.id, &entries).await?;
    Ok(Json(updated))
}

/// DELETE /api/profile - Remove the requester's profile document
pub async fn delete_own(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Value> {
    db::profiles::delete_by_user(&state.pool, user.id).await?;
    Ok(Json(json!({ "deleted": true })))
}

async fn fetch_own(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    db::profiles::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("there is no profile for this user"))
}

/// Skills arrive as one comma-delimited string and are stored as an ordered
/// sequence.
fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_entry_date(raw: &str) -> Result<chrono::NaiveDate, ApiError> {
    validation::parse_date(raw).ok_or_else(|| ApiError::bad_request("from must be a valid date"))
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    match raw {
        Some(s) if !s.is_empty() => validation::parse_date(s)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("to must be a valid date")),
        _ => Ok(None),
    }
}
