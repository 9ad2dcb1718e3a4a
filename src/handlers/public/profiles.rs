use axum::extract::{Path, State};
use axum::response::Json;

use crate::db::{self, models::Profile};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation;

/// GET /api/profile/all - Every profile
pub async fn list_all(State(state): State<AppState>) -> ApiResult<Vec<Profile>> {
    let profiles = db::profiles::find_all(&state.pool).await?;

    if profiles.is_empty() {
        return Err(ApiError::not_found("there are no profiles"));
    }
    Ok(Json(profiles))
}

/// GET /api/profile/handle/:handle - Profile by public handle
pub async fn by_handle(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> ApiResult<Profile> {
    let profile = db::profiles::find_by_handle(&state.pool, &handle)
        .await?
        .ok_or_else(|| ApiError::not_found("there is no profile for this user"))?;

    Ok(Json(profile))
}

/// GET /api/profile/user/:user_id - Profile by owner id
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Profile> {
    let user_id = validation::object_id(&user_id)?;

    let profile = db::profiles::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("there is no profile for this user"))?;

    Ok(Json(profile))
}
