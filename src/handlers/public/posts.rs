use axum::extract::{Path, State};
use axum::response::Json;

use crate::db::{self, models::Post};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation;

/// GET /api/post - All posts, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = db::posts::find_all(&state.pool).await?;

    if posts.is_empty() {
        return Err(ApiError::not_found("no posts available"));
    }
    Ok(Json(posts))
}

/// GET /api/post/:id - One post by id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = validation::object_id(&id)?;

    let post = db::posts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("no post found with given id"))?;

    Ok(Json(post))
}
