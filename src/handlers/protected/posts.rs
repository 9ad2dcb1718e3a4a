use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{self, models::Comment, models::Post};
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
struct PostRequest {
    text: String,
}

/// POST /api/post - Create a post authored by the requester
///
/// The author's name is denormalized onto the post; any client-supplied name
/// is ignored.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<Value>,
) -> ApiResult<Post> {
    validation::post::validate(&payload)?;

    let input: PostRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed post payload: {}", e)))?;

    let post = db::posts::insert(&state.pool, user.id, &user.name, &input.text).await?;
    Ok(Json(post))
}

/// DELETE /api/post/:id - Author-only removal
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = validation::object_id(&id)?;
    let post = fetch(&state, id).await?;

    if post.user_id != user.id {
        return Err(ApiError::forbidden("only the author can delete a post"));
    }

    db::posts::delete(&state.pool, id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// POST /api/post/like/:id - Toggle the requester's like
///
/// A second like from the same user removes the first, so the set never holds
/// two entries for one user.
pub async fn like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let id = validation::object_id(&id)?;
    let post = fetch(&state, id).await?;

    let updated = if post.likes.contains(&user.id) {
        db::posts::remove_like(&state.pool, id, user.id).await?
    } else {
        db::posts::add_like(&state.pool, id, user.id).await?
    };

    Ok(Json(updated))
}

/// POST /api/post/comment/:id - Prepend a comment
pub async fn comment_add(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Post> {
    let id = validation::object_id(&id)?;
    validation::post::validate(&payload)?;

    let input: PostRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed comment payload: {}", e)))?;

    let post = fetch(&state, id).await?;

    let mut comments = post.comments.0;
    comments.insert(0, Comment::new(user.id, Some(user.name.clone()), input.text));

    let updated = db::posts::save_comments(&state.pool, id, &comments).await?;
    Ok(Json(updated))
}

/// DELETE /api/post/comment/:id/:comment_id - Post-author-only removal
pub async fn comment_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Post> {
    let id = validation::object_id(&id)?;
    let comment_id = validation::object_id(&comment_id)?;

    let post = fetch(&state, id).await?;
    if post.user_id != user.id {
        return Err(ApiError::forbidden("only the post author can remove comments"));
    }

    let mut comments = post.comments.0;
    let index = comments
        .iter()
        .position(|c| c.id == comment_id)
        .ok_or_else(|| ApiError::not_found("comment does not exist"))?;
    comments.remove(index);

    let updated = db::posts::save_comments(&state.pool, id, &comments).await?;
    Ok(Json(updated))
}

async fn fetch(state: &AppState, id: Uuid) -> Result<Post, ApiError> {
    db::posts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("no post found with given id"))
}
