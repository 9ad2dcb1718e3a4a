use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Comment, Post};
use super::DbError;

/// Newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Post>, DbError> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DbError> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
}

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    text: &str,
) -> Result<Post, DbError> {
    sqlx::query_as::<_, Post>(
        "INSERT INTO posts (user_id, name, text) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(user_id)
    .bind(name)
    .bind(text)
    .fetch_one(pool)
    .await
    .map_err(DbError::from)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn add_like(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Post, DbError> {
    sqlx::query_as::<_, Post>(
        "UPDATE posts SET likes = array_append(likes, $2) WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(not_found_or_from)
}

pub async fn remove_like(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Post, DbError> {
    sqlx::query_as::<_, Post>(
        "UPDATE posts SET likes = array_remove(likes, $2) WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(not_found_or_from)
}

/// Replace the post's comment sequence wholesale; callers edit the sequence
/// in memory first.
pub async fn save_comments(
    pool: &PgPool,
    id: Uuid,
    comments: &[Comment],
) -> Result<Post, DbError> {
    sqlx::query_as::<_, Post>(
        "UPDATE posts SET comments = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(Json(comments))
    .fetch_one(pool)
    .await
    .map_err(not_found_or_from)
}

fn not_found_or_from(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::RowNotFound => DbError::NotFound("no post found with given id".to_string()),
        other => DbError::Sqlx(other),
    }
}
