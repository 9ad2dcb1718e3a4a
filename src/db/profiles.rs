use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{EducationEntry, ExperienceEntry, Profile, ProfileFields};
use super::DbError;

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, DbError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
}

pub async fn find_by_handle(pool: &PgPool, handle: &str) -> Result<Option<Profile>, DbError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE handle = $1")
        .bind(handle)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Profile>, DbError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles")
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
}

/// Is `handle` already claimed by a profile other than `own_user_id`'s?
pub async fn handle_taken(
    pool: &PgPool,
    handle: &str,
    own_user_id: Uuid,
) -> Result<bool, DbError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE handle = $1 AND user_id <> $2)",
    )
    .bind(handle)
    .bind(own_user_id)
    .fetch_one(pool)
    .await
    .map_err(DbError::from)
}

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    fields: &ProfileFields,
) -> Result<Profile, DbError> {
    sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles \
           (user_id, handle, company, website, location, status, skills, bio, github_username, social) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING *",
    )
    .bind(user_id)
    .bind(&fields.handle)
    .bind(&fields.company)
    .bind(&fields.website)
    .bind(&fields.location)
    .bind(&fields.status)
    .bind(&fields.skills)
    .bind(&fields.bio)
    .bind(&fields.github_username)
    .bind(Json(&fields.social))
    .fetch_one(pool)
    .await
    .map_err(super::translate)
}

pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    fields: &ProfileFields,
) -> Result<Profile, DbError> {
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles \
         SET handle = $2, company = $3, website = $4, location = $5, status = $6, \
             skills = $7, bio = $8, github_username = $9, social = $10 \
         WHERE user_id = $1 \
         RETURNING *",
    )
    .bind(user_id)
    .bind(&fields.handle)
    .bind(&fields.company)
    .bind(&fields.website)
    .bind(&fields.location)
    .bind(&fields.status)
    .bind(&fields.skills)
    .bind(&fields.bio)
    .bind(&fields.github_username)
    .bind(Json(&fields.social))
    .fetch_one(pool)
    .await
    .map_err(not_found_or_translate)
}

pub async fn save_experience(
    pool: &PgPool,
    user_id: Uuid,
    entries: &[ExperienceEntry],
) -> Result<Profile, DbError> {
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET experience = $2 WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(Json(entries))
    .fetch_one(pool)
    .await
    .map_err(not_found_or_translate)
}

pub async fn save_education(
    pool: &PgPool,
    user_id: Uuid,
    entries: &[EducationEntry],
) -> Result<Profile, DbError> {
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET education = $2 WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(Json(entries))
    .fetch_one(pool)
    .await
    .map_err(not_found_or_translate)
}

/// Removes only the profile document; the user row stays.
pub async fn delete_by_user(pool: &PgPool, user_id: Uuid) -> Result<(), DbError> {
    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

fn not_found_or_translate(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::RowNotFound => DbError::NotFound("there is no profile for this user".to_string()),
        other => super::translate(other),
    }
}
