use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/user/register - Register a new account
///
/// Rejects an already-registered email (exact match on the stored value),
/// hashes the password, and answers with the created user's public fields.
/// The password never appears in a response.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    validation::user::validate(&payload)?;

    let input: RegisterRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("malformed registration payload: {}", e)))?;

    // Friendly pre-check; the unique index on email is the race backstop.
    if db::users::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(ApiError::conflict("a user with this email is already registered"));
    }

    let hash = auth::hash_password(input.password).await?;
    let user = db::users::insert(&state.pool, &input.name, &input.email, &hash).await?;

    tracing::info!("registered user {}", user.id);

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
    })))
}

/// POST /api/user/login - Exchange credentials for a bearer token
///
/// An unknown email and a wrong password fail with distinct signals, both
/// 404 per the public contract.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Value> {
    let user = db::users::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::not_found("no user registered with this email"))?;

    let valid = auth::verify_password(payload.password, user.password.clone()).await?;
    if !valid {
        return Err(ApiError::not_found("password incorrect"));
    }

    let token = auth::issue_token(&state.config.security, user.id, &user.name)?;

    Ok(Json(json!({ "token": format!("Bearer {}", token) })))
}
