use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth;
use crate::db::{self, models::User};
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user, resolved from the bearer token on every protected
/// request. Carries no password field by construction.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Authentication gate. Extracts the bearer token, verifies it, and resolves
/// the encoded user id against the store; any failure is 401 and the handler
/// never runs. Re-executed independently per request: there is no session.
#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;

        let claims = auth::verify_token(&state.config.security, &token).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            ApiError::unauthorized("invalid or expired token")
        })?;

        let user = db::users::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!("token for unknown user {}", claims.sub);
                ApiError::unauthorized("user for this token no longer exists")
            })?;

        Ok(CurrentUser::from(user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use the Bearer scheme".to_string())
    }
}
