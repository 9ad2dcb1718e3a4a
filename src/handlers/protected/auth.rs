use axum::response::Json;

use crate::middleware::CurrentUser;

/// GET /api/user/users - The authenticated user's public fields
pub async fn current_user(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
