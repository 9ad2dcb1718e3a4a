use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod state;
mod validation;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("starting devlink-api in {:?} mode", config.environment);

    let pool = db::connect_lazy(&config.database)?;
    if let Err(e) = db::run_migrations(&pool).await {
        // The pool is lazy; a down database at boot only defers migrations.
        tracing::warn!("migrations not applied at startup: {}", e);
    }

    let state = AppState { config: Arc::new(config), pool };
    let port = state.config.server.port;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(user_routes())
        .merge(post_routes())
        .merge(profile_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/api/user/register", post(public::auth::register))
        .route("/api/user/login", post(public::auth::login))
        .route("/api/user/users", get(protected::auth::current_user))
}

fn post_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route(
            "/api/post",
            get(public::posts::list).post(protected::posts::create),
        )
        .route(
            "/api/post/:id",
            get(public::posts::get).delete(protected::posts::delete),
        )
        .route("/api/post/like/:id", post(protected::posts::like))
        .route("/api/post/comment/:id", post(protected::posts::comment_add))
        .route(
            "/api/post/comment/:id/:comment_id",
            delete(protected::posts::comment_delete),
        )
}

fn profile_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route(
            "/api/profile",
            get(protected::profiles::own)
                .post(protected::profiles::upsert)
                .delete(protected::profiles::delete_own),
        )
        .route("/api/profile/all", get(public::profiles::list_all))
        .route("/api/profile/handle/:handle", get(public::profiles::by_handle))
        .route("/api/profile/user/:user_id", get(public::profiles::by_user))
        .route(
            "/api/profile/experience",
            post(protected::profiles::experience_add),
        )
        .route(
            "/api/profile/experience/:exp_id",
            delete(protected::profiles::experience_delete),
        )
        .route(
            "/api/profile/education",
            post(protected::profiles::education_add),
        )
        .route(
            "/api/profile/education/:edu_id",
            delete(protected::profiles::education_delete),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "devlink-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "user": "/api/user/register, /api/user/login (public); /api/user/users (bearer)",
            "post": "/api/post[/:id] (public); create, like, comment (bearer)",
            "profile": "/api/profile/all, /handle/:handle, /user/:user_id (public); own profile (bearer)",
            "health": "/health (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match db::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string(),
            })),
        ),
    }
}
