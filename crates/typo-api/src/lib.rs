//! HTTP layer for Typo Payments: session handling, auth guards, route
//! handlers and server-rendered pages.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feedback;
pub mod flash;
pub mod middleware;
pub mod payments;
pub mod session;
pub mod views;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::error;

use typo_db::{Database, DbError};
use typo_types::api::HealthResponse;

use crate::error::AppError;
use crate::middleware::{require_admin, require_auth};
use crate::session::SessionConfig;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session: SessionConfig,
}

/// Run a database call on the blocking pool. The pooled connection is
/// acquired and released inside the closure's thread.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            AppError::Join(e)
        })?
        .map_err(AppError::from)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::index))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/health", get(health));

    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/users", get(admin::users))
        .route(
            "/admin/create-user",
            get(admin::create_user_form).post(admin::create_user),
        )
        .route("/admin/toggle-admin/{user_id}", post(admin::toggle_admin))
        .route("/admin/delete-user/{user_id}", post(admin::delete_user))
        .route("/admin/reset-database", post(admin::reset_database))
        .layer(axum::middleware::from_fn(require_admin));

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route("/profile", get(auth::profile))
        .route("/dashboard", get(payments::dashboard))
        .route("/search", get(payments::search))
        .route("/status", get(payments::status))
        .route("/feedback", get(feedback::list).post(feedback::submit))
        .merge(admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
