//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/projects` → Project endpoints (authenticated users); the dashboard
//!   group underneath carries its own role guard.

use crate::auth::guards::allow_authenticated;
use crate::routes::{health::health_routes, projects::projects_routes};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod health;
pub mod projects;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `AppState` baked in and mounts all route groups
/// under their respective base paths.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/projects",
            projects_routes(app_state).route_layer(from_fn(allow_authenticated)),
        )
}
