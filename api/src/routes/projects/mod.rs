//! `/projects/...` route group.

use crate::auth::guards::allow_dashboard_viewer;
use crate::routes::projects::dashboard::dashboard_routes;
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod dashboard;

/// Builds the `/projects` route group.
///
/// The dashboard subtree is restricted to admin and manager tokens.
pub fn projects_routes(app_state: AppState) -> Router {
    Router::new().nest(
        "/dashboard",
        dashboard_routes(app_state).route_layer(from_fn(allow_dashboard_viewer)),
    )
}
