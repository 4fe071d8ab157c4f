//! `/projects/dashboard/...` route group.

use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

use get::{get_alerts, get_recent, get_summary, get_workload};

/// Builds the `/dashboard` route group.
///
/// All four endpoints are read-only aggregations over the workspace.
pub fn dashboard_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/alerts", get(get_alerts))
        .route("/recent", get(get_recent))
        .route("/summary", get(get_summary))
        .route("/workload", get(get_workload))
        .with_state(app_state)
}
