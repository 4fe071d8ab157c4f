//! Handlers for the dashboard read endpoints.
//!
//! Each handler acquires a request connection, runs one or more aggregation
//! capabilities, releases the connection, and only then turns the outcome into
//! a response. Aggregation payloads are forwarded verbatim into the envelope.

use crate::response::{ApiResponse, ErrorResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::dashboard::DashboardError;
use serde_json::{Value, json};

fn ok(data: Value) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn fetch_failed(resource: &str, message: String) -> Response {
    tracing::error!(resource, error = %message, "dashboard query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::with_message(
            format!("Failed to fetch {resource}"),
            message,
        )),
    )
        .into_response()
}

/// GET /api/projects/dashboard/alerts
///
/// Attention items for the whole workspace: overdue and due-soon projects,
/// overdue and unassigned tasks.
///
/// ### Responses
/// - `200 OK` with the alert list
/// - `403 Forbidden` (non-admin/manager token, rejected by the route guard)
/// - `500 Internal Server Error` `{"error": "Failed to fetch alerts", "message": ...}`
pub async fn get_alerts(State(app_state): State<AppState>) -> Response {
    let handle = match app_state.acquire().await {
        Ok(handle) => handle,
        Err(e) => return fetch_failed("alerts", e.to_string()),
    };

    let result = app_state.queries().get_dashboard_alerts(handle.conn()).await;
    handle.release().await;

    match result {
        Ok(data) => ok(data),
        Err(e) => fetch_failed("alerts", e.to_string()),
    }
}

/// GET /api/projects/dashboard/recent
///
/// Project activity overview: the most recently updated projects, the top
/// performers by progress, and the projects carrying the most open tasks.
///
/// ### Responses
/// - `200 OK` `{"success": true, "data": {"recent": [...], "top_performers": [...], "high_task_load": [...]}}`
/// - `403 Forbidden` (rejected by the route guard)
/// - `500 Internal Server Error` `{"error": "Failed to fetch projects data", "message": ...}`
pub async fn get_recent(State(app_state): State<AppState>) -> Response {
    let handle = match app_state.acquire().await {
        Ok(handle) => handle,
        Err(e) => return fetch_failed("projects data", e.to_string()),
    };

    let queries = app_state.queries();
    let db = handle.conn();
    let result: Result<Value, DashboardError> = async {
        let recent = queries.get_dashboard_recent_projects(db).await?;
        let top_performers = queries.get_dashboard_top_projects(db).await?;
        let high_task_load = queries.get_dashboard_high_task_load_projects(db).await?;
        Ok(json!({
            "recent": recent,
            "top_performers": top_performers,
            "high_task_load": high_task_load,
        }))
    }
    .await;
    handle.release().await;

    match result {
        Ok(data) => ok(data),
        Err(e) => fetch_failed("projects data", e.to_string()),
    }
}

/// GET /api/projects/dashboard/summary
///
/// Headline KPI figures: project counts by status, overdue projects, task
/// totals, completion rate, and average progress.
///
/// ### Responses
/// - `200 OK` with the KPI object
/// - `403 Forbidden` (rejected by the route guard)
/// - `500 Internal Server Error` `{"error": "Failed to fetch summary data", "message": ...}`
pub async fn get_summary(State(app_state): State<AppState>) -> Response {
    let handle = match app_state.acquire().await {
        Ok(handle) => handle,
        Err(e) => return fetch_failed("summary data", e.to_string()),
    };

    let result = app_state.queries().get_dashboard_kpis(handle.conn()).await;
    handle.release().await;

    match result {
        Ok(data) => ok(data),
        Err(e) => fetch_failed("summary data", e.to_string()),
    }
}

/// GET /api/projects/dashboard/workload
///
/// Per-member open and overdue task counts, busiest members first.
///
/// ### Responses
/// - `200 OK` with the workload report
/// - `403 Forbidden` (rejected by the route guard)
/// - `500 Internal Server Error` `{"error": "Failed to fetch workload data", "message": ...}`
pub async fn get_workload(State(app_state): State<AppState>) -> Response {
    let handle = match app_state.acquire().await {
        Ok(handle) => handle,
        Err(e) => return fetch_failed("workload data", e.to_string()),
    };

    let result = app_state.queries().get_dashboard_workload(handle.conn()).await;
    handle.release().await;

    match result {
        Ok(data) => ok(data),
        Err(e) => fetch_failed("workload data", e.to_string()),
    }
}
