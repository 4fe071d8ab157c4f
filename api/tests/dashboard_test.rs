mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use helpers::{MockDashboard, make_app, make_owned_mode_app};
use serde_json::{Value, json};
use serial_test::serial;
use tower::ServiceExt;

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[serial]
async fn missing_token_is_unauthorized() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;

    let response = app
        .oneshot(get("/api/projects/dashboard/alerts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Authentication required");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
#[serial]
async fn unprivileged_roles_are_forbidden_with_fixed_body() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;

    for role in ["member", "editor"] {
        let (token, _) = api::auth::generate_jwt(7, Some(role));

        let response = app
            .clone()
            .oneshot(get("/api/projects/dashboard/summary", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(
            json,
            json!({"error": "Unauthorized. Admin or Manager role required."})
        );
    }

    // The aggregation layer is never touched on the deny path.
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
#[serial]
async fn missing_role_claim_is_forbidden() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(7, None);

    let response = app
        .oneshot(get("/api/projects/dashboard/workload", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Unauthorized. Admin or Manager role required."
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
#[serial]
async fn admin_gets_alerts_verbatim() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(1, Some("admin"));

    let response = app
        .oneshot(get("/api/projects/dashboard/alerts", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"success": true, "data": {"overdue": 3}}));
    assert_eq!(mock.call_count(), 1);
    // Pooled mode: releasing the request handle leaves the shared pool open.
    assert!(mock.last_connection_is_usable().await);
}

#[tokio::test]
#[serial]
async fn owned_connection_is_released_on_success_and_failure() {
    let mock = MockDashboard::failing("workload");
    let app = make_owned_mode_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(1, Some("admin"));

    // Success branch: the request opens its own connection and closes it
    // after composing the response.
    let response = app
        .clone()
        .oneshot(get("/api/projects/dashboard/alerts", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!mock.last_connection_is_usable().await);

    // Failure branch: the connection is released all the same.
    let response = app
        .oneshot(get("/api/projects/dashboard/workload", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch workload data");
    assert!(!mock.last_connection_is_usable().await);
}

#[tokio::test]
#[serial]
async fn manager_gets_composed_recent_payload() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(2, Some("manager"));

    let response = app
        .oneshot(get("/api/projects/dashboard/recent", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["recent"], json!([{"id": 1, "name": "Atlas"}]));
    assert_eq!(
        json["data"]["top_performers"],
        json!([{"id": 2, "name": "Borealis"}])
    );
    assert_eq!(
        json["data"]["high_task_load"],
        json!([{"id": 3, "name": "Cascade", "open_tasks": 9}])
    );
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
#[serial]
async fn recent_failure_reports_projects_data() {
    let mock = MockDashboard::failing("recent");
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(2, Some("manager"));

    let response = app
        .oneshot(get("/api/projects/dashboard/recent", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch projects data");
    assert_eq!(json["message"], "Custom Error: DB timeout");
}

#[tokio::test]
#[serial]
async fn alerts_failure_reports_alerts() {
    let mock = MockDashboard::failing("alerts");
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(1, Some("admin"));

    let response = app
        .oneshot(get("/api/projects/dashboard/alerts", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch alerts");
    assert_eq!(json["message"], "Custom Error: DB timeout");
}

#[tokio::test]
#[serial]
async fn summary_returns_kpis() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(1, Some("admin"));

    let response = app
        .oneshot(get("/api/projects/dashboard/summary", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({"total_projects": 4, "completion_rate": 75.0})
    );
}

#[tokio::test]
#[serial]
async fn summary_failure_reports_summary_data() {
    let mock = MockDashboard::failing("kpis");
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(1, Some("admin"));

    let response = app
        .oneshot(get("/api/projects/dashboard/summary", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch summary data");
}

#[tokio::test]
#[serial]
async fn workload_returns_report() {
    let mock = MockDashboard::new();
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(2, Some("manager"));

    let response = app
        .oneshot(get("/api/projects/dashboard/workload", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({"members": [], "total_open_tasks": 0, "unassigned_open_tasks": 0})
    );
}

#[tokio::test]
#[serial]
async fn workload_failure_reports_workload_data() {
    let mock = MockDashboard::failing("workload");
    let app = make_app(mock.clone()).await;
    let (token, _) = api::auth::generate_jwt(2, Some("manager"));

    let response = app
        .oneshot(get("/api/projects/dashboard/workload", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch workload data");
    assert_eq!(json["message"], "Custom Error: DB timeout");
}

#[tokio::test]
#[serial]
async fn health_check_is_public() {
    let mock = MockDashboard::new();
    let app = make_app(mock).await;

    let response = app.oneshot(get("/api/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"success": true, "data": "OK"}));
}
