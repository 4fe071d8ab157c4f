use api::routes::routes;
use api::state::AppState;
use async_trait::async_trait;
use axum::Router;
use db::dashboard::{DashboardError, DashboardQueries};
use db::test_utils::setup_test_db;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sets the environment the config singleton needs and reloads it.
///
/// Must run before anything touches `util::config`, hence tests in this
/// suite are `#[serial]`.
pub fn bootstrap_config() {
    unsafe {
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("JWT_DURATION_MINUTES", "60");
        std::env::set_var("DATABASE_PATH", "test.db");
        std::env::set_var("DB_PER_REQUEST", "false");
    }
    util::config::AppConfig::reset();
}

/// Instrumented [`DashboardQueries`] implementation.
///
/// Returns fixed identity payloads so tests can assert that handlers forward
/// aggregation results verbatim, counts every invocation, records the
/// connection each call ran on, and can be told to fail a single capability.
pub struct MockDashboard {
    pub calls: AtomicUsize,
    fail_on: Option<&'static str>,
    seen_db: Mutex<Option<DatabaseConnection>>,
}

impl MockDashboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
            seen_db: Mutex::new(None),
        })
    }

    /// A mock whose named capability fails with a "DB timeout" error.
    pub fn failing(capability: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(capability),
            seen_db: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Runs a probe query on the connection the last capability call saw.
    ///
    /// In pooled mode the shared pool outlives the request, so this succeeds.
    /// In per-request mode the handler owns the connection and closes it on
    /// release, so this fails once the response has been produced.
    pub async fn last_connection_is_usable(&self) -> bool {
        let db = self.seen_db.lock().unwrap().take();
        let Some(db) = db else {
            return false;
        };
        let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1");
        db.query_one(stmt).await.is_ok()
    }

    fn respond(
        &self,
        capability: &'static str,
        db: &DatabaseConnection,
        payload: Value,
    ) -> Result<Value, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_db.lock().unwrap() = Some(db.clone());
        if self.fail_on == Some(capability) {
            return Err(DashboardError::Db(DbErr::Custom("DB timeout".into())));
        }
        Ok(payload)
    }
}

#[async_trait]
impl DashboardQueries for MockDashboard {
    async fn get_dashboard_alerts(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        self.respond("alerts", db, json!({"overdue": 3}))
    }

    async fn get_dashboard_recent_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        self.respond("recent", db, json!([{"id": 1, "name": "Atlas"}]))
    }

    async fn get_dashboard_top_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        self.respond("top", db, json!([{"id": 2, "name": "Borealis"}]))
    }

    async fn get_dashboard_high_task_load_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        self.respond("load", db, json!([{"id": 3, "name": "Cascade", "open_tasks": 9}]))
    }

    async fn get_dashboard_kpis(&self, db: &DatabaseConnection) -> Result<Value, DashboardError> {
        self.respond("kpis", db, json!({"total_projects": 4, "completion_rate": 75.0}))
    }

    async fn get_dashboard_workload(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        self.respond(
            "workload",
            db,
            json!({"members": [], "total_open_tasks": 0, "unassigned_open_tasks": 0}),
        )
    }
}

/// Builds the full application router against an in-memory database and the
/// given aggregation backend.
pub async fn make_app(queries: Arc<dyn DashboardQueries>) -> Router {
    bootstrap_config();
    let db = setup_test_db().await;
    let state = AppState::with_queries(Some(db), queries);
    Router::new().nest("/api", routes(state))
}

/// Builds the router in per-request connection mode: no pool at startup, so
/// every request opens a connection it owns and must release.
pub async fn make_owned_mode_app(queries: Arc<dyn DashboardQueries>) -> Router {
    let db_file = std::env::temp_dir().join("dashboard_owned_mode.db");
    let _ = std::fs::remove_file(&db_file);
    unsafe {
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("JWT_DURATION_MINUTES", "60");
        std::env::set_var(
            "DATABASE_PATH",
            format!("sqlite://{}?mode=rwc", db_file.display()),
        );
        std::env::set_var("DB_PER_REQUEST", "true");
    }
    util::config::AppConfig::reset();

    let state = AppState::with_queries(None, queries);
    Router::new().nest("/api", routes(state))
}
