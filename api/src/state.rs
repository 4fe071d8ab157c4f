use db::DbHandle;
use db::dashboard::{DashboardQueries, DashboardRepository};
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;
use util::config;

/// Shared application state handed to every route.
///
/// Holds the optional process-wide connection pool and the dashboard
/// aggregation backend. The backend sits behind a trait object so tests can
/// swap in an instrumented implementation.
#[derive(Clone)]
pub struct AppState {
    pool: Option<DatabaseConnection>,
    queries: Arc<dyn DashboardQueries>,
}

impl AppState {
    pub fn new(pool: Option<DatabaseConnection>) -> Self {
        Self {
            pool,
            queries: Arc::new(DashboardRepository::new()),
        }
    }

    /// State with an injected aggregation backend, for tests.
    pub fn with_queries(pool: Option<DatabaseConnection>, queries: Arc<dyn DashboardQueries>) -> Self {
        Self { pool, queries }
    }

    pub fn queries(&self) -> &dyn DashboardQueries {
        self.queries.as_ref()
    }

    /// Hands out the connection a request should use.
    ///
    /// In pooled mode this is a cheap clone of the shared pool. With
    /// `DB_PER_REQUEST` set (or no pool at startup) each request opens its own
    /// connection and owns it; the handler must [`DbHandle::release`] it once
    /// the response body is composed.
    pub async fn acquire(&self) -> Result<DbHandle, DbErr> {
        match &self.pool {
            Some(pool) if !config::db_per_request() => Ok(DbHandle::Shared(pool.clone())),
            _ => Ok(DbHandle::Owned(db::try_connect().await?)),
        }
    }
}
