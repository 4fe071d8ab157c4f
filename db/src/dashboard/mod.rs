//! Aggregation layer behind the dashboard endpoints.
//!
//! The HTTP handlers treat these capabilities as black boxes: each returns an
//! already-serialized [`serde_json::Value`] that is forwarded verbatim into
//! the response envelope, or a [`DashboardError`] that the handlers map to a
//! 500 response.

mod repository;

pub use repository::DashboardRepository;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::Value;
use thiserror::Error;

/// Failure raised by the aggregation layer.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Db(#[from] DbErr),

    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

/// The aggregation capabilities consumed by the dashboard routes.
///
/// Kept behind a trait so the HTTP layer can be exercised against an
/// injected implementation in tests.
#[async_trait]
pub trait DashboardQueries: Send + Sync {
    /// Attention items: overdue/due-soon projects, overdue and unassigned tasks.
    async fn get_dashboard_alerts(&self, db: &DatabaseConnection)
    -> Result<Value, DashboardError>;

    /// The most recently updated projects.
    async fn get_dashboard_recent_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError>;

    /// Open projects with the highest completion progress.
    async fn get_dashboard_top_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError>;

    /// Projects carrying the most open tasks.
    async fn get_dashboard_high_task_load_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError>;

    /// Headline KPI figures for the whole workspace.
    async fn get_dashboard_kpis(&self, db: &DatabaseConnection) -> Result<Value, DashboardError>;

    /// Per-member open/overdue task counts, busiest first.
    async fn get_dashboard_workload(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError>;
}
