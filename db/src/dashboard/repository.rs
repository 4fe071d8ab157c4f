use super::{DashboardError, DashboardQueries};
use crate::models::{project, task, user};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, Order, QueryOrder};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// How many projects the recent/top/high-load lists carry.
const PROJECT_LIST_LIMIT: usize = 5;

/// Window for "due soon" alerts.
const DUE_SOON_DAYS: i64 = 7;

// ---------- Response DTOs ----------

#[derive(Debug, Serialize)]
struct DashboardAlert {
    severity: &'static str,
    category: &'static str,
    message: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ProjectSummary {
    id: i64,
    name: String,
    status: project::Status,
    progress: i32,
    due_date: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl From<&project::Model> for ProjectSummary {
    fn from(p: &project::Model) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            status: p.status.clone(),
            progress: p.progress,
            due_date: p.due_date,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectTaskLoad {
    id: i64,
    name: String,
    open_tasks: usize,
}

#[derive(Debug, Serialize)]
struct DashboardKpis {
    total_projects: usize,
    active_projects: usize,
    on_hold_projects: usize,
    completed_projects: usize,
    overdue_projects: usize,
    total_tasks: usize,
    open_tasks: usize,
    completed_tasks: usize,
    completion_rate: f64, // %
    avg_progress: f64,    // %
}

#[derive(Debug, Serialize)]
struct MemberWorkload {
    user_id: i64,
    username: String,
    open_tasks: usize,
    overdue_tasks: usize,
}

#[derive(Debug, Serialize)]
struct WorkloadReport {
    members: Vec<MemberWorkload>,
    total_open_tasks: usize,
    unassigned_open_tasks: usize,
}

#[inline]
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// SeaORM-backed implementation of [`DashboardQueries`].
///
/// Queries fetch the relevant rows and aggregate in Rust; dashboard data sets
/// are small and this keeps the SQL portable across backends.
#[derive(Debug, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DashboardQueries for DashboardRepository {
    async fn get_dashboard_alerts(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        let now = Utc::now();
        let projects = project::Entity::find().all(db).await?;
        let tasks = task::Entity::find().all(db).await?;

        let overdue_projects = projects.iter().filter(|p| p.is_overdue(now)).count();
        let due_soon = projects
            .iter()
            .filter(|p| {
                !p.is_overdue(now)
                    && !matches!(
                        p.status,
                        project::Status::Completed | project::Status::Archived
                    )
                    && p.due_date
                        .is_some_and(|due| due >= now && due <= now + Duration::days(DUE_SOON_DAYS))
            })
            .count();
        let overdue_tasks = tasks.iter().filter(|t| t.is_overdue(now)).count();
        let unassigned_tasks = tasks
            .iter()
            .filter(|t| t.is_open() && t.assigned_to.is_none())
            .count();

        let mut alerts = Vec::new();
        if overdue_projects > 0 {
            alerts.push(DashboardAlert {
                severity: "critical",
                category: "overdue_projects",
                message: format!("{} project(s) past their due date", overdue_projects),
                count: overdue_projects,
            });
        }
        if overdue_tasks > 0 {
            alerts.push(DashboardAlert {
                severity: "critical",
                category: "overdue_tasks",
                message: format!("{} task(s) past their due date", overdue_tasks),
                count: overdue_tasks,
            });
        }
        if due_soon > 0 {
            alerts.push(DashboardAlert {
                severity: "warning",
                category: "due_soon",
                message: format!("{} project(s) due within {} days", due_soon, DUE_SOON_DAYS),
                count: due_soon,
            });
        }
        if unassigned_tasks > 0 {
            alerts.push(DashboardAlert {
                severity: "info",
                category: "unassigned_tasks",
                message: format!("{} open task(s) without an assignee", unassigned_tasks),
                count: unassigned_tasks,
            });
        }

        Ok(serde_json::to_value(alerts)?)
    }

    async fn get_dashboard_recent_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        let projects = project::Entity::find()
            .order_by(project::Column::UpdatedAt, Order::Desc)
            .order_by(project::Column::Id, Order::Desc)
            .all(db)
            .await?;

        let recent: Vec<ProjectSummary> = projects
            .iter()
            .take(PROJECT_LIST_LIMIT)
            .map(ProjectSummary::from)
            .collect();

        Ok(serde_json::to_value(recent)?)
    }

    async fn get_dashboard_top_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        let mut projects: Vec<project::Model> = project::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .filter(|p| !matches!(p.status, project::Status::Archived))
            .collect();

        projects.sort_by(|a, b| {
            b.progress
                .cmp(&a.progress)
                .then(b.updated_at.cmp(&a.updated_at))
        });

        let top: Vec<ProjectSummary> = projects
            .iter()
            .take(PROJECT_LIST_LIMIT)
            .map(ProjectSummary::from)
            .collect();

        Ok(serde_json::to_value(top)?)
    }

    async fn get_dashboard_high_task_load_projects(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        let projects = project::Entity::find().all(db).await?;
        let tasks = task::Entity::find().all(db).await?;

        let mut open_by_project: HashMap<i64, usize> = HashMap::new();
        for t in tasks.iter().filter(|t| t.is_open()) {
            *open_by_project.entry(t.project_id).or_default() += 1;
        }

        let mut loads: Vec<ProjectTaskLoad> = projects
            .iter()
            .filter_map(|p| {
                let open_tasks = open_by_project.get(&p.id).copied().unwrap_or(0);
                (open_tasks > 0).then(|| ProjectTaskLoad {
                    id: p.id,
                    name: p.name.clone(),
                    open_tasks,
                })
            })
            .collect();

        loads.sort_by(|a, b| b.open_tasks.cmp(&a.open_tasks).then(a.id.cmp(&b.id)));
        loads.truncate(PROJECT_LIST_LIMIT);

        Ok(serde_json::to_value(loads)?)
    }

    async fn get_dashboard_kpis(&self, db: &DatabaseConnection) -> Result<Value, DashboardError> {
        let now = Utc::now();
        let projects = project::Entity::find().all(db).await?;
        let tasks = task::Entity::find().all(db).await?;

        let total_projects = projects.len();
        let active_projects = projects
            .iter()
            .filter(|p| matches!(p.status, project::Status::Active))
            .count();
        let on_hold_projects = projects
            .iter()
            .filter(|p| matches!(p.status, project::Status::OnHold))
            .count();
        let completed_projects = projects
            .iter()
            .filter(|p| matches!(p.status, project::Status::Completed))
            .count();
        let overdue_projects = projects.iter().filter(|p| p.is_overdue(now)).count();

        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| !t.is_open()).count();
        let open_tasks = total_tasks - completed_tasks;

        let completion_rate = if total_tasks == 0 {
            0.0
        } else {
            (completed_tasks as f64 / total_tasks as f64) * 100.0
        };
        let avg_progress = if projects.is_empty() {
            0.0
        } else {
            projects.iter().map(|p| p.progress as f64).sum::<f64>() / projects.len() as f64
        };

        let kpis = DashboardKpis {
            total_projects,
            active_projects,
            on_hold_projects,
            completed_projects,
            overdue_projects,
            total_tasks,
            open_tasks,
            completed_tasks,
            completion_rate: round1(completion_rate),
            avg_progress: round1(avg_progress),
        };

        Ok(serde_json::to_value(kpis)?)
    }

    async fn get_dashboard_workload(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Value, DashboardError> {
        let now = Utc::now();
        let users = user::Entity::find().all(db).await?;
        let tasks = task::Entity::find().all(db).await?;

        let mut open_by_user: HashMap<i64, usize> = HashMap::new();
        let mut overdue_by_user: HashMap<i64, usize> = HashMap::new();
        let mut unassigned_open_tasks = 0usize;

        for t in tasks.iter().filter(|t| t.is_open()) {
            match t.assigned_to {
                Some(uid) => {
                    *open_by_user.entry(uid).or_default() += 1;
                    if t.is_overdue(now) {
                        *overdue_by_user.entry(uid).or_default() += 1;
                    }
                }
                None => unassigned_open_tasks += 1,
            }
        }

        let total_open_tasks = tasks.iter().filter(|t| t.is_open()).count();

        let mut members: Vec<MemberWorkload> = users
            .iter()
            .map(|u| MemberWorkload {
                user_id: u.id,
                username: u.username.clone(),
                open_tasks: open_by_user.get(&u.id).copied().unwrap_or(0),
                overdue_tasks: overdue_by_user.get(&u.id).copied().unwrap_or(0),
            })
            .collect();

        members.sort_by(|a, b| {
            b.open_tasks
                .cmp(&a.open_tasks)
                .then(b.overdue_tasks.cmp(&a.overdue_tasks))
                .then(a.user_id.cmp(&b.user_id))
        });

        let report = WorkloadReport {
            members,
            total_open_tasks,
            unassigned_open_tasks,
        };

        Ok(serde_json::to_value(report)?)
    }
}
