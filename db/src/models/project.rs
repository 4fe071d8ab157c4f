use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    pub description: Option<String>,

    pub status: Status,

    pub owner_id: i64,

    /// Completion percentage, 0..=100, maintained by the task workflow.
    pub progress: i32,

    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "on_hold")]
    OnHold,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::task::Entity")]
    Task,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when the project is still open but past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if matches!(self.status, Status::Completed | Status::Archived) {
            return false;
        }
        self.due_date.is_some_and(|due| due < now)
    }

    pub async fn create(
        db: &DbConn,
        name: &str,
        owner_id: i64,
        status: Status,
        progress: i32,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let project = ActiveModel {
            name: Set(name.to_string()),
            status: Set(status),
            owner_id: Set(owner_id),
            progress: Set(progress),
            due_date: Set(due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        project.insert(db).await
    }
}
