pub mod dashboard;
pub mod handle;
pub mod models;
pub mod test_utils;

pub use handle::DbHandle;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Opens a database connection using `DATABASE_PATH` from configuration.
///
/// The value may be a full DSN (`sqlite:`, `postgres://`, `mysql://`) or a
/// plain SQLite file path, in which case intermediate directories are created.
pub async fn try_connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config::database_path();
    let url = if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url
    } else {
        // Ensure parent directory exists (SQLite won't create intermediate dirs).
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}")
    };

    Database::connect(&url).await
}

/// Like [`try_connect`], but panics on failure. Intended for server startup.
pub async fn connect() -> DatabaseConnection {
    try_connect().await.expect("Failed to connect to database")
}
