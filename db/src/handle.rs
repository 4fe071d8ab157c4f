use sea_orm::DatabaseConnection;

/// Scoped handle to the database for a single request.
///
/// A request normally borrows the server-wide pool (`Shared`). When the server
/// runs without a shared pool (`DB_PER_REQUEST=true`), each request opens its
/// own connection (`Owned`) and is responsible for closing it via [`release`]
/// once the response has been composed, on every exit path.
///
/// [`release`]: DbHandle::release
pub enum DbHandle {
    /// Clone of the server-wide pool; releasing it is a no-op.
    Shared(DatabaseConnection),
    /// Connection opened for this request alone; releasing closes it.
    Owned(DatabaseConnection),
}

impl DbHandle {
    pub fn conn(&self) -> &DatabaseConnection {
        match self {
            DbHandle::Shared(conn) | DbHandle::Owned(conn) => conn,
        }
    }

    /// Whether this request opened (and therefore must close) the connection.
    pub fn owns_connection(&self) -> bool {
        matches!(self, DbHandle::Owned(_))
    }

    /// Releases the handle. Owned connections are closed; a close failure is
    /// logged rather than surfaced, since the response has already been built.
    pub async fn release(self) {
        if let DbHandle::Owned(conn) = self {
            if let Err(e) = conn.close().await {
                tracing::warn!(error = %e, "Failed to close request-owned database connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DbHandle;
    use sea_orm::{ConnectionTrait, Database, Statement};

    #[tokio::test]
    async fn shared_release_leaves_the_pool_usable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let handle = DbHandle::Shared(db.clone());
        assert!(!handle.owns_connection());
        handle.release().await;

        // The pool must survive the release.
        let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1");
        assert!(db.query_one(stmt).await.is_ok());
    }

    #[tokio::test]
    async fn owned_release_closes_the_connection() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let handle = DbHandle::Owned(db);
        assert!(handle.owns_connection());
        handle.release().await;
    }
}
