use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::debug;

pub mod model;

/// Database handler providing the SQLite connection for session state.
/// Helper methods for fetching, inserting and deleting rows live on the
/// model structs in [`model`].
pub struct DatabaseHandler {
    pub(crate) pool: SqlitePool,
}

impl DatabaseHandler {
    /// Opens the database at `path`, creating file and schema as needed.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let handler = DatabaseHandler { pool };
        handler.ensure_schema().await?;
        debug!("database ready at {path}");

        Ok(handler)
    }

    /// In-memory database. Tests use this.
    pub async fn new_in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;

        let handler = DatabaseHandler { pool };
        handler.ensure_schema().await?;

        Ok(handler)
    }

    async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS notes (
                name TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(r#"CREATE TABLE IF NOT EXISTS installed_modules (name TEXT PRIMARY KEY)"#)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
