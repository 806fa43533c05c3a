use crate::DatabaseHandler;

/// The set of extension modules the module installer has enabled.
#[derive(sqlx::FromRow, Debug)]
pub struct InstalledModule {
    pub name: String,
}

impl InstalledModule {
    /// Returns false when the module was already recorded.
    pub async fn add(handler: &DatabaseHandler, name: &str) -> Result<bool, sqlx::Error> {
        let query = r#"INSERT INTO installed_modules VALUES ($1) ON CONFLICT(name) DO NOTHING"#;

        sqlx::query(query)
            .bind(name)
            .execute(&handler.pool)
            .await
            .map(|rows| rows.rows_affected() > 0)
    }

    pub async fn remove(handler: &DatabaseHandler, name: &str) -> Result<bool, sqlx::Error> {
        let query = r#"DELETE FROM installed_modules WHERE name = $1"#;

        sqlx::query(query)
            .bind(name)
            .execute(&handler.pool)
            .await
            .map(|rows| rows.rows_affected() > 0)
    }

    pub async fn list(handler: &DatabaseHandler) -> Result<Vec<String>, sqlx::Error> {
        let query = r#"SELECT name FROM installed_modules ORDER BY name"#;

        sqlx::query_scalar(query).fetch_all(&handler.pool).await
    }
}
