use crate::DatabaseHandler;

/// A saved snippet of text, keyed by name across the whole session.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Note {
    pub name: String,
    pub content: String,
    pub created_at: i64,
}

impl Note {
    pub async fn get(handler: &DatabaseHandler, name: &str) -> anyhow::Result<Option<Self>> {
        let query = r#"SELECT * FROM notes WHERE name = $1"#;

        let result = sqlx::query_as(query).bind(name).fetch_one(&handler.pool).await;

        match result {
            Ok(v) => Ok(Some(v)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts the note, replacing any existing note of the same name.
    pub async fn set(&self, handler: &DatabaseHandler) -> Result<(), sqlx::Error> {
        let query = r#"INSERT INTO notes VALUES ($1, $2, $3)
            ON CONFLICT(name) DO UPDATE SET content = excluded.content, created_at = excluded.created_at"#;

        sqlx::query(query)
            .bind(&self.name)
            .bind(&self.content)
            .bind(self.created_at)
            .execute(&handler.pool)
            .await
            .map(|_| ())
    }

    pub async fn delete(handler: &DatabaseHandler, name: &str) -> Result<bool, sqlx::Error> {
        let query = r#"DELETE FROM notes WHERE name = $1"#;

        sqlx::query(query)
            .bind(name)
            .execute(&handler.pool)
            .await
            .map(|rows| rows.rows_affected() > 0)
    }

    pub async fn list_names(handler: &DatabaseHandler) -> Result<Vec<String>, sqlx::Error> {
        let query = r#"SELECT name FROM notes ORDER BY name"#;

        sqlx::query_scalar(query).fetch_all(&handler.pool).await
    }
}
