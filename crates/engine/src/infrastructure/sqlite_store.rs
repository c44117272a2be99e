//! SQLite-backed document storage.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, Collection, DocumentStore, RepoError};

/// SQLite implementation of the document store: one table, one row per
/// `(collection, id)`, JSON bodies stored as text.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteDocumentStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("migrate", e))?;

        tracing::info!(path = db_path, "Opened SQLite document store");

        Ok(Self { pool, clock })
    }
}

fn decode(body: &str) -> Result<Value, RepoError> {
    serde_json::from_str(body).map_err(RepoError::serialization)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, RepoError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get", e))?;

        match row {
            Some(row) => {
                let body: String = row.get("body");
                Ok(Some(decode(&body)?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, collection: Collection, id: &str, document: Value) -> Result<(), RepoError> {
        let body = serde_json::to_string(&document).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("put", e))?;

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete", e))?;
        Ok(())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, RepoError> {
        let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY id")
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list", e))?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let body: String = row.get("body");
                Ok((id, decode(&body)?))
            })
            .collect()
    }
}
