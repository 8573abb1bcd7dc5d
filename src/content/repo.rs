use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use crate::content::dto::Content;
use crate::error::{is_unique_violation, DataError};

/// Data-access contract for content blocks, looked up by key.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// `Ok(None)` when the key is absent. A missing table is
    /// `Err(SchemaMissing)`, never `None`.
    async fn get(&self, key: &str) -> Result<Option<Content>, DataError>;

    /// Update by key, inserting when no row matched.
    async fn upsert(&self, key: &str, content: &str) -> Result<Content, DataError>;

    /// Every block, ordered by key.
    async fn list(&self) -> Result<Vec<Content>, DataError>;
}

#[derive(Clone)]
pub struct PgContentRepo {
    db: PgPool,
}

impl PgContentRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn update_existing(&self, key: &str, content: &str) -> Result<Option<Content>, sqlx::Error> {
        sqlx::query_as::<_, Content>(
            r#"
            UPDATE content
            SET content    = $2,
                updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
            WHERE key = $1
            RETURNING id, key, content, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(content)
        .fetch_optional(&self.db)
        .await
    }
}

#[async_trait]
impl ContentRepo for PgContentRepo {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Content>, DataError> {
        let row = sqlx::query_as::<_, Content>(
            r#"
            SELECT id, key, content, created_at, updated_at
            FROM content
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    #[instrument(skip(self, content))]
    async fn upsert(&self, key: &str, content: &str) -> Result<Content, DataError> {
        if let Some(updated) = self.update_existing(key, content).await? {
            debug!(key, "content updated");
            return Ok(updated);
        }

        let inserted = sqlx::query_as::<_, Content>(
            r#"
            INSERT INTO content (key, content)
            VALUES ($1, $2)
            RETURNING id, key, content, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(content)
        .fetch_one(&self.db)
        .await;

        match inserted {
            Ok(row) => {
                debug!(key, "content inserted");
                Ok(row)
            }
            // A concurrent writer inserted the key first; apply ours on top.
            Err(e) if is_unique_violation(&e) => {
                warn!(key, "content insert raced; retrying as update");
                self.update_existing(key, content)
                    .await?
                    .ok_or_else(|| DataError::not_found("content"))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Content>, DataError> {
        let rows = sqlx::query_as::<_, Content>(
            r#"
            SELECT id, key, content, created_at, updated_at
            FROM content
            ORDER BY key
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
