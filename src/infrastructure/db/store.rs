//! Structured-content store: typed JSON documents addressed by type and id.

use async_trait::async_trait;
use serde_json::Value;

use super::pool::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {doc_type}/{id} not found")]
    NotFound { doc_type: String, id: String },

    #[error("patch for {0} must be a JSON object")]
    InvalidPatch(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Returns the document body with `_id` and `_type` merged in.
    async fn find_document(&self, doc_type: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Shallow-merges the fields of `set` into an existing document.
    async fn patch_document(&self, doc_type: &str, id: &str, set: Value) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find_document(&self, doc_type: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let doc = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT body || jsonb_build_object('_id', id, '_type', doc_type)
            FROM documents
            WHERE doc_type = $1 AND id = $2
            "#,
        )
        .bind(doc_type)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    async fn patch_document(&self, doc_type: &str, id: &str, set: Value) -> Result<(), StoreError> {
        if !set.is_object() {
            return Err(StoreError::InvalidPatch(id.to_string()));
        }

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = body || $3, updated_at = NOW()
            WHERE doc_type = $1 AND id = $2
            "#,
        )
        .bind(doc_type)
        .bind(id)
        .bind(set)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                doc_type: doc_type.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}
