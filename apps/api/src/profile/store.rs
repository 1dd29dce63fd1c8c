//! Document storage: one JSON document per user, no schema enforcement.
//! Profile invariants are enforced by [`UserRepository`](super::repository::UserRepository).

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no document for user {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `doc` unless the user already has a document; returns whichever
    /// document is stored afterwards.
    async fn create_if_absent(&self, user_id: &str, doc: Value) -> Result<Value, StoreError>;

    /// Overwrites the given top-level fields, leaving the others untouched.
    async fn merge_fields(&self, user_id: &str, fields: Map<String, Value>)
        -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres (JSONB)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError> {
        let row: Option<Json<Value>> =
            sqlx::query_scalar("SELECT data FROM user_documents WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(data)| data))
    }

    async fn create_if_absent(&self, user_id: &str, doc: Value) -> Result<Value, StoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let Json(stored): Json<Value> = sqlx::query_scalar(
            r#"
            INSERT INTO user_documents (user_id, data)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING data
            "#,
        )
        .bind(user_id)
        .bind(Json(doc))
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn merge_fields(
        &self,
        user_id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE user_documents SET data = data || $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(user_id.to_string()));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (development without DATABASE_URL, tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Value>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.read().await.get(user_id).cloned())
    }

    async fn create_if_absent(&self, user_id: &str, doc: Value) -> Result<Value, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .entry(user_id.to_string())
            .or_insert(doc)
            .clone())
    }

    async fn merge_fields(
        &self,
        user_id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let doc = documents
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;

        match doc {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        Ok(())
    }
}
