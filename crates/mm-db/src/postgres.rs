//! PostgreSQL document store
//!
//! One table per collection, `(id TEXT PRIMARY KEY, data JSONB NOT NULL)`.
//! Tables are created on first use. Projection is applied after fetching.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::Row;
use tracing::instrument;

use mm_queries::DocumentQuery;

use crate::pool::Database;
use crate::repository::{
    document_id, prepare_insert, validate_collection, writable_changes, JsonDocument,
    RepositoryResult,
};
use crate::sql::{count_query, select_query};
use crate::store::DocumentStore;

pub struct PgStore {
    db: Database,
    ready: Mutex<HashSet<String>>,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            ready: Mutex::new(HashSet::new()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create the collection's table if it does not exist yet
    pub async fn ensure_collection(&self, collection: &str) -> RepositoryResult<()> {
        validate_collection(collection)?;
        if self.ready.lock().contains(collection) {
            return Ok(());
        }

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id TEXT PRIMARY KEY, data JSONB NOT NULL)",
            collection
        );
        sqlx::query(&sql).execute(self.db.pool()).await?;

        self.ready.lock().insert(collection.to_string());
        tracing::debug!(collection, "collection ready");
        Ok(())
    }
}

fn into_document(value: Json<Value>) -> Option<JsonDocument> {
    match value.0 {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    #[instrument(skip(self, query), fields(backend = "postgres"))]
    async fn find(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> RepositoryResult<Vec<JsonDocument>> {
        self.ensure_collection(collection).await?;

        let mut builder = select_query(collection, query);
        tracing::debug!(sql = builder.sql(), "find");
        let rows = builder.build().fetch_all(self.db.pool()).await?;

        let projection = query.projection();
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let data: Json<Value> = row.try_get("data")?;
            if let Some(doc) = into_document(data) {
                results.push(projection.apply(&doc));
            }
        }
        Ok(results)
    }

    async fn count(&self, collection: &str, query: &DocumentQuery) -> RepositoryResult<u64> {
        self.ensure_collection(collection).await?;

        let mut builder = count_query(collection, query);
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> RepositoryResult<Option<JsonDocument>> {
        self.ensure_collection(collection).await?;

        let sql = format!("SELECT data FROM \"{}\" WHERE id = $1", collection);
        let data: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(data.and_then(into_document))
    }

    #[instrument(skip(self, document), fields(backend = "postgres"))]
    async fn insert(&self, collection: &str, document: Value) -> RepositoryResult<JsonDocument> {
        self.ensure_collection(collection).await?;

        let document = prepare_insert(document)?;
        let id = document_id(&document)?.to_string();

        let sql = format!("INSERT INTO \"{}\" (id, data) VALUES ($1, $2)", collection);
        sqlx::query(&sql)
            .bind(&id)
            .bind(Json(&document))
            .execute(self.db.pool())
            .await?;

        tracing::debug!(id = %id, "document inserted");
        Ok(document)
    }

    #[instrument(skip(self, changes), fields(backend = "postgres"))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: JsonDocument,
    ) -> RepositoryResult<Option<JsonDocument>> {
        self.ensure_collection(collection).await?;

        let sql = format!(
            "UPDATE \"{}\" SET data = (data || $2) || jsonb_build_object('__v', \
             COALESCE((data ->> '__v')::bigint, 0) + 1) WHERE id = $1 RETURNING data",
            collection
        );
        let data: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(Json(Value::Object(writable_changes(changes))))
            .fetch_optional(self.db.pool())
            .await?;
        Ok(data.and_then(into_document))
    }

    #[instrument(skip(self), fields(backend = "postgres"))]
    async fn delete(&self, collection: &str, id: &str) -> RepositoryResult<bool> {
        self.ensure_collection(collection).await?;

        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", collection);
        let result = sqlx::query(&sql).bind(id).execute(self.db.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.db.ping().await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
