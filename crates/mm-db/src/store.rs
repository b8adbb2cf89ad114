//! Document store abstraction
//!
//! Collections of JSON documents queried through [`DocumentQuery`]. The
//! in-memory store evaluates queries in Rust; the PostgreSQL store
//! translates them to SQL over a JSONB column.
//!
//! Both backends apply the same equality rule: a query value is compared
//! numerically against a stored number (`age=34.0` matches `34`) and as
//! text otherwise, and a stored array matches when any element does.
//! Embedded documents need the same keys, each value equal by that rule.

use async_trait::async_trait;
use mm_queries::{DocumentQuery, FilterCriteria};
use serde_json::Value;

use crate::repository::{JsonDocument, RepositoryResult};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching the query, sorted, windowed and projected
    async fn find(&self, collection: &str, query: &DocumentQuery)
        -> RepositoryResult<Vec<JsonDocument>>;

    /// Number of documents matching the query's criteria (window ignored)
    async fn count(&self, collection: &str, query: &DocumentQuery) -> RepositoryResult<u64>;

    async fn find_by_id(&self, collection: &str, id: &str)
        -> RepositoryResult<Option<JsonDocument>>;

    /// First document matching the criteria, in insertion order
    async fn find_one(
        &self,
        collection: &str,
        criteria: &FilterCriteria,
    ) -> RepositoryResult<Option<JsonDocument>> {
        let query = DocumentQuery::matching(criteria.clone()).window(0, 1);
        Ok(self.find(collection, &query).await?.into_iter().next())
    }

    /// Insert a document, filling in `_id`, `__v` and `createdAt`
    async fn insert(&self, collection: &str, document: Value) -> RepositoryResult<JsonDocument>;

    /// Shallow-merge `changes` into a document; `None` when no such document
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: JsonDocument,
    ) -> RepositoryResult<Option<JsonDocument>>;

    /// Remove a document; `false` when no such document
    async fn delete(&self, collection: &str, id: &str) -> RepositoryResult<bool>;

    /// Check the backend is reachable
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}
