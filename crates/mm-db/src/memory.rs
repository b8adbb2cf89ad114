//! In-memory document store
//!
//! Used for development, tests and single-process deployments. Each
//! collection is a vector kept in insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use mm_core::types::ID_FIELD;
use mm_queries::DocumentQuery;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::instrument;

use crate::eval::{compare_docs, matches_all};
use crate::repository::{
    apply_update, document_id, prepare_insert, JsonDocument, RepositoryError, RepositoryResult,
};
use crate::store::DocumentStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<JsonDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Drop every collection
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    fn matching(&self, collection: &str, query: &DocumentQuery) -> Vec<JsonDocument> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_all(doc, query.criteria()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn has_id(doc: &JsonDocument, id: &str) -> bool {
    doc.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[instrument(skip(self, query), fields(backend = "memory"))]
    async fn find(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> RepositoryResult<Vec<JsonDocument>> {
        let mut docs = self.matching(collection, query);
        if !query.sort().is_empty() {
            docs.sort_by(|a, b| compare_docs(a, b, query.sort()));
        }

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = query
            .limit()
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        let projection = query.projection();
        let results: Vec<_> = docs
            .iter()
            .skip(skip)
            .take(limit)
            .map(|doc| projection.apply(doc))
            .collect();

        tracing::debug!(results = results.len(), "memory find");
        Ok(results)
    }

    async fn count(&self, collection: &str, query: &DocumentQuery) -> RepositoryResult<u64> {
        Ok(self.matching(collection, query).len() as u64)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> RepositoryResult<Option<JsonDocument>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    #[instrument(skip(self, document), fields(backend = "memory"))]
    async fn insert(&self, collection: &str, document: Value) -> RepositoryResult<JsonDocument> {
        let document = prepare_insert(document)?;
        let id = document_id(&document)?.to_string();

        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|doc| has_id(doc, &id)) {
            return Err(RepositoryError::InvalidDocument(format!(
                "duplicate {} '{}'",
                ID_FIELD, id
            )));
        }
        docs.push(document.clone());

        tracing::debug!(id = %id, "document inserted");
        Ok(document)
    }

    #[instrument(skip(self, changes), fields(backend = "memory"))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: JsonDocument,
    ) -> RepositoryResult<Option<JsonDocument>> {
        let mut collections = self.collections.write();
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(None);
        };

        apply_update(doc, changes);
        Ok(Some(doc.clone()))
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete(&self, collection: &str, id: &str) -> RepositoryResult<bool> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| !has_id(doc, id));
        Ok(docs.len() != before)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_queries::{FilterCriteria, Projection, QueryFeatures, RawQuery, SortOrder};
    use serde_json::json;

    async fn seed_mentors(store: &MemoryStore) {
        let people = [
            ("Ada", "mentor", 36, "2024-01-01T00:00:00.000Z"),
            ("Grace", "mentor", 45, "2024-02-01T00:00:00.000Z"),
            ("Linus", "mentor", 28, "2024-03-01T00:00:00.000Z"),
            ("Barbara", "mentee", 31, "2024-04-01T00:00:00.000Z"),
            ("Ken", "mentor", 30, "2024-05-01T00:00:00.000Z"),
        ];
        for (name, role, age, created) in people {
            store
                .insert(
                    "users",
                    json!({
                        "name": name,
                        "role": role,
                        "age": age,
                        "bio": format!("{name}'s bio"),
                        "email": format!("{}@example.com", name.to_lowercase()),
                        "createdAt": created,
                    }),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_mentor_listing_scenario() {
        let store = MemoryStore::new();
        seed_mentors(&store).await;

        let raw = RawQuery::parse(
            "role=mentor&age[gte]=30&sort=-createdAt&fields=name,bio&page=1&limit=2",
        )
        .unwrap();
        let query = QueryFeatures::new(DocumentQuery::new(), raw)
            .filter()
            .sort()
            .limit_fields()
            .paginate()
            .build();

        let docs = store.find("users", &query).await.unwrap();
        let names: Vec<_> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Ken", "Grace"]);

        for doc in &docs {
            let mut keys: Vec<_> = doc.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["_id", "bio", "name"]);
        }

        assert_eq!(store.count("users", &query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_second_page() {
        let store = MemoryStore::new();
        seed_mentors(&store).await;

        let raw = RawQuery::parse("role=mentor&sort=name&page=2&limit=2").unwrap();
        let query = QueryFeatures::new(DocumentQuery::new(), raw).apply_all().build();
        let docs = store.find("users", &query).await.unwrap();
        let names: Vec<_> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Ken", "Linus"]);
        assert!(docs.iter().all(|d| !d.contains_key("__v")));
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryStore::new();
        let doc = store
            .insert("users", json!({ "name": "Ada", "active": true }))
            .await
            .unwrap();
        let id = doc["_id"].as_str().unwrap().to_string();
        assert_eq!(store.len("users"), 1);

        let changes = json!({ "name": "Ada L.", "_id": "hijack" });
        let updated = store
            .update("users", &id, changes.as_object().cloned().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "Ada L.");
        assert_eq!(updated["_id"], id.as_str());
        assert_eq!(updated["__v"], 1);

        let found = store
            .find_one("users", &FilterCriteria::new().eq("name", "Ada L."))
            .await
            .unwrap();
        assert!(found.is_some());

        assert!(store.delete("users", &id).await.unwrap());
        assert!(!store.delete("users", &id).await.unwrap());
        assert!(store.find_by_id("users", &id).await.unwrap().is_none());
        assert!(store.update("users", &id, JsonDocument::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_rejected() {
        let store = MemoryStore::new();
        store.insert("users", json!({ "_id": "u1" })).await.unwrap();
        let err = store.insert("users", json!({ "_id": "u1" })).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let query = DocumentQuery::new()
            .order_by(SortOrder::newest_first())
            .project(Projection::without_version());
        assert!(store.find("nothing", &query).await.unwrap().is_empty());
        assert_eq!(store.count("nothing", &query).await.unwrap(), 0);
    }
}
