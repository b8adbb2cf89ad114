//! Session repository
//!
//! Typed access to the `sessions` collection.

use std::sync::Arc;

use mm_core::traits::Document;
use mm_core::types::ID_FIELD;
use mm_models::{NewSession, Role, Session};
use mm_queries::{DocumentQuery, FilterCriteria};

use crate::repository::{from_document, JsonDocument, RepositoryResult};
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn DocumentStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Sessions in which `user_id` takes part with `role`.
    ///
    /// Admins are not participants, so they get `None`.
    pub fn participant_criteria(role: Role, user_id: &str) -> Option<FilterCriteria> {
        role.session_field()
            .map(|field| FilterCriteria::new().eq(field, user_id))
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Session>> {
        self.store
            .find_by_id(Session::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Find a session by id that belongs to the given mentor
    pub async fn find_for_mentor(
        &self,
        id: &str,
        mentor_id: &str,
    ) -> RepositoryResult<Option<Session>> {
        let criteria = FilterCriteria::new().eq(ID_FIELD, id).eq("mentor", mentor_id);
        self.store
            .find_one(Session::COLLECTION, &criteria)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn create(&self, session: NewSession) -> RepositoryResult<Session> {
        let value = serde_json::to_value(&session)?;
        let doc = self.store.insert(Session::COLLECTION, value).await?;
        from_document(doc)
    }

    /// Persist the status flags of a session
    pub async fn save_status(&self, session: &Session) -> RepositoryResult<Option<Session>> {
        self.store
            .update(Session::COLLECTION, &session.id, session.flags())
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn list(&self, query: &DocumentQuery) -> RepositoryResult<Vec<JsonDocument>> {
        self.store.find(Session::COLLECTION, query).await
    }

    pub async fn count(&self, query: &DocumentQuery) -> RepositoryResult<u64> {
        self.store.count(Session::COLLECTION, query).await
    }
}
