//! User repository
//!
//! Typed access to the `users` collection.

use std::sync::Arc;

use mm_core::traits::Document;
use mm_core::types::ID_FIELD;
use mm_models::{NewUser, Role, User};
use mm_queries::{DocumentQuery, FilterCriteria};
use serde_json::{json, Value};

use crate::repository::{
    apply_update, changes, from_document, JsonDocument, RepositoryError, RepositoryResult,
};
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Listings only show active accounts
    pub fn active_criteria() -> FilterCriteria {
        FilterCriteria::new().eq("active", true)
    }

    /// Active users with the mentor role
    pub fn mentor_criteria() -> FilterCriteria {
        Self::active_criteria().eq("role", Role::Mentor.as_str())
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        self.store
            .find_by_id(User::COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Find a user that has not been deactivated
    pub async fn find_active(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.find_by_id(id).await?.filter(|user| user.active))
    }

    /// Find an active mentor by id
    pub async fn find_mentor(&self, id: &str) -> RepositoryResult<Option<User>> {
        let criteria = Self::mentor_criteria().eq(ID_FIELD, id);
        self.store
            .find_one(User::COLLECTION, &criteria)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Run a list query; documents are returned as projected
    pub async fn list(&self, query: &DocumentQuery) -> RepositoryResult<Vec<JsonDocument>> {
        self.store.find(User::COLLECTION, query).await
    }

    pub async fn count(&self, query: &DocumentQuery) -> RepositoryResult<u64> {
        self.store.count(User::COLLECTION, query).await
    }

    pub async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut value = serde_json::to_value(&user)?;
        if let Value::Object(map) = &mut value {
            map.insert("active".to_string(), Value::Bool(true));
        }
        let doc = self.store.insert(User::COLLECTION, value).await?;
        from_document(doc)
    }

    /// Shallow-merge `changes`; `None` when the user does not exist.
    ///
    /// The merge is checked against the model first, so a change that would
    /// leave an unreadable document is rejected and nothing is written.
    pub async fn update(&self, id: &str, changes: JsonDocument) -> RepositoryResult<Option<User>> {
        let Some(mut merged) = self.store.find_by_id(User::COLLECTION, id).await? else {
            return Ok(None);
        };
        apply_update(&mut merged, changes.clone());
        if let Err(e) = from_document::<User>(merged) {
            return Err(RepositoryError::InvalidDocument(e.to_string()));
        }

        self.store
            .update(User::COLLECTION, id, changes)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn deactivate(&self, id: &str) -> RepositoryResult<Option<User>> {
        self.update(id, changes(json!({ "active": false }))).await
    }

    pub async fn set_photo(&self, id: &str, key: &str) -> RepositoryResult<Option<User>> {
        self.update(id, changes(json!({ "photo": key }))).await
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.store.delete(User::COLLECTION, id).await
    }
}
