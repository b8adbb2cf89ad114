//! User management for admins

use mm_core::error::{MmError, ValidationErrors};
use mm_core::result::MmResult;
use mm_db::repository::writable_changes;
use mm_db::{JsonDocument, UserRepository};
use mm_models::{Role, User};
use mm_photos::is_photo_key_of;
use mm_queries::RawQuery;
use serde_json::Value;
use tracing::instrument;

use super::NOT_FOUND;
use crate::context::ServiceContext;
use crate::listing::{list_query, Listing};

pub struct AdminUserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminUserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active users matching the request parameters
    #[instrument(skip(self, raw))]
    pub async fn list(&self, raw: RawQuery) -> MmResult<Listing> {
        let query = list_query(UserRepository::active_criteria(), raw, self.ctx.page_limits);
        Ok(Listing::new(self.ctx.users.list(&query).await?))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> MmResult<User> {
        self.ctx
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| MmError::not_found(NOT_FOUND))
    }

    /// Shallow-merge `body` into the user; identity and bookkeeping fields are ignored
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: JsonDocument) -> MmResult<User> {
        let changes = writable_changes(body);
        check_changes(id, &changes)?;

        let user = self
            .ctx
            .users
            .update(id, changes)
            .await?
            .ok_or_else(|| MmError::not_found(NOT_FOUND))?;
        tracing::info!(user = %user.id, "user updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> MmResult<()> {
        if !self.ctx.users.delete(id).await? {
            return Err(MmError::not_found(NOT_FOUND));
        }
        tracing::info!(user = %id, "user deleted");
        Ok(())
    }
}

/// Reject changes that would leave an unreadable user document
fn check_changes(id: &str, changes: &JsonDocument) -> MmResult<()> {
    let mut errors = ValidationErrors::new();

    for field in ["name", "email"] {
        match changes.get(field) {
            None => {}
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(_) => errors.add(field, "must be a non-empty string"),
        }
    }
    if let Some(Value::String(email)) = changes.get("email") {
        if !validator::validate_email(email) {
            errors.add("email", "is not a valid email address");
        }
    }
    match changes.get("role") {
        None => {}
        Some(Value::String(role)) if Role::parse(role).is_some() => {}
        Some(_) => errors.add("role", "must be one of mentee, mentor, admin"),
    }
    if changes.get("active").is_some_and(|v| !v.is_boolean()) {
        errors.add("active", "must be a boolean");
    }
    if changes.get("bio").is_some_and(|v| !v.is_string() && !v.is_null()) {
        errors.add("bio", "must be a string");
    }
    // Only a key issued to this user; the previous photo is deleted on the next upload
    match changes.get("photo") {
        None | Some(Value::Null) => {}
        Some(Value::String(key)) if is_photo_key_of(id, key) => {}
        Some(_) => errors.add("photo", "must be one of this user's photos"),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(MmError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use mm_db::repository::changes;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_hides_inactive_users() {
        let fx = Fixture::new().await;
        fx.ctx.users.deactivate(&fx.other_mentee.id).await.unwrap();

        let service = AdminUserService::new(&fx.ctx);
        let all = service.list(RawQuery::new()).await.unwrap();
        assert_eq!(all.results(), 3);

        let mentees = service.list(RawQuery::parse("role=mentee").unwrap()).await.unwrap();
        assert_eq!(mentees.results(), 1);
        assert_eq!(mentees.documents[0]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_update_merges_and_protects_id() {
        let fx = Fixture::new().await;
        let service = AdminUserService::new(&fx.ctx);

        let user = service
            .update(
                &fx.mentee.id,
                changes(json!({"_id": "hijack", "role": "mentor", "bio": "Now mentoring"})),
            )
            .await
            .unwrap();
        assert_eq!(user.id, fx.mentee.id);
        assert_eq!(user.role, Role::Mentor);
        assert_eq!(user.bio.as_deref(), Some("Now mentoring"));

        let err = service
            .update(&fx.mentee.id, changes(json!({"role": "overlord"})))
            .await
            .unwrap_err();
        assert!(matches!(err, MmError::Validation(ref e) if e.has_error("role")));

        let err = service.update("missing", changes(json!({"bio": "x"}))).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_bio_and_foreign_photo() {
        let fx = Fixture::new().await;
        let service = AdminUserService::new(&fx.ctx);

        let err = service
            .update(&fx.mentee.id, changes(json!({"bio": 5})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(matches!(err, MmError::Validation(ref e) if e.has_error("bio")));

        let foreign = format!("users/user-{}-1704067200000.png", fx.mentor.id);
        let err = service
            .update(&fx.mentee.id, changes(json!({"photo": foreign})))
            .await
            .unwrap_err();
        assert!(matches!(err, MmError::Validation(ref e) if e.has_error("photo")));

        // The account is untouched and still loads
        let stored = fx.ctx.users.find_active(&fx.mentee.id).await.unwrap().unwrap();
        assert_eq!(stored, fx.mentee);

        let cleared = service
            .update(&fx.mentee.id, changes(json!({"bio": null, "photo": null})))
            .await
            .unwrap();
        assert_eq!(cleared.bio, None);
        assert_eq!(cleared.photo, None);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let fx = Fixture::new().await;
        let service = AdminUserService::new(&fx.ctx);

        assert_eq!(service.get(&fx.mentor.id).await.unwrap(), fx.mentor);
        service.delete(&fx.mentor.id).await.unwrap();
        assert_eq!(service.get(&fx.mentor.id).await.unwrap_err().status_code(), 404);
        assert_eq!(service.delete(&fx.mentor.id).await.unwrap_err().status_code(), 404);
    }
}
