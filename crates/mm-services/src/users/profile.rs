//! Own profile updates and account deactivation

use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_db::JsonDocument;
use mm_models::{UpdateProfile, User};
use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use super::{validation_failed, NOT_FOUND};
use crate::context::ServiceContext;

const PASSWORD_FIELDS: &[&str] = &["password", "passwordConfirm"];

/// Update name, email or bio of the current user
pub struct UpdateMeService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> UpdateMeService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    /// Fields outside the profile whitelist are ignored
    #[instrument(skip(self, body), fields(user = %self.user.id))]
    pub async fn call(self, body: JsonDocument) -> MmResult<User> {
        if PASSWORD_FIELDS.iter().any(|field| body.contains_key(*field)) {
            return Err(MmError::bad_request(
                "This route is not for password updates, use /updateMyPassword",
            ));
        }

        let allowed: JsonDocument = body
            .into_iter()
            .filter(|(key, _)| UpdateProfile::FIELDS.contains(&key.as_str()))
            .collect();
        let profile: UpdateProfile = serde_json::from_value(Value::Object(allowed))
            .map_err(|e| MmError::bad_request(format!("Invalid profile data: {}", e)))?;
        profile.validate().map_err(validation_failed)?;

        if profile.is_empty() {
            return Ok(self.user.clone());
        }

        let changes = match serde_json::to_value(&profile) {
            Ok(Value::Object(map)) => map,
            Ok(_) => JsonDocument::new(),
            Err(e) => return Err(MmError::Internal(e.to_string())),
        };
        let updated = self
            .ctx
            .users
            .update(&self.user.id, changes)
            .await?
            .ok_or_else(|| MmError::not_found(NOT_FOUND))?;

        tracing::info!("profile updated");
        Ok(updated)
    }
}

/// Deactivate the current user's account
pub struct DeactivateMeService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> DeactivateMeService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn call(self) -> MmResult<()> {
        self.ctx
            .users
            .deactivate(&self.user.id)
            .await?
            .ok_or_else(|| MmError::not_found(NOT_FOUND))?;
        tracing::info!("account deactivated");
        Ok(())
    }
}
