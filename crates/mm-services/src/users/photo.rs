//! Profile photo upload

use chrono::Utc;
use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_models::User;
use mm_photos::PhotoUpload;
use tracing::instrument;

use super::NOT_FOUND;
use crate::context::ServiceContext;

pub struct UpdatePhotoService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> UpdatePhotoService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    /// Store the upload and point the user's `photo` at it.
    ///
    /// The previous photo is removed once the new one is recorded; if recording
    /// fails the new upload is removed instead.
    #[instrument(skip(self, upload), fields(user = %self.user.id))]
    pub async fn call(self, upload: PhotoUpload) -> MmResult<User> {
        let stored = self
            .ctx
            .photo_policy
            .store(self.ctx.photos.as_ref(), &self.user.id, upload, Utc::now())
            .await?;

        let updated = match self.ctx.users.set_photo(&self.user.id, &stored.key).await {
            Ok(Some(user)) => user,
            outcome => {
                if let Err(e) = self.ctx.photos.delete(&stored.key).await {
                    tracing::warn!(
                        error = %e,
                        key = %stored.key,
                        "could not remove orphaned photo"
                    );
                }
                return Err(match outcome {
                    Err(e) => e.into(),
                    Ok(_) => MmError::not_found(NOT_FOUND),
                });
            }
        };

        if let Some(previous) = self.user.photo.as_deref().filter(|key| *key != stored.key) {
            if let Err(e) = self.ctx.photos.delete(previous).await {
                tracing::warn!(error = %e, key = previous, "could not remove previous photo");
            }
        }

        Ok(updated)
    }
}
