//! Cancel a confirmed session

use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_models::{Role, Session, User};
use tracing::instrument;

use crate::context::ServiceContext;
use crate::notify::deliver;

pub struct CancelSessionService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> CancelSessionService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn call(self, session_id: &str) -> MmResult<Session> {
        let mut session = self
            .ctx
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| MmError::not_found("No session matches id provided"))?;

        if !self.user.is_admin() && !session.is_participant(&self.user.id) {
            return Err(MmError::forbidden(
                "You do not have permission to perform this action",
            ));
        }

        session.cancel()?;
        let session = self
            .ctx
            .sessions
            .save_status(&session)
            .await?
            .ok_or_else(|| MmError::not_found("No session matches id provided"))?;
        tracing::info!(session = %session.id, "session cancelled");

        // A mentee cancelling notifies the mentor; anyone else notifies the mentee
        let recipient_id = if self.user.role == Role::Mentee {
            &session.mentor
        } else {
            &session.mentee
        };
        match self.ctx.users.find_by_id(recipient_id).await? {
            Some(recipient) => {
                deliver(self.ctx, self.ctx.mailer.session_cancelled(&recipient, self.user)).await
            }
            None => tracing::warn!(recipient = %recipient_id, "participant no longer exists"),
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use mm_models::{NewSession, SessionStatus};

    async fn confirmed(fx: &Fixture) -> Session {
        let mut session = fx
            .ctx
            .sessions
            .create(NewSession::request(&fx.mentor.id, &fx.mentee.id))
            .await
            .unwrap();
        session.accept();
        fx.ctx.sessions.save_status(&session).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_mentee_cancel_notifies_mentor() {
        let fx = Fixture::new().await;
        let session = confirmed(&fx).await;

        let cancelled = CancelSessionService::new(&fx.ctx, &fx.mentee)
            .call(&session.id)
            .await
            .unwrap();

        assert_eq!(cancelled.status(), SessionStatus::Cancelled);
        let sent = fx.email.sent();
        assert_eq!(sent[0].to[0].email, fx.mentor.email);
        assert!(sent[0].text_body.contains(&format!("with {} has been cancelled", fx.mentee.name)));
    }

    #[tokio::test]
    async fn test_mentor_cancel_notifies_mentee() {
        let fx = Fixture::new().await;
        let session = confirmed(&fx).await;

        CancelSessionService::new(&fx.ctx, &fx.mentor)
            .call(&session.id)
            .await
            .unwrap();
        assert_eq!(fx.email.sent()[0].to[0].email, fx.mentee.email);
    }

    #[tokio::test]
    async fn test_requires_confirmed_session() {
        let fx = Fixture::new().await;
        let session = fx
            .ctx
            .sessions
            .create(NewSession::request(&fx.mentor.id, &fx.mentee.id))
            .await
            .unwrap();

        let err = CancelSessionService::new(&fx.ctx, &fx.mentee)
            .call(&session.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Session must be in accepted status to be cancelled");
    }

    #[tokio::test]
    async fn test_outsiders_cannot_cancel() {
        let fx = Fixture::new().await;
        let session = confirmed(&fx).await;

        let err = CancelSessionService::new(&fx.ctx, &fx.other_mentee)
            .call(&session.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        CancelSessionService::new(&fx.ctx, &fx.admin)
            .call(&session.id)
            .await
            .unwrap();

        let err = CancelSessionService::new(&fx.ctx, &fx.admin)
            .call("missing")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
