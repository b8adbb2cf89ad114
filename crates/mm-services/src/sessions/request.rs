//! Request a session with a mentor

use chrono::{DateTime, Utc};
use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_models::{NewSession, Role, Session, User};
use serde::Deserialize;
use tracing::instrument;

use crate::context::ServiceContext;
use crate::notify::deliver;

/// Optional details a mentee may attach to a request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

pub struct RequestSessionService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> RequestSessionService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self, params), fields(mentee = %self.user.id))]
    pub async fn call(self, mentor_id: &str, params: SessionRequest) -> MmResult<Session> {
        if self.user.role != Role::Mentee {
            return Err(MmError::forbidden(
                "You do not have permission to perform this action",
            ));
        }

        let mentor = self
            .ctx
            .users
            .find_mentor(mentor_id)
            .await?
            .ok_or_else(|| MmError::not_found("No mentor found with that ID"))?;

        let mut new_session = NewSession::request(mentor.id.clone(), self.user.id.clone());
        new_session.topic = params.topic.filter(|t| !t.trim().is_empty());
        new_session.scheduled_for = params.scheduled_for;

        let session = self.ctx.sessions.create(new_session).await?;
        tracing::info!(session = %session.id, mentor = %mentor.id, "session requested");

        deliver(self.ctx, self.ctx.mailer.session_requested(&mentor, self.user)).await;
        Ok(session)
    }
}
