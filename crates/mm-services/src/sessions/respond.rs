//! Accept or reject a requested session

use mm_core::error::MmError;
use mm_core::result::MmResult;
use mm_models::{Session, User};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::context::ServiceContext;
use crate::notify::deliver;

/// Body of a respond call; `accepted` is a boolean or `"true"` / `"false"`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub accepted: Value,
}

impl SessionResponse {
    pub fn accepted(accepted: bool) -> Self {
        Self {
            accepted: Value::Bool(accepted),
        }
    }

    /// The decision, if the body holds one
    pub fn decision(&self) -> Option<bool> {
        match &self.accepted {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        }
    }
}

pub struct RespondSessionService<'a> {
    ctx: &'a ServiceContext,
    user: &'a User,
}

impl<'a> RespondSessionService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a User) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self, response), fields(mentor = %self.user.id))]
    pub async fn call(self, session_id: &str, response: SessionResponse) -> MmResult<Session> {
        let mut session = self
            .ctx
            .sessions
            .find_for_mentor(session_id, &self.user.id)
            .await?
            .ok_or_else(|| MmError::not_found("No unconfirmed session matches id provided"))?;

        let accepted = response
            .decision()
            .ok_or_else(|| MmError::bad_request("The session must be accepted or rejected"))?;

        if accepted {
            session.accept();
        } else {
            session.reject();
        }

        let session = self
            .ctx
            .sessions
            .save_status(&session)
            .await?
            .ok_or_else(|| MmError::not_found("No unconfirmed session matches id provided"))?;
        tracing::info!(session = %session.id, status = session.status().as_str(), "session answered");

        match self.ctx.users.find_by_id(&session.mentee).await? {
            Some(mentee) => {
                let message = if accepted {
                    self.ctx.mailer.session_accepted(&mentee, self.user)
                } else {
                    self.ctx.mailer.session_rejected(&mentee, self.user)
                };
                deliver(self.ctx, message).await;
            }
            None => tracing::warn!(mentee = %session.mentee, "mentee no longer exists"),
        }

        Ok(session)
    }
}
