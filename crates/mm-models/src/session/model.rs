//! Session model
//!
//! Collection: sessions

use chrono::{DateTime, Utc};
use mm_core::error::MmError;
use mm_core::traits::{Document, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};

use super::status::SessionStatus;

/// A mentoring session between a mentor and a mentee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: Id,

    /// User id of the mentor
    pub mentor: Id,

    /// User id of the mentee
    pub mentee: Id,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,

    #[serde(default)]
    pub confirmed: bool,

    #[serde(default)]
    pub rejected: bool,

    #[serde(default)]
    pub cancelled: bool,

    pub created_at: DateTime<Utc>,

    #[serde(rename = "__v", default)]
    pub version: i64,
}

impl Identifiable for Session {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Session {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for Session {
    const COLLECTION: &'static str = "sessions";
    const TYPE_NAME: &'static str = "Session";
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_flags(self.confirmed, self.rejected, self.cancelled)
    }

    pub fn accept(&mut self) {
        self.confirmed = true;
        self.rejected = false;
        self.cancelled = false;
    }

    pub fn reject(&mut self) {
        self.confirmed = false;
        self.rejected = true;
        self.cancelled = false;
    }

    /// Cancel a confirmed session
    pub fn cancel(&mut self) -> Result<(), MmError> {
        if !self.status().can_cancel() {
            return Err(MmError::bad_request(
                "Session must be in accepted status to be cancelled",
            ));
        }
        self.confirmed = false;
        self.cancelled = true;
        Ok(())
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.mentor == user_id || self.mentee == user_id
    }

    /// The other participant, if `user_id` takes part in the session
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.mentee == user_id {
            Some(&self.mentor)
        } else if self.mentor == user_id {
            Some(&self.mentee)
        } else {
            None
        }
    }

    /// The status flags as stored
    pub fn flags(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("confirmed".into(), self.confirmed.into());
        map.insert("rejected".into(), self.rejected.into());
        map.insert("cancelled".into(), self.cancelled.into());
        map
    }
}

/// New session parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub mentor: Id,
    pub mentee: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    pub confirmed: bool,
    pub rejected: bool,
    pub cancelled: bool,
}

impl NewSession {
    /// A freshly requested session
    pub fn request(mentor: impl Into<Id>, mentee: impl Into<Id>) -> Self {
        Self {
            mentor: mentor.into(),
            mentee: mentee.into(),
            topic: None,
            scheduled_for: None,
            confirmed: false,
            rejected: false,
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({
            "_id": "s1",
            "mentor": "m1",
            "mentee": "e1",
            "topic": "Rust",
            "createdAt": "2024-03-01T10:00:00Z",
            "__v": 0
        }))
        .unwrap()
    }

    #[test]
    fn test_new_session_is_requested() {
        let session = session();
        assert_eq!(session.status(), SessionStatus::Requested);
        assert_eq!(session.topic.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_accept_and_reject() {
        let mut session = session();
        session.accept();
        assert_eq!(session.status(), SessionStatus::Confirmed);

        session.reject();
        assert_eq!(session.status(), SessionStatus::Rejected);
        assert!(!session.confirmed);
    }

    #[test]
    fn test_cancel_requires_confirmed() {
        let mut session = session();
        let err = session.cancel().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Session must be in accepted status to be cancelled");

        session.accept();
        session.cancel().unwrap();
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert!(!session.confirmed);
    }

    #[test]
    fn test_participants() {
        let session = session();
        assert!(session.is_participant("m1"));
        assert!(!session.is_participant("x"));
        assert_eq!(session.counterpart("e1"), Some("m1"));
        assert_eq!(session.counterpart("m1"), Some("e1"));
        assert_eq!(session.counterpart("x"), None);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut session = session();
        session.scheduled_for = Some("2024-04-01T09:00:00Z".parse().unwrap());
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["_id"], "s1");
        assert!(value.get("scheduledFor").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["confirmed"], false);
    }
}
