//! User model
//!
//! Collection: users

use chrono::{DateTime, Utc};
use mm_core::traits::{Document, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::role::Role;

/// User document
///
/// Passwords and sign-up live with the authenticating gateway; this
/// document only carries the profile the platform itself needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Email address
    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub role: Role,

    /// Free-form profile text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Storage key of the profile photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Deactivated users are hidden from listings and cannot act
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "__v", default)]
    pub version: i64,
}

fn default_true() -> bool {
    true
}

impl Identifiable for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_mentor(&self) -> bool {
        self.role == Role::Mentor
    }

    /// Whether the user is an active mentor that can receive requests
    pub fn accepts_requests(&self) -> bool {
        self.active && self.is_mentor()
    }
}

/// New user creation parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
            bio: None,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UpdateProfile {
    /// Names of the writable profile fields
    pub const FIELDS: &'static [&'static str] = &["name", "email", "bio"];

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.bio.is_none()
    }
}
