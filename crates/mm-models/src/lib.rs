//! # mm-models
//!
//! Document models for Mentor Match.
//!
//! Each model serializes to the JSON document kept by the document store
//! (`_id`, `__v`, `createdAt` plus its own fields) and implements the core
//! traits from `mm-core`.

pub use mm_core::traits::{Document, Id, Identifiable, Timestamped};

pub mod role;
pub mod user;
pub mod session;

// Re-exports for convenience
pub use role::Role;
pub use user::model::{NewUser, UpdateProfile, User};
pub use session::model::{NewSession, Session};
pub use session::status::SessionStatus;
