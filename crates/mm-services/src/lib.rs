//! # mm-services
//!
//! Business logic services for Mentor Match.
//!
//! Each operation is a small service object built from a [`ServiceContext`]
//! and the acting user, then invoked with `call`:
//!
//! ```ignore
//! let session = RequestSessionService::new(&ctx, &mentee)
//!     .call(&mentor_id, SessionRequest::default())
//!     .await?;
//! ```

pub mod context;
pub mod listing;
pub mod notify;
pub mod sessions;
pub mod users;

pub use context::ServiceContext;
pub use listing::{list_query, Listing};
pub use sessions::{
    AllSessionsService, CancelSessionService, MySessionsService, RequestSessionService,
    RespondSessionService, SessionRequest, SessionResponse,
};
pub use users::{
    AdminUserService, DeactivateMeService, MentorDirectory, UpdateMeService, UpdatePhotoService,
};

#[cfg(test)]
pub(crate) mod test_support;
