//! User services
//!
//! Profile operations for the current user, the mentor directory and the
//! admin user management endpoints.

mod admin;
mod mentors;
mod photo;
mod profile;

pub use admin::AdminUserService;
pub use mentors::MentorDirectory;
pub use photo::UpdatePhotoService;
pub use profile::{DeactivateMeService, UpdateMeService};

use mm_core::error::{MmError, ValidationErrors};

pub(crate) const NOT_FOUND: &str = "No document found with that ID";

/// Convert `validator` failures into the shared validation error type
pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> MmError {
    let mut converted = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("is invalid ({})", error.code));
            converted.add(field, message);
        }
    }
    MmError::Validation(converted)
}
