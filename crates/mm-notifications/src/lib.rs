//! # mm-notifications
//!
//! Email notifications for Mentor Match.
//!
//! ## Features
//!
//! - Email message model and the [`EmailSender`] trait
//! - Console sender (logs messages) and in-memory sender (for tests)
//! - Session workflow email templates
//!
//! Mail transport itself (SMTP) is provided by the deployment, behind
//! [`EmailSender`].

pub mod email;
pub mod templates;

pub use email::{
    sender_for, ConsoleEmailSender, EmailAddress, EmailError, EmailMessage, EmailResult,
    EmailSender, MemoryEmailSender,
};
pub use templates::SessionMailer;
