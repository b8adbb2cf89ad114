//! Session workflow services
//!
//! A mentee requests a session, the mentor accepts or rejects it, and either
//! participant may cancel it once confirmed. Each step notifies the other side
//! by email.

mod cancel;
mod mine;
mod request;
mod respond;

pub use cancel::CancelSessionService;
pub use mine::{AllSessionsService, MySessionsService};
pub use request::{RequestSessionService, SessionRequest};
pub use respond::{RespondSessionService, SessionResponse};
