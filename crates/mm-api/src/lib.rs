//! # mm-api
//!
//! REST API handlers for Mentor Match.
//!
//! All routes live under `/api/v1`. Responses use the
//! `{"status": ..., "data": ...}` envelope; list endpoints accept the
//! filter / `sort` / `fields` / `page` / `limit` query parameters.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::AppState;
pub use routes::router;
