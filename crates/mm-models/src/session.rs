//! Mentoring session model and its status workflow

pub mod model;
pub mod status;

pub use model::*;
pub use status::*;
