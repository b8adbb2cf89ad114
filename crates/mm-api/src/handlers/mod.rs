//! API handlers

pub mod mentors;
pub mod sessions;
pub mod users;
