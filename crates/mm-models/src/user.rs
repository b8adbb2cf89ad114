//! User model and related types

pub mod model;

pub use model::*;
