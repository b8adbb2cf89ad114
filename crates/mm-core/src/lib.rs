//! # mm-core
//!
//! Core types, traits, and utilities for Mentor Match.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error type and result alias
//! - Document identifiers and well-known document fields
//! - Core traits (Identifiable, Timestamped)
//! - Pagination window defaults
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod pagination;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
pub use pagination::*;
