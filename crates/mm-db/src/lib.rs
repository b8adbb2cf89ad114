//! # mm-db
//!
//! Document storage for Mentor Match.
//!
//! This crate provides:
//!
//! - The [`DocumentStore`] trait over collections of JSON documents
//! - An in-memory store that evaluates queries in Rust
//! - A PostgreSQL store keeping documents in JSONB columns
//! - Typed repositories for users and sessions
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mm_db::{MemoryStore, UserRepository};
//! use mm_queries::{DocumentQuery, QueryFeatures, RawQuery};
//!
//! let users = UserRepository::new(Arc::new(MemoryStore::new()));
//! let raw = RawQuery::parse("role=mentor&sort=name")?;
//! let query = QueryFeatures::new(DocumentQuery::new(), raw).apply_all().build();
//! let docs = users.list(&query).await?;
//! ```

pub mod repository;
pub mod store;
pub mod eval;
pub mod memory;
pub mod sql;
pub mod pool;
pub mod postgres;
pub mod users;
pub mod sessions;

// Re-exports
pub use memory::MemoryStore;
pub use pool::{Database, PoolConfig, PoolStats};
pub use postgres::PgStore;
pub use repository::{JsonDocument, RepositoryError, RepositoryResult};
pub use sessions::SessionRepository;
pub use store::DocumentStore;
pub use users::UserRepository;
