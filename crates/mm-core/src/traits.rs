//! Core traits shared by the document models

use chrono::{DateTime, Utc};

/// Document identifier (the `_id` field)
pub type Id = String;

/// Generate a fresh document identifier
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Trait for documents that have an identifier
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Trait for documents with a creation timestamp
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// Trait for documents stored in a named collection
pub trait Document: Identifiable + Timestamped + Send + Sync {
    /// The collection the document lives in
    const COLLECTION: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
