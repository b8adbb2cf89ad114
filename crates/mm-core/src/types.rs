//! Well-known document fields

/// Identifier field present on every document
pub const ID_FIELD: &str = "_id";

/// Internal version counter, bumped on every update
pub const VERSION_FIELD: &str = "__v";

/// Creation timestamp (RFC 3339)
pub const CREATED_AT_FIELD: &str = "createdAt";
