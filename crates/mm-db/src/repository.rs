//! Repository errors and shared document helpers

use chrono::{SecondsFormat, Utc};
use mm_core::error::MmError;
use mm_core::traits::new_id;
use mm_core::types::{CREATED_AT_FIELD, ID_FIELD, VERSION_FIELD};
use serde_json::{Map, Value};

/// A stored document: a JSON object
pub type JsonDocument = Map<String, Value>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for MmError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(message) => MmError::not_found(message),
            RepositoryError::InvalidDocument(message) => MmError::bad_request(message),
            RepositoryError::Database(e) => MmError::Database(e.to_string()),
            RepositoryError::Serialization(e) => MmError::Internal(e.to_string()),
        }
    }
}

/// Current time in the stored timestamp format
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fill in the bookkeeping fields of a document about to be inserted.
///
/// A missing `_id` or `createdAt` is generated; `__v` always starts at 0.
pub fn prepare_insert(value: Value) -> RepositoryResult<JsonDocument> {
    let mut document = match value {
        Value::Object(map) => map,
        other => {
            return Err(RepositoryError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            )))
        }
    };

    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(Value::String(_)) | None | Some(Value::Null) => {
            document.insert(ID_FIELD.to_string(), Value::String(new_id()));
        }
        Some(other) => {
            return Err(RepositoryError::InvalidDocument(format!(
                "{} must be a string, got {}",
                ID_FIELD,
                json_type(other)
            )))
        }
    }
    if !document.contains_key(CREATED_AT_FIELD) {
        document.insert(CREATED_AT_FIELD.to_string(), Value::String(timestamp_now()));
    }
    document.insert(VERSION_FIELD.to_string(), Value::from(0));

    Ok(document)
}

/// Convert a stored document into a model
pub fn from_document<T: serde::de::DeserializeOwned>(doc: JsonDocument) -> RepositoryResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Unwrap a `json!` object literal into a change set
pub fn changes(value: Value) -> JsonDocument {
    match value {
        Value::Object(map) => map,
        _ => JsonDocument::new(),
    }
}

/// Drop the fields callers may never overwrite
pub fn writable_changes(mut changes: JsonDocument) -> JsonDocument {
    for field in [ID_FIELD, VERSION_FIELD, CREATED_AT_FIELD] {
        changes.remove(field);
    }
    changes
}

/// Shallow-merge `changes` into `document` and bump its version
pub fn apply_update(document: &mut JsonDocument, changes: JsonDocument) {
    for (key, value) in writable_changes(changes) {
        document.insert(key, value);
    }
    let version = document
        .get(VERSION_FIELD)
        .and_then(Value::as_i64)
        .unwrap_or(0);
    document.insert(VERSION_FIELD.to_string(), Value::from(version + 1));
}

/// The `_id` of a stored document
pub fn document_id(document: &JsonDocument) -> RepositoryResult<&str> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| RepositoryError::InvalidDocument(format!("missing {}", ID_FIELD)))
}

/// Collection names double as table names, so they are restricted
pub fn validate_collection(collection: &str) -> RepositoryResult<()> {
    let valid = !collection.is_empty()
        && collection.len() <= 63
        && collection
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !collection.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidDocument(format!(
            "invalid collection name '{}'",
            collection
        )))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
