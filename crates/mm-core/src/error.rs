//! Core error types for Mentor Match
//!
//! Service-level failures shared by the service and API layers.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all Mentor Match operations
#[derive(Error, Debug)]
pub enum MmError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MmError {
    pub fn not_found(message: impl Into<String>) -> Self {
        MmError::NotFound { message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        MmError::BadRequest { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        MmError::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        MmError::Forbidden { message: message.into() }
    }

    /// HTTP status code mapping for errors
    pub fn status_code(&self) -> u16 {
        match self {
            MmError::NotFound { .. } => 404,
            MmError::BadRequest { .. } => 400,
            MmError::Unauthorized { .. } => 401,
            MmError::Forbidden { .. } => 403,
            MmError::Validation(_) => 400,
            MmError::Database(_) | MmError::Storage(_) | MmError::Internal(_) => 500,
            MmError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MmError::NotFound { .. } => "not_found",
            MmError::BadRequest { .. } => "bad_request",
            MmError::Unauthorized { .. } => "unauthorized",
            MmError::Forbidden { .. } => "forbidden",
            MmError::Validation(_) => "validation_failed",
            MmError::Database(_) => "database_error",
            MmError::Storage(_) => "storage_error",
            MmError::Internal(_) => "internal_error",
            MmError::Config(_) => "configuration_error",
        }
    }

    /// Whether the failure was caused by the client (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Validation errors collection
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
