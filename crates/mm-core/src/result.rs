//! Result type aliases

use crate::error::MmError;

/// Standard Result type for Mentor Match operations
pub type MmResult<T> = Result<T, MmError>;
