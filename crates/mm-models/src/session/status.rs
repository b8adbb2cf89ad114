//! Session status
//!
//! The stored document keeps three flags (`confirmed`, `rejected`,
//! `cancelled`); the status is derived from them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Waiting for the mentor's answer
    Requested,
    Confirmed,
    Rejected,
    Cancelled,
}

impl SessionStatus {
    pub fn from_flags(confirmed: bool, rejected: bool, cancelled: bool) -> Self {
        if cancelled {
            Self::Cancelled
        } else if rejected {
            Self::Rejected
        } else if confirmed {
            Self::Confirmed
        } else {
            Self::Requested
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only confirmed sessions can be cancelled
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
