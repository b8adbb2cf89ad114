//! User roles

use serde::{Deserialize, Serialize};

/// Role of a user on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Mentee,
    Mentor,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mentee" => Some(Self::Mentee),
            "mentor" => Some(Self::Mentor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mentee => "mentee",
            Self::Mentor => "mentor",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Session field holding a participant of this role (`mentor` / `mentee`)
    pub fn session_field(&self) -> Option<&'static str> {
        match self {
            Self::Mentee => Some("mentee"),
            Self::Mentor => Some("mentor"),
            Self::Admin => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Role::parse("Mentor"), Some(Role::Mentor));
        assert_eq!(Role::parse("guest"), None);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::default(), Role::Mentee);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Mentor).unwrap(), "\"mentor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn test_session_field() {
        assert_eq!(Role::Mentee.session_field(), Some("mentee"));
        assert_eq!(Role::Admin.session_field(), None);
    }
}
