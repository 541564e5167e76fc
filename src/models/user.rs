//! User model and related types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles. Closed and non-hierarchical: an `Admin` token does not
/// satisfy a `User`-gated check, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// A library member or administrator.
///
/// `borrowed_count` tracks how many books currently reference this user as
/// their borrower; the lending ledger keeps the two in lockstep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique login identifier, used as the token subject.
    pub email: String,
    /// Argon2 PHC hash of the password. Never the plaintext.
    pub password_hash: String,
    pub role: Role,
    pub borrowed_count: u32,
    /// Optimistic-lock tag, bumped by every committed lending transition.
    #[serde(default)]
    pub version: u64,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            borrowed_count: 0,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn test_roles_are_distinct() {
        assert_ne!(Role::Admin, Role::User);
    }
}
