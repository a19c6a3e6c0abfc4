//! User and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles a user account can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Staff,
    InventoryAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::InventoryAdmin => "inventory-admin",
            Role::SuperAdmin => "super-admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Role::Staff),
            "inventory-admin" => Ok(Role::InventoryAdmin),
            "super-admin" => Ok(Role::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string does not name a known role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// A user account, as exposed over the API (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The acting staff member, passed explicitly into cart and order
/// operations instead of being read from ambient request state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Staff, Role::InventoryAdmin, Role::SuperAdmin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_unknown() {
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("STAFF").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_role_serde_kebab_case() {
        let json = serde_json::to_string(&Role::InventoryAdmin).unwrap();
        assert_eq!(json, "\"inventory-admin\"");
        let role: Role = serde_json::from_str("\"super-admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }
}
