use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::internal::RoleError;

/// Capability role a principal may act as
///
/// Roles are additive: one principal can hold any combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, poem_openapi::Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum Role {
    Student,
    Mentor,
    Admin,
}

impl Role {
    /// Every role, in the order used when an override grants all of them
    pub const ALL: [Role; 3] = [Role::Student, Role::Mentor, Role::Admin];

    /// Value stored in the `user_roles.role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Mentor => "mentor",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label used in notices
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Mentor => "Mentor",
            Self::Admin => "Admin",
        }
    }

    /// Dashboard route the client navigates to for this role
    pub fn dashboard_path(&self) -> String {
        format!("/dashboard/{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "mentor" => Ok(Self::Mentor),
            "admin" => Ok(Self::Admin),
            other => Err(RoleError::UnknownRole(other.to_string())),
        }
    }
}

/// Role grants of one principal in grant-creation order
///
/// Duplicates are dropped on construction, keeping the earliest grant.
/// The order matters: a role mismatch redirects to the first grant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGrants(Vec<Role>);

impl RoleGrants {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build from roles already sorted by grant creation time
    pub fn from_ordered(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut ordered = Vec::with_capacity(3);
        for role in roles {
            if !ordered.contains(&role) {
                ordered.push(role);
            }
        }
        Self(ordered)
    }

    /// All roles (used by the role override)
    pub fn all() -> Self {
        Self(Role::ALL.to_vec())
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<Role> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Role> {
        self.0.clone()
    }
}

impl fmt::Display for RoleGrants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|r| r.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
