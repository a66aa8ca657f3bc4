use serde::{Deserialize, Serialize};

use crate::types::internal::role::{Role, RoleGrants};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    pub email: String,

    /// Role the session was resolved to at login
    pub active_role: Role,

    /// Granted roles in grant-creation order (after any override)
    pub roles: Vec<Role>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,
}

/// Authenticated identity plus its role grants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub grants: RoleGrants,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, grants: RoleGrants) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            grants,
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            grants: RoleGrants::from_ordered(claims.roles.iter().copied()),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.grants.contains(role)
    }
}
