use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::role::Role;

/// Self-service signup
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,

    /// At least 8 characters
    pub password: String,

    pub full_name: String,

    /// Role granted to the new account
    pub role: Role,

    /// University serial number (students)
    pub usn: Option<String>,

    pub department: Option<String>,

    pub phone: Option<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,

    pub password: String,

    /// Dashboard the user asked for
    pub requested_role: Role,
}

/// Successful login, possibly redirected to a different role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user_id: String,

    /// Role the session resolved to
    pub active_role: Role,

    /// Roles the token carries, in grant order
    pub roles: Vec<Role>,

    /// Client route for the active role
    pub dashboard_path: String,

    /// The requested role was not granted
    pub mismatch: bool,

    /// The account had no grants and was treated as a student
    pub fallback_applied: bool,

    /// Message to show when redirected
    pub notice: Option<String>,
}

/// Response model for whoami endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: String,
    pub email: String,
    pub active_role: Role,
    pub roles: Vec<Role>,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}
