use thiserror::Error;

use crate::types::internal::role::Role;

#[derive(Error, Debug)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The principal does not hold the role an endpoint is scoped to
    #[error("Role required: {required}")]
    RoleRequired { required: Role },

    #[error("User {0} does not hold the mentor role")]
    NotAMentor(String),

    #[error("Invalid role override pattern '{pattern}': {reason}")]
    InvalidOverridePattern { pattern: String, reason: String },
}
