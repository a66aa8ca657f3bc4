use thiserror::Error;

/// Generic record-level failures shared by the academic stores
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {message}")]
    Conflict { entity: &'static str, message: String },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
