// API-facing error types
pub mod app;
pub mod auth;

// Re-exports for convenience
pub use app::{ApiErrorResponse, AppError};
pub use auth::AuthError;

#[cfg(test)]
mod app_test;

#[cfg(test)]
mod auth_test;
