// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod mentor;
pub mod student;

#[cfg(test)]
mod helpers_test;

pub use admin::AdminApi;
pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use mentor::MentorApi;
pub use student::StudentApi;
