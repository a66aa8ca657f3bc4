// Data Transfer Objects - API request/response types
pub mod admin;
pub mod auth;
pub mod common;
pub mod mentor;
pub mod student;
