// Internal types - not exposed over the API
pub mod audit;
pub mod auth;
pub mod context;
pub mod phase;
pub mod role;
