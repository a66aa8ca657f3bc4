// Providers layer - Work performers and business logic
//
// Providers hold the decisions coordinators orchestrate: credential checks,
// token handling, role resolution and the phase merge.

pub mod authentication_provider;
pub mod crypto_provider;
pub mod phase_merger;
pub mod phase_progress_provider;
pub mod role_override;
pub mod role_resolver;
pub mod token_provider;

pub use authentication_provider::AuthenticationProvider;
pub use crypto_provider::CryptoProvider;
pub use phase_merger::PhaseMerger;
pub use phase_progress_provider::PhaseProgressProvider;
pub use role_override::{AllowlistRoleOverride, AppliedOverride, NoRoleOverride, OverrideOutcome, RoleOverridePolicy, RoleOverrideStep};
pub use role_resolver::{RoleResolution, RoleResolver};
pub use token_provider::TokenProvider;
