use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Principal;
use crate::types::internal::role::{Role, RoleGrants};

/// Outcome of resolving a requested role against a principal's grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleResolution {
    /// Role whose dashboard the principal lands on
    pub destination: Role,

    /// The requested role was not granted and the principal was redirected
    pub mismatch: bool,

    /// The principal had no grants and was treated as a student
    pub fallback_applied: bool,
}

impl RoleResolution {
    /// Informational message for the principal when redirected
    pub fn notice(&self, requested: Role) -> Option<String> {
        self.mismatch.then(|| {
            format!(
                "You don't have {} access. Redirecting to your {} dashboard.",
                requested.label(),
                self.destination.label()
            )
        })
    }
}

/// Maps role grants plus a requested role to a single destination role
///
/// Pure decision; navigation and notification belong to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResolver;

impl RoleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the destination role
    ///
    /// Grants are expected in creation order; a mismatch redirects to the
    /// earliest grant. A principal with no grants is treated as a student.
    pub fn resolve(&self, grants: &RoleGrants, requested: Role) -> RoleResolution {
        let Some(first) = grants.first() else {
            return RoleResolution {
                destination: Role::Student,
                mismatch: requested != Role::Student,
                fallback_applied: true,
            };
        };

        if grants.contains(requested) {
            RoleResolution {
                destination: requested,
                mismatch: false,
                fallback_applied: false,
            }
        } else {
            RoleResolution {
                destination: first,
                mismatch: true,
                fallback_applied: false,
            }
        }
    }

    /// Resolve for an optional principal, failing when no one is signed in
    pub fn resolve_for(
        &self,
        principal: Option<&Principal>,
        requested: Role,
    ) -> Result<RoleResolution, InternalError> {
        let principal = principal.ok_or(CredentialError::Unauthenticated)?;
        Ok(self.resolve(&principal.grants, requested))
    }

    /// Grants the principal may act with, applying the student fallback
    pub fn effective_grants(&self, grants: &RoleGrants) -> RoleGrants {
        if grants.is_empty() {
            RoleGrants::from_ordered([Role::Student])
        } else {
            grants.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants(roles: &[Role]) -> RoleGrants {
        RoleGrants::from_ordered(roles.iter().copied())
    }

    #[test]
    fn test_granted_role_resolves_without_mismatch() {
        let resolver = RoleResolver::new();
        let combos: [&[Role]; 4] = [
            &[Role::Student],
            &[Role::Mentor, Role::Admin],
            &[Role::Admin, Role::Student, Role::Mentor],
            &[Role::Student, Role::Mentor],
        ];

        for combo in combos {
            for &requested in combo {
                let resolution = resolver.resolve(&grants(combo), requested);
                assert_eq!(resolution.destination, requested);
                assert!(!resolution.mismatch);
                assert!(!resolution.fallback_applied);
            }
        }
    }

    #[test]
    fn test_missing_role_redirects_to_first_grant() {
        let resolution = RoleResolver::new().resolve(&grants(&[Role::Mentor, Role::Admin]), Role::Student);

        assert_eq!(resolution.destination, Role::Mentor);
        assert!(resolution.mismatch);
    }

    #[test]
    fn test_mismatch_follows_grant_order() {
        let resolution = RoleResolver::new().resolve(&grants(&[Role::Admin, Role::Mentor]), Role::Student);
        assert_eq!(resolution.destination, Role::Admin);
    }

    #[test]
    fn test_mismatch_is_deterministic() {
        let resolver = RoleResolver::new();
        let held = grants(&[Role::Student, Role::Admin]);
        let first = resolver.resolve(&held, Role::Mentor);

        for _ in 0..10 {
            assert_eq!(resolver.resolve(&held, Role::Mentor), first);
        }
    }

    #[test]
    fn test_empty_grants_fall_back_to_student() {
        let resolver = RoleResolver::new();

        let as_student = resolver.resolve(&RoleGrants::empty(), Role::Student);
        assert_eq!(as_student.destination, Role::Student);
        assert!(!as_student.mismatch);
        assert!(as_student.fallback_applied);

        let as_admin = resolver.resolve(&RoleGrants::empty(), Role::Admin);
        assert_eq!(as_admin.destination, Role::Student);
        assert!(as_admin.mismatch);
    }

    #[test]
    fn test_resolve_for_without_principal_is_authentication_error() {
        let result = RoleResolver::new().resolve_for(None, Role::Student);
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::Unauthenticated))
        ));
    }

    #[test]
    fn test_resolve_for_with_principal() {
        let principal = Principal::new("u1", "m@uni.edu", grants(&[Role::Mentor]));
        let resolution = RoleResolver::new().resolve_for(Some(&principal), Role::Mentor).unwrap();
        assert_eq!(resolution.destination, Role::Mentor);
    }

    #[test]
    fn test_notice_only_on_mismatch() {
        let resolver = RoleResolver::new();
        let redirected = resolver.resolve(&grants(&[Role::Student]), Role::Admin);
        assert_eq!(
            redirected.notice(Role::Admin).as_deref(),
            Some("You don't have Admin access. Redirecting to your Student dashboard.")
        );

        let granted = resolver.resolve(&grants(&[Role::Student]), Role::Student);
        assert!(granted.notice(Role::Student).is_none());
    }

    #[test]
    fn test_effective_grants_fallback() {
        let resolver = RoleResolver::new();
        assert_eq!(resolver.effective_grants(&RoleGrants::empty()).as_slice(), &[Role::Student]);
        assert_eq!(
            resolver.effective_grants(&grants(&[Role::Mentor])).as_slice(),
            &[Role::Mentor]
        );
    }
}
