use std::fmt;
use std::sync::Arc;

use crate::config::RoleOverrideSettings;
use crate::errors::internal::RoleError;
use crate::types::internal::auth::Principal;
use crate::types::internal::role::RoleGrants;

/// Strategy deciding whether an identity receives every role
pub trait RoleOverridePolicy: Send + Sync {
    /// Short name recorded in the audit log
    fn name(&self) -> &'static str;

    /// Returns the matching rule when the identity is covered
    fn evaluate(&self, identity: &str) -> Option<String>;
}

/// Policy that never matches
#[derive(Debug, Default)]
pub struct NoRoleOverride;

impl RoleOverridePolicy for NoRoleOverride {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn evaluate(&self, _identity: &str) -> Option<String> {
        None
    }
}

/// Case-insensitive identity pattern
///
/// Supports an exact value, `prefix*`, `*suffix` and `*contains*`.
/// A bare `*` is rejected so the allowlist can never cover everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityPattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl IdentityPattern {
    pub fn parse(raw: &str) -> Result<Self, RoleError> {
        let pattern = raw.trim().to_lowercase();
        let invalid = |reason: &str| RoleError::InvalidOverridePattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let leading = pattern.starts_with('*');
        let trailing = pattern.len() > 1 && pattern.ends_with('*');
        let core = pattern.trim_matches('*');

        if core.is_empty() {
            return Err(invalid("pattern must contain more than wildcards"));
        }
        if core.contains('*') {
            return Err(invalid("wildcards are only allowed at the start or end"));
        }

        let core = core.to_string();
        Ok(match (leading, trailing) {
            (true, true) => Self::Contains(core),
            (true, false) => Self::Suffix(core),
            (false, true) => Self::Prefix(core),
            (false, false) => Self::Exact(core),
        })
    }

    pub fn matches(&self, identity: &str) -> bool {
        let identity = identity.trim().to_lowercase();
        match self {
            Self::Exact(value) => identity == *value,
            Self::Prefix(value) => identity.starts_with(value.as_str()),
            Self::Suffix(value) => identity.ends_with(value.as_str()),
            Self::Contains(value) => identity.contains(value.as_str()),
        }
    }
}

impl fmt::Display for IdentityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{}", v),
            Self::Prefix(v) => write!(f, "{}*", v),
            Self::Suffix(v) => write!(f, "*{}", v),
            Self::Contains(v) => write!(f, "*{}*", v),
        }
    }
}

/// Operator-configured allowlist of identity patterns
#[derive(Debug)]
pub struct AllowlistRoleOverride {
    patterns: Vec<IdentityPattern>,
}

impl AllowlistRoleOverride {
    pub fn new(raw_patterns: &[String]) -> Result<Self, RoleError> {
        let patterns = raw_patterns
            .iter()
            .map(|raw| IdentityPattern::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl RoleOverridePolicy for AllowlistRoleOverride {
    fn name(&self) -> &'static str {
        "allowlist"
    }

    fn evaluate(&self, identity: &str) -> Option<String> {
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(identity))
            .map(|pattern| pattern.to_string())
    }
}

/// Details of an override that replaced stored grants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOverride {
    pub policy: &'static str,
    pub matched_pattern: String,
    pub original_grants: RoleGrants,
}

/// Grants to resolve against, plus the override that produced them, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOutcome {
    pub grants: RoleGrants,
    pub applied: Option<AppliedOverride>,
}

/// Explicit step run before role resolution
///
/// The caller records `OverrideOutcome::applied` in the audit log.
#[derive(Clone)]
pub struct RoleOverrideStep {
    policy: Arc<dyn RoleOverridePolicy>,
}

impl RoleOverrideStep {
    pub fn new(policy: Arc<dyn RoleOverridePolicy>) -> Self {
        Self { policy }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoRoleOverride))
    }

    /// Build the step from deployment settings; disabled unless explicitly enabled
    pub fn from_settings(settings: &RoleOverrideSettings) -> Result<Self, RoleError> {
        if !settings.enabled() {
            return Ok(Self::disabled());
        }

        let allowlist = AllowlistRoleOverride::new(settings.patterns())?;
        tracing::warn!(
            patterns = settings.patterns().len(),
            "Role override allowlist is ENABLED; matching identities receive every role"
        );
        Ok(Self::new(Arc::new(allowlist)))
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn apply(&self, principal: &Principal) -> OverrideOutcome {
        match self.policy.evaluate(&principal.email) {
            Some(matched_pattern) => OverrideOutcome {
                grants: RoleGrants::all(),
                applied: Some(AppliedOverride {
                    policy: self.policy.name(),
                    matched_pattern,
                    original_grants: principal.grants.clone(),
                }),
            },
            None => OverrideOutcome {
                grants: principal.grants.clone(),
                applied: None,
            },
        }
    }
}

impl fmt::Debug for RoleOverrideStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleOverrideStep")
            .field("policy", &self.policy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::role::Role;

    fn principal(email: &str) -> Principal {
        Principal::new("u1", email, RoleGrants::from_ordered([Role::Student]))
    }

    #[test]
    fn test_pattern_kinds() {
        assert_eq!(IdentityPattern::parse("Ops@Uni.edu").unwrap(), IdentityPattern::Exact("ops@uni.edu".into()));
        assert_eq!(IdentityPattern::parse("demo*").unwrap(), IdentityPattern::Prefix("demo".into()));
        assert_eq!(IdentityPattern::parse("*@demo.edu").unwrap(), IdentityPattern::Suffix("@demo.edu".into()));
        assert_eq!(IdentityPattern::parse("*ops*").unwrap(), IdentityPattern::Contains("ops".into()));
    }

    #[test]
    fn test_wildcard_only_patterns_rejected() {
        for raw in ["*", "**", "", "  "] {
            assert!(matches!(
                IdentityPattern::parse(raw),
                Err(RoleError::InvalidOverridePattern { .. })
            ));
        }
        assert!(IdentityPattern::parse("a*b").is_err());
    }

    #[test]
    fn test_pattern_matching_is_case_insensitive() {
        let pattern = IdentityPattern::parse("*@demo.edu").unwrap();
        assert!(pattern.matches("Alice@DEMO.edu"));
        assert!(!pattern.matches("alice@uni.edu"));
    }

    #[test]
    fn test_disabled_step_keeps_grants() {
        let outcome = RoleOverrideStep::disabled().apply(&principal("ops@uni.edu"));

        assert_eq!(outcome.grants.as_slice(), &[Role::Student]);
        assert!(outcome.applied.is_none());
    }

    #[test]
    fn test_settings_disabled_means_no_override() {
        let mut settings = RoleOverrideSettings::allowlist(["ops@uni.edu"]);
        assert!(settings.enabled());
        settings = RoleOverrideSettings::disabled();

        let step = RoleOverrideStep::from_settings(&settings).unwrap();
        assert_eq!(step.policy_name(), "disabled");
        assert!(step.apply(&principal("ops@uni.edu")).applied.is_none());
    }

    #[test]
    fn test_allowlisted_identity_receives_all_roles() {
        let step = RoleOverrideStep::from_settings(&RoleOverrideSettings::allowlist(["ops@uni.edu"])).unwrap();
        let outcome = step.apply(&principal("OPS@uni.edu"));

        assert_eq!(outcome.grants, RoleGrants::all());
        let applied = outcome.applied.unwrap();
        assert_eq!(applied.policy, "allowlist");
        assert_eq!(applied.matched_pattern, "ops@uni.edu");
        assert_eq!(applied.original_grants.as_slice(), &[Role::Student]);
    }

    #[test]
    fn test_non_matching_identity_unchanged() {
        let step = RoleOverrideStep::from_settings(&RoleOverrideSettings::allowlist(["*@demo.edu"])).unwrap();
        let outcome = step.apply(&principal("student@uni.edu"));

        assert!(outcome.applied.is_none());
        assert_eq!(outcome.grants.as_slice(), &[Role::Student]);
    }

    #[test]
    fn test_invalid_allowlist_fails_construction() {
        let result = RoleOverrideStep::from_settings(&RoleOverrideSettings::allowlist(["*"]));
        assert!(result.is_err());
    }
}
