use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    LoginSuccess,
    LoginFailure,
    UserRegistered,
    RoleMismatch,
    RoleOverrideApplied,
    RoleGranted,
    RoleRevoked,
    PhaseSubmitted,
    PhaseApproved,
    DiaryReviewed,
    MentorAssigned,
    Custom(String),
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::UserRegistered => "user_registered",
            Self::RoleMismatch => "role_mismatch",
            Self::RoleOverrideApplied => "role_override_applied",
            Self::RoleGranted => "role_granted",
            Self::RoleRevoked => "role_revoked",
            Self::PhaseSubmitted => "phase_submitted",
            Self::PhaseApproved => "phase_approved",
            Self::DiaryReviewed => "diary_reviewed",
            Self::MentorAssigned => "mentor_assigned",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        EventType::Custom(s.to_string())
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    /// Who performed the action
    pub actor_id: String,
    /// Who or what the action was performed on
    pub target_id: Option<String>,
    pub ip_address: Option<String>,
    pub request_id: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType, actor_id: impl Into<String>) -> Self {
        Self {
            event_type,
            actor_id: actor_id.into(),
            target_id: None,
            ip_address: None,
            request_id: None,
            data: HashMap::new(),
        }
    }
}
