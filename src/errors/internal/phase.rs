use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhaseError {
    /// Either the phase catalog or the status rows could not be fetched.
    /// No partial merge is produced; callers may retry.
    #[error("Phase data unavailable: {reason}")]
    PhasesUnavailable { reason: String },

    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Phase {phase_number} is locked by an administrator")]
    PhaseLocked { phase_number: i32 },

    #[error("Phase {phase_number} is already approved")]
    AlreadyApproved { phase_number: i32 },

    #[error("User is not the mentor of group {group_id}")]
    NotGroupMentor { group_id: String },

    #[error("User {user_id} is not a member of any group")]
    NoGroupAssigned { user_id: String },
}
