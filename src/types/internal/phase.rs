use std::fmt;

use serde::Serialize;

use crate::types::db::{group_phase_status, project_phase};

/// Status recorded on a group phase status row
///
/// The column is free text; anything outside the four known values is kept
/// verbatim in `Unrecognized` so the caller can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Submitted,
    Approved,
    Unrecognized(String),
}

impl PhaseStatus {
    /// Read the raw column value (a NULL column is unrecognized)
    pub fn from_column(raw: Option<&str>) -> Self {
        match raw {
            Some("pending") => Self::Pending,
            Some("in_progress") => Self::InProgress,
            Some("submitted") => Self::Submitted,
            Some("approved") => Self::Approved,
            Some(other) => Self::Unrecognized(other.to_string()),
            None => Self::Unrecognized(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI state of one phase for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, poem_openapi::Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum PhaseState {
    Completed,
    Current,
    Locked,
}

/// Administrator-configured phase catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDefinition {
    pub id: String,
    pub phase_number: i32,
    pub name: String,
    pub description: Option<String>,
    pub completion_percentage: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_locked: bool,
}

impl From<project_phase::Model> for PhaseDefinition {
    fn from(m: project_phase::Model) -> Self {
        Self {
            id: m.id,
            phase_number: m.phase_number,
            name: m.phase_name,
            description: m.description,
            completion_percentage: m.completion_percentage,
            start_date: m.start_date,
            end_date: m.end_date,
            is_locked: m.is_locked,
        }
    }
}

/// One group's progress row against one phase definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPhaseStatus {
    pub id: String,
    pub group_id: String,
    pub phase_id: String,
    pub status: PhaseStatus,
    pub submission_date: Option<i64>,
    pub mentor_remarks: Option<String>,
    pub updated_at: i64,
}

impl From<group_phase_status::Model> for GroupPhaseStatus {
    fn from(m: group_phase_status::Model) -> Self {
        Self {
            status: PhaseStatus::from_column(m.status.as_deref()),
            id: m.id,
            group_id: m.group_id,
            phase_id: m.phase_id,
            submission_date: m.submission_date,
            mentor_remarks: m.mentor_remarks,
            updated_at: m.updated_at,
        }
    }
}

/// Derived, UI-ready view of one phase for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseViewModel {
    pub phase_id: String,
    pub sequence_number: i32,
    pub display_name: String,
    pub target_completion_percentage: i32,
    pub derived_state: PhaseState,
    pub raw_status: Option<PhaseStatus>,
    pub mentor_remarks: Option<String>,
    pub submission_date: Option<i64>,
}

/// Inconsistency found in status rows while merging
///
/// Resolved with a safe default and logged, never surfaced as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityAnomaly {
    /// More than one status row for the same (group, phase)
    DuplicateStatusRows {
        group_id: String,
        phase_id: String,
        row_count: usize,
        kept_row_id: String,
    },
    /// Status text outside the known set
    UnrecognizedStatus {
        group_id: String,
        phase_id: String,
        raw_status: String,
    },
}

impl DataIntegrityAnomaly {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateStatusRows { .. } => "duplicate_status_rows",
            Self::UnrecognizedStatus { .. } => "unrecognized_status",
        }
    }
}

impl fmt::Display for DataIntegrityAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateStatusRows { group_id, phase_id, row_count, kept_row_id } => write!(
                f,
                "{} status rows for group {} phase {}; kept most recent row {}",
                row_count, group_id, phase_id, kept_row_id
            ),
            Self::UnrecognizedStatus { group_id, phase_id, raw_status } => write!(
                f,
                "unrecognized status '{}' for group {} phase {}; treated as locked",
                raw_status, group_id, phase_id
            ),
        }
    }
}

/// Result of merging phase definitions with a group's status rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergedPhases {
    pub phases: Vec<PhaseViewModel>,
    pub anomalies: Vec<DataIntegrityAnomaly>,
}

impl MergedPhases {
    /// First phase the group is working on, or the last phase once everything is completed
    pub fn current_phase(&self) -> Option<&PhaseViewModel> {
        self.phases
            .iter()
            .find(|p| p.derived_state == PhaseState::Current)
            .or_else(|| {
                self.phases
                    .iter()
                    .all(|p| p.derived_state == PhaseState::Completed)
                    .then(|| self.phases.last())
                    .flatten()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_parse() {
        assert_eq!(PhaseStatus::from_column(Some("pending")), PhaseStatus::Pending);
        assert_eq!(PhaseStatus::from_column(Some("in_progress")), PhaseStatus::InProgress);
        assert_eq!(PhaseStatus::from_column(Some("submitted")), PhaseStatus::Submitted);
        assert_eq!(PhaseStatus::from_column(Some("approved")), PhaseStatus::Approved);
    }

    #[test]
    fn test_unknown_and_null_statuses_are_unrecognized() {
        assert_eq!(
            PhaseStatus::from_column(Some("Approved")),
            PhaseStatus::Unrecognized("Approved".to_string())
        );
        assert_eq!(PhaseStatus::from_column(None), PhaseStatus::Unrecognized(String::new()));
        assert!(!PhaseStatus::from_column(Some("rejected")).is_recognized());
    }

    #[test]
    fn test_status_round_trips_through_as_str() {
        for raw in ["pending", "in_progress", "submitted", "approved", "on_hold"] {
            assert_eq!(PhaseStatus::from_column(Some(raw)).as_str(), raw);
        }
    }

    fn view(n: i32, state: PhaseState) -> PhaseViewModel {
        PhaseViewModel {
            phase_id: format!("p{}", n),
            sequence_number: n,
            display_name: format!("Phase {}", n),
            target_completion_percentage: n * 20,
            derived_state: state,
            raw_status: None,
            mentor_remarks: None,
            submission_date: None,
        }
    }

    #[test]
    fn test_current_phase_is_first_current() {
        let merged = MergedPhases {
            phases: vec![
                view(1, PhaseState::Completed),
                view(2, PhaseState::Current),
                view(3, PhaseState::Current),
            ],
            anomalies: vec![],
        };
        assert_eq!(merged.current_phase().map(|p| p.sequence_number), Some(2));
    }

    #[test]
    fn test_current_phase_when_all_completed_is_last() {
        let merged = MergedPhases {
            phases: vec![view(1, PhaseState::Completed), view(2, PhaseState::Completed)],
            anomalies: vec![],
        };
        assert_eq!(merged.current_phase().map(|p| p.sequence_number), Some(2));
    }

    #[test]
    fn test_current_phase_none_when_everything_locked() {
        let merged = MergedPhases {
            phases: vec![view(1, PhaseState::Locked), view(2, PhaseState::Locked)],
            anomalies: vec![],
        };
        assert!(merged.current_phase().is_none());
        assert!(MergedPhases::default().current_phase().is_none());
    }
}
