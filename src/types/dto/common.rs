use poem_openapi::Object;

use crate::types::internal::phase::{MergedPhases, PhaseState, PhaseViewModel};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Plain acknowledgement
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// One phase of one group as shown on a dashboard
#[derive(Object, Debug, Clone, PartialEq)]
pub struct PhaseView {
    pub phase_id: String,
    pub phase_number: i32,
    pub name: String,

    /// Target completion percentage once this phase is done
    pub completion_percentage: i32,

    pub state: PhaseState,

    /// Stored status text; absent when the group has no row for the phase
    pub status: Option<String>,

    pub mentor_remarks: Option<String>,

    /// Unix timestamp of the latest submission
    pub submission_date: Option<i64>,
}

impl From<&PhaseViewModel> for PhaseView {
    fn from(view: &PhaseViewModel) -> Self {
        Self {
            phase_id: view.phase_id.clone(),
            phase_number: view.sequence_number,
            name: view.display_name.clone(),
            completion_percentage: view.target_completion_percentage,
            state: view.derived_state,
            status: view.raw_status.as_ref().map(|s| s.to_string()),
            mentor_remarks: view.mentor_remarks.clone(),
            submission_date: view.submission_date,
        }
    }
}

/// Ordered phases of one group
#[derive(Object, Debug)]
pub struct PhaseProgressResponse {
    /// Absent when the student is not in a group yet
    pub group_id: Option<String>,
    pub phases: Vec<PhaseView>,

    /// Phase the group is working on; the last phase once all are completed
    pub current_phase_number: Option<i32>,

    /// Number of inconsistent status rows resolved while merging
    pub anomalies: u32,
}

impl PhaseProgressResponse {
    pub fn from_merged(group_id: Option<String>, merged: &MergedPhases) -> Self {
        Self {
            group_id,
            phases: merged.phases.iter().map(PhaseView::from).collect(),
            current_phase_number: merged.current_phase().map(|p| p.sequence_number),
            anomalies: merged.anomalies.len() as u32,
        }
    }
}
