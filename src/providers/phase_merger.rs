use std::collections::HashMap;

use crate::errors::InternalError;
use crate::errors::internal::PhaseError;
use crate::types::internal::phase::{
    DataIntegrityAnomaly, GroupPhaseStatus, MergedPhases, PhaseDefinition, PhaseState, PhaseStatus,
    PhaseViewModel,
};

/// Merges the phase catalog with one group's status rows
///
/// Pure: the output depends only on the inputs. Every definition yields
/// exactly one view model, ordered by phase number. Rows whose phase is not
/// in the catalog are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseMerger;

impl PhaseMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge definitions and status rows into ordered view models
    ///
    /// Duplicate rows for the same phase resolve to the most recently updated
    /// one (ties broken by the larger row id). Duplicates and unrecognized
    /// statuses are reported as anomalies and logged; they never fail the merge.
    pub fn merge(&self, definitions: &[PhaseDefinition], rows: &[GroupPhaseStatus]) -> MergedPhases {
        let mut ordered: Vec<&PhaseDefinition> = definitions.iter().collect();
        ordered.sort_by(|a, b| a.phase_number.cmp(&b.phase_number).then_with(|| a.id.cmp(&b.id)));

        let mut rows_by_phase: HashMap<&str, Vec<&GroupPhaseStatus>> = HashMap::new();
        for row in rows {
            rows_by_phase.entry(row.phase_id.as_str()).or_default().push(row);
        }

        let mut anomalies = Vec::new();
        let mut phases = Vec::with_capacity(ordered.len());

        for definition in ordered {
            let candidates = rows_by_phase.get(definition.id.as_str());
            let winner = candidates.and_then(|c| Self::latest_row(c));

            if let (Some(candidates), Some(winner)) = (candidates, winner) {
                if candidates.len() > 1 {
                    anomalies.push(DataIntegrityAnomaly::DuplicateStatusRows {
                        group_id: winner.group_id.clone(),
                        phase_id: definition.id.clone(),
                        row_count: candidates.len(),
                        kept_row_id: winner.id.clone(),
                    });
                }
                if !winner.status.is_recognized() {
                    anomalies.push(DataIntegrityAnomaly::UnrecognizedStatus {
                        group_id: winner.group_id.clone(),
                        phase_id: definition.id.clone(),
                        raw_status: winner.status.as_str().to_string(),
                    });
                }
            }

            let status = winner.map(|w| &w.status);
            phases.push(PhaseViewModel {
                phase_id: definition.id.clone(),
                sequence_number: definition.phase_number,
                display_name: definition.name.clone(),
                target_completion_percentage: definition.completion_percentage,
                derived_state: Self::derive_state(definition.phase_number, status),
                raw_status: status.cloned(),
                mentor_remarks: winner.and_then(|w| w.mentor_remarks.clone()),
                submission_date: winner.and_then(|w| w.submission_date),
            });
        }

        for anomaly in &anomalies {
            tracing::warn!(kind = anomaly.kind(), "Phase data integrity anomaly: {}", anomaly);
        }

        MergedPhases { phases, anomalies }
    }

    /// Merge the results of the two concurrent fetches
    ///
    /// Fails as a whole when either fetch failed; a partial merge would
    /// show every phase as locked or current, which is misleading.
    pub fn merge_fetched(
        &self,
        definitions: Result<Vec<PhaseDefinition>, InternalError>,
        rows: Result<Vec<GroupPhaseStatus>, InternalError>,
    ) -> Result<MergedPhases, InternalError> {
        match (definitions, rows) {
            (Ok(definitions), Ok(rows)) => Ok(self.merge(&definitions, &rows)),
            (Err(err), _) => {
                tracing::error!("Failed to fetch phase definitions: {}", err);
                Err(PhaseError::PhasesUnavailable {
                    reason: format!("phase definitions: {}", err),
                }
                .into())
            }
            (_, Err(err)) => {
                tracing::error!("Failed to fetch group phase status: {}", err);
                Err(PhaseError::PhasesUnavailable {
                    reason: format!("phase status: {}", err),
                }
                .into())
            }
        }
    }

    /// Derive the UI state of one phase from its sequence number and status
    pub fn derive_state(phase_number: i32, status: Option<&PhaseStatus>) -> PhaseState {
        match status {
            Some(PhaseStatus::Approved) => PhaseState::Completed,
            Some(PhaseStatus::Submitted) | Some(PhaseStatus::InProgress) | Some(PhaseStatus::Pending) => {
                PhaseState::Current
            }
            Some(PhaseStatus::Unrecognized(_)) => PhaseState::Locked,
            None if phase_number == 1 => PhaseState::Current,
            None => PhaseState::Locked,
        }
    }

    fn latest_row<'a>(candidates: &[&'a GroupPhaseStatus]) -> Option<&'a GroupPhaseStatus> {
        candidates
            .iter()
            .copied()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)))
    }
}
