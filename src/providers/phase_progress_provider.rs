use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::PhaseError;
use crate::providers::phase_merger::PhaseMerger;
use crate::stores::{CacheEntity, CacheScope, PhaseStore, QueryCache};
use crate::types::internal::phase::{GroupPhaseStatus, MergedPhases, PhaseDefinition};

/// Cached reads of the phase catalog and status rows, merged per group
pub struct PhaseProgressProvider {
    phase_store: Arc<PhaseStore>,
    cache: Arc<QueryCache>,
    merger: PhaseMerger,
}

impl PhaseProgressProvider {
    pub fn new(phase_store: Arc<PhaseStore>, cache: Arc<QueryCache>) -> Self {
        Self {
            phase_store,
            cache,
            merger: PhaseMerger::new(),
        }
    }

    pub async fn definitions(&self) -> Result<Arc<Vec<PhaseDefinition>>, InternalError> {
        self.cache
            .get_or_load(CacheEntity::PhaseDefinitions, CacheScope::All, || {
                self.phase_store.list_definitions()
            })
            .await
    }

    async fn status_rows(&self, group_id: &str) -> Result<Arc<Vec<GroupPhaseStatus>>, InternalError> {
        self.cache
            .get_or_load(
                CacheEntity::PhaseStatuses,
                CacheScope::Group(group_id.to_string()),
                || self.phase_store.status_rows_for_group(group_id),
            )
            .await
    }

    /// Merged phases of one group
    ///
    /// The catalog and the group's rows are fetched concurrently; if either
    /// fetch fails the whole view is unavailable.
    pub async fn for_group(&self, group_id: &str) -> Result<MergedPhases, InternalError> {
        let (definitions, rows) = tokio::join!(self.definitions(), self.status_rows(group_id));
        self.merger.merge_fetched(
            definitions.map(|d| d.as_ref().clone()),
            rows.map(|r| r.as_ref().clone()),
        )
    }

    /// Catalog merged with no status rows: phase 1 current, the rest locked
    pub async fn without_group(&self) -> Result<MergedPhases, InternalError> {
        let definitions = self.definitions().await;
        self.merger
            .merge_fetched(definitions.map(|d| d.as_ref().clone()), Ok(Vec::new()))
    }

    /// Merged phases of several groups from one catalog read and one status query
    pub async fn for_groups(&self, group_ids: &[String]) -> Result<HashMap<String, MergedPhases>, InternalError> {
        let (definitions, rows) = tokio::join!(
            self.definitions(),
            self.phase_store.status_rows_for_groups(group_ids)
        );
        let definitions = definitions.map_err(|e| Self::unavailable("phase definitions", e))?;
        let rows = rows.map_err(|e| Self::unavailable("phase status", e))?;

        let mut by_group: HashMap<&str, Vec<GroupPhaseStatus>> = HashMap::new();
        for row in &rows {
            by_group.entry(row.group_id.as_str()).or_default().push(row.clone());
        }

        Ok(group_ids
            .iter()
            .map(|group_id| {
                let group_rows = by_group.get(group_id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                (group_id.clone(), self.merger.merge(&definitions, group_rows))
            })
            .collect())
    }

    fn unavailable(source: &str, err: InternalError) -> InternalError {
        tracing::error!("Failed to fetch {}: {}", source, err);
        PhaseError::PhasesUnavailable {
            reason: format!("{}: {}", source, err),
        }
        .into()
    }

    pub fn invalidate_group(&self, group_id: &str) {
        self.cache
            .invalidate(CacheEntity::PhaseStatuses, &CacheScope::Group(group_id.to_string()));
    }

    /// Catalog changed: drop it and every merged view built on it
    pub fn invalidate_definitions(&self) {
        self.cache.invalidate(CacheEntity::PhaseDefinitions, &CacheScope::All);
        self.cache.invalidate_entity(CacheEntity::PhaseStatuses);
    }
}
