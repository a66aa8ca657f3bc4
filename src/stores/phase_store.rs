use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::{PhaseError, RecordError};
use crate::types::db::{group_phase_status, project_phase};
use crate::types::internal::phase::{GroupPhaseStatus, PhaseDefinition};

/// Catalog entry fields written by administrators
#[derive(Debug, Clone)]
pub struct PhaseDraft {
    pub phase_number: i32,
    pub phase_name: String,
    pub description: Option<String>,
    pub completion_percentage: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_locked: bool,
}

impl PhaseDraft {
    fn validate(&self) -> Result<(), InternalError> {
        if self.phase_number < 1 {
            return Err(InternalError::invalid("phase_number", "must be at least 1"));
        }
        if self.phase_name.trim().is_empty() {
            return Err(InternalError::invalid("phase_name", "must not be empty"));
        }
        if !(0..=100).contains(&self.completion_percentage) {
            return Err(InternalError::invalid("completion_percentage", "must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Phase catalog and per-group phase status rows
pub struct PhaseStore {
    db: DatabaseConnection,
}

impl PhaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Phase catalog ordered by phase number
    pub async fn list_definitions(&self) -> Result<Vec<PhaseDefinition>, InternalError> {
        let rows = project_phase::Entity::find()
            .order_by_asc(project_phase::Column::PhaseNumber)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_phase_definitions", e))?;
        Ok(rows.into_iter().map(PhaseDefinition::from).collect())
    }

    pub async fn get_definition(&self, phase_id: &str) -> Result<PhaseDefinition, InternalError> {
        project_phase::Entity::find_by_id(phase_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_phase_definition", e))?
            .map(PhaseDefinition::from)
            .ok_or_else(|| PhaseError::PhaseNotFound(phase_id.to_string()).into())
    }

    async fn ensure_number_free(&self, phase_number: i32, except_id: Option<&str>) -> Result<(), InternalError> {
        let clash = project_phase::Entity::find()
            .filter(project_phase::Column::PhaseNumber.eq(phase_number))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_phase_by_number", e))?;

        match clash {
            Some(existing) if Some(existing.id.as_str()) != except_id => Err(RecordError::Conflict {
                entity: "phase",
                message: format!("Phase number {} is already in use", phase_number),
            }
            .into()),
            _ => Ok(()),
        }
    }

    pub async fn create_definition(&self, draft: PhaseDraft) -> Result<PhaseDefinition, InternalError> {
        draft.validate()?;
        self.ensure_number_free(draft.phase_number, None).await?;

        let created = project_phase::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            phase_number: Set(draft.phase_number),
            phase_name: Set(draft.phase_name.trim().to_string()),
            description: Set(draft.description),
            completion_percentage: Set(draft.completion_percentage),
            start_date: Set(draft.start_date),
            end_date: Set(draft.end_date),
            is_locked: Set(draft.is_locked),
            academic_year_id: Set(None),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_phase_definition", e))?;

        Ok(created.into())
    }

    pub async fn update_definition(&self, phase_id: &str, draft: PhaseDraft) -> Result<PhaseDefinition, InternalError> {
        draft.validate()?;
        let existing = project_phase::Entity::find_by_id(phase_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_phase_definition", e))?
            .ok_or_else(|| InternalError::from(PhaseError::PhaseNotFound(phase_id.to_string())))?;
        self.ensure_number_free(draft.phase_number, Some(phase_id)).await?;

        let mut active: project_phase::ActiveModel = existing.into();
        active.phase_number = Set(draft.phase_number);
        active.phase_name = Set(draft.phase_name.trim().to_string());
        active.description = Set(draft.description);
        active.completion_percentage = Set(draft.completion_percentage);
        active.start_date = Set(draft.start_date);
        active.end_date = Set(draft.end_date);
        active.is_locked = Set(draft.is_locked);

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_phase_definition", e))?;
        Ok(updated.into())
    }

    /// Every status row of one group, duplicates included
    pub async fn status_rows_for_group(&self, group_id: &str) -> Result<Vec<GroupPhaseStatus>, InternalError> {
        let rows = group_phase_status::Entity::find()
            .filter(group_phase_status::Column::GroupId.eq(group_id))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("status_rows_for_group", e))?;
        Ok(rows.into_iter().map(GroupPhaseStatus::from).collect())
    }

    /// Every status row of the given groups, duplicates included
    pub async fn status_rows_for_groups(&self, group_ids: &[String]) -> Result<Vec<GroupPhaseStatus>, InternalError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = group_phase_status::Entity::find()
            .filter(group_phase_status::Column::GroupId.is_in(group_ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("status_rows_for_groups", e))?;
        Ok(rows.into_iter().map(GroupPhaseStatus::from).collect())
    }

    /// Status of the row the merger keeps for (group, phase), if any
    pub async fn latest_status(&self, group_id: &str, phase_id: &str) -> Result<Option<GroupPhaseStatus>, InternalError> {
        Ok(self.latest_row(group_id, phase_id).await?.map(GroupPhaseStatus::from))
    }

    /// Most recent row for (group, phase), the same one the merger keeps
    async fn latest_row(
        &self,
        group_id: &str,
        phase_id: &str,
    ) -> Result<Option<group_phase_status::Model>, InternalError> {
        group_phase_status::Entity::find()
            .filter(group_phase_status::Column::GroupId.eq(group_id))
            .filter(group_phase_status::Column::PhaseId.eq(phase_id))
            .order_by_desc(group_phase_status::Column::UpdatedAt)
            .order_by_desc(group_phase_status::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("latest_status_row", e))
    }

    /// Mark a phase submitted for a group, updating its most recent row or creating one
    pub async fn submit(&self, group_id: &str, phase_id: &str) -> Result<GroupPhaseStatus, InternalError> {
        let now = Utc::now().timestamp();

        let saved = match self.latest_row(group_id, phase_id).await? {
            Some(row) => {
                let mut active: group_phase_status::ActiveModel = row.into();
                active.status = Set(Some("submitted".to_string()));
                active.submission_date = Set(Some(now));
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| InternalError::database("update_status_row", e))?
            }
            None => group_phase_status::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                group_id: Set(group_id.to_string()),
                phase_id: Set(phase_id.to_string()),
                status: Set(Some("submitted".to_string())),
                submission_date: Set(Some(now)),
                mentor_remarks: Set(None),
                approved_at: Set(None),
                approved_by: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_status_row", e))?,
        };

        Ok(saved.into())
    }

    pub async fn get_status_row(&self, row_id: &str) -> Result<group_phase_status::Model, InternalError> {
        group_phase_status::Entity::find_by_id(row_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_status_row", e))?
            .ok_or_else(|| InternalError::not_found("phase_status", row_id))
    }

    /// Approve a status row with the mentor's remarks
    pub async fn approve(
        &self,
        row_id: &str,
        mentor_id: &str,
        remarks: Option<String>,
    ) -> Result<GroupPhaseStatus, InternalError> {
        let now = Utc::now().timestamp();
        let mut active: group_phase_status::ActiveModel = self.get_status_row(row_id).await?.into();
        active.status = Set(Some("approved".to_string()));
        active.mentor_remarks = Set(remarks);
        active.approved_at = Set(Some(now));
        active.approved_by = Set(Some(mentor_id.to_string()));
        active.updated_at = Set(now);

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("approve_status_row", e))?;
        Ok(updated.into())
    }

    /// Rows awaiting review for the given groups, oldest submission first
    ///
    /// Only the newest row of each (group, phase) counts; a superseded
    /// `submitted` duplicate is not awaiting anything.
    pub async fn submitted_rows_for_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<group_phase_status::Model>, InternalError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = group_phase_status::Entity::find()
            .filter(group_phase_status::Column::GroupId.is_in(group_ids.iter().cloned()))
            .order_by_desc(group_phase_status::Column::UpdatedAt)
            .order_by_desc(group_phase_status::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("submitted_rows_for_groups", e))?;

        let mut seen = HashSet::new();
        let mut submitted: Vec<_> = rows
            .into_iter()
            .filter(|row| seen.insert((row.group_id.clone(), row.phase_id.clone())))
            .filter(|row| row.status.as_deref() == Some("submitted"))
            .collect();
        submitted.sort_by_key(|row| row.submission_date);
        Ok(submitted)
    }
}
