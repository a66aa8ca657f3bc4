use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::project_diary;

#[derive(Debug, Clone)]
pub struct NewDiaryEntry {
    pub work_done: String,
    pub issues_faced: Option<String>,
    pub next_plan: Option<String>,
}

/// Weekly project diary entries of groups
pub struct DiaryStore {
    db: DatabaseConnection,
}

impl DiaryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Entries of one group, newest first
    pub async fn entries_for_group(&self, group_id: &str) -> Result<Vec<project_diary::Model>, InternalError> {
        project_diary::Entity::find()
            .filter(project_diary::Column::GroupId.eq(group_id))
            .order_by_desc(project_diary::Column::EntryDate)
            .order_by_desc(project_diary::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("diary_entries_for_group", e))
    }

    /// Record today's entry for a group
    pub async fn add_entry(
        &self,
        group_id: &str,
        submitted_by: &str,
        entry: NewDiaryEntry,
    ) -> Result<project_diary::Model, InternalError> {
        if entry.work_done.trim().is_empty() {
            return Err(InternalError::invalid("work_done", "must not be empty"));
        }

        let now = Utc::now();
        project_diary::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            group_id: Set(group_id.to_string()),
            entry_date: Set(now.format("%Y-%m-%d").to_string()),
            work_done: Set(entry.work_done.trim().to_string()),
            issues_faced: Set(entry.issues_faced.filter(|s| !s.trim().is_empty())),
            next_plan: Set(entry.next_plan.filter(|s| !s.trim().is_empty())),
            submitted_by: Set(Some(submitted_by.to_string())),
            is_reviewed: Set(false),
            mentor_comments: Set(None),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_diary_entry", e))
    }

    pub async fn get_entry(&self, entry_id: &str) -> Result<project_diary::Model, InternalError> {
        project_diary::Entity::find_by_id(entry_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_diary_entry", e))?
            .ok_or_else(|| InternalError::not_found("diary_entry", entry_id))
    }

    /// Entries of the given groups not yet reviewed, newest first
    pub async fn unreviewed_for_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<project_diary::Model>, InternalError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        project_diary::Entity::find()
            .filter(project_diary::Column::GroupId.is_in(group_ids.iter().cloned()))
            .filter(project_diary::Column::IsReviewed.eq(false))
            .order_by_desc(project_diary::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("unreviewed_diary_entries", e))
    }

    pub async fn review(
        &self,
        entry_id: &str,
        mentor_id: &str,
        comments: Option<String>,
    ) -> Result<project_diary::Model, InternalError> {
        let now = Utc::now().timestamp();
        let mut active: project_diary::ActiveModel = self.get_entry(entry_id).await?.into();
        active.is_reviewed = Set(true);
        active.mentor_comments = Set(comments);
        active.reviewed_at = Set(Some(now));
        active.reviewed_by = Set(Some(mentor_id.to_string()));
        active.updated_at = Set(now);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("review_diary_entry", e))
    }
}
