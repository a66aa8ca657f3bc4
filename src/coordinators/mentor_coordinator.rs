use std::collections::HashMap;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::errors::internal::PhaseError;
use crate::providers::PhaseProgressProvider;
use crate::stores::{DiaryStore, GroupStore, NotificationStore, PhaseStore};
use crate::types::db::project_group;
use crate::types::dto::common::{PhaseProgressResponse, PhaseView};
use crate::types::dto::mentor::{
    AnnouncementRequest, AnnouncementResponse, MentorGroupView, ReviewItemKind, ReviewItemView,
};
use crate::types::dto::student::DiaryEntryView;
use crate::types::internal::auth::Principal;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Mentor dashboard workflows over the mentor's assigned groups
pub struct MentorCoordinator {
    group_store: Arc<GroupStore>,
    phase_store: Arc<PhaseStore>,
    diary_store: Arc<DiaryStore>,
    notification_store: Arc<NotificationStore>,
    phase_progress: Arc<PhaseProgressProvider>,
    audit_logger: Arc<AuditLogger>,
}

impl MentorCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            group_store: app_data.group_store.clone(),
            phase_store: app_data.phase_store.clone(),
            diary_store: app_data.diary_store.clone(),
            notification_store: app_data.notification_store.clone(),
            phase_progress: app_data.phase_progress.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Load a group and check the principal mentors it
    async fn mentored_group(&self, principal: &Principal, group_id: &str) -> Result<project_group::Model, InternalError> {
        let group = self.group_store.get_group(group_id).await?;
        if group.mentor_id.as_deref() != Some(principal.user_id.as_str()) {
            return Err(PhaseError::NotGroupMentor {
                group_id: group_id.to_string(),
            }
            .into());
        }
        Ok(group)
    }

    /// Assigned groups with member count and current phase
    pub async fn my_groups(&self, ctx: &RequestContext) -> Result<Vec<MentorGroupView>, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        let groups = self.group_store.groups_for_mentor(&principal.user_id).await?;
        let group_ids: Vec<String> = groups.iter().map(|g| g.id.clone()).collect();

        let counts = self.group_store.member_counts(&group_ids).await?;
        let mut progress = self.phase_progress.for_groups(&group_ids).await?;

        Ok(groups
            .into_iter()
            .map(|group| {
                let current_phase = progress
                    .remove(&group.id)
                    .and_then(|merged| merged.current_phase().map(PhaseView::from));
                MentorGroupView {
                    member_count: counts.get(&group.id).copied().unwrap_or(0),
                    current_phase,
                    id: group.id,
                    group_code: group.group_id,
                    project_title: group.project_title,
                    status: group.status,
                }
            })
            .collect())
    }

    /// Submitted phases and unreviewed diary entries, newest first
    pub async fn review_queue(&self, ctx: &RequestContext) -> Result<Vec<ReviewItemView>, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        let groups = self.group_store.groups_for_mentor(&principal.user_id).await?;
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let codes: HashMap<String, String> = groups.iter().map(|g| (g.id.clone(), g.group_id.clone())).collect();
        let group_ids: Vec<String> = groups.into_iter().map(|g| g.id).collect();

        let (submissions, diary_entries, definitions) = tokio::join!(
            self.phase_store.submitted_rows_for_groups(&group_ids),
            self.diary_store.unreviewed_for_groups(&group_ids),
            self.phase_progress.definitions()
        );
        let phase_names: HashMap<String, String> = definitions?
            .iter()
            .map(|d| (d.id.clone(), format!("Phase {}: {}", d.phase_number, d.name)))
            .collect();

        let code_of = |group_id: &str| codes.get(group_id).cloned().unwrap_or_default();

        let mut items: Vec<ReviewItemView> = submissions?
            .into_iter()
            .map(|row| ReviewItemView {
                kind: ReviewItemKind::PhaseSubmission,
                group_code: code_of(&row.group_id),
                title: phase_names
                    .get(&row.phase_id)
                    .cloned()
                    .unwrap_or_else(|| "Phase submission".to_string()),
                submitted_at: row.submission_date.or(Some(row.updated_at)),
                id: row.id,
                group_id: row.group_id,
            })
            .collect();

        // entry_date is the creation day, so created_at orders entries within it
        items.extend(diary_entries?.into_iter().map(|entry| ReviewItemView {
            kind: ReviewItemKind::DiaryEntry,
            group_code: code_of(&entry.group_id),
            title: format!("Diary entry {}", entry.entry_date),
            submitted_at: Some(entry.created_at),
            id: entry.id,
            group_id: entry.group_id,
        }));

        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }

    /// Approve a submitted phase of one of the mentor's groups
    pub async fn approve_phase(
        &self,
        ctx: &RequestContext,
        status_row_id: &str,
        remarks: Option<String>,
    ) -> Result<PhaseProgressResponse, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        let row = self.phase_store.get_status_row(status_row_id).await?;
        let group = self.mentored_group(&principal, &row.group_id).await?;

        let approved = self.phase_store.approve(&row.id, &principal.user_id, remarks).await?;
        self.phase_progress.invalidate_group(&group.id);

        tracing::info!(group_id = %group.id, phase_id = %approved.phase_id, "Phase approved");
        if let Err(audit_err) = self
            .audit_logger
            .log_phase_approved(ctx, &group.id, &approved.phase_id, &approved.id)
            .await
        {
            tracing::error!("Failed to log phase approval: {:?}", audit_err);
        }

        let merged = self.phase_progress.for_group(&group.id).await?;
        Ok(PhaseProgressResponse::from_merged(Some(group.id), &merged))
    }

    pub async fn review_diary_entry(
        &self,
        ctx: &RequestContext,
        entry_id: &str,
        comments: Option<String>,
    ) -> Result<DiaryEntryView, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        let entry = self.diary_store.get_entry(entry_id).await?;
        let group = self.mentored_group(&principal, &entry.group_id).await?;

        let reviewed = self.diary_store.review(&entry.id, &principal.user_id, comments).await?;
        if let Err(audit_err) = self.audit_logger.log_diary_reviewed(ctx, &group.id, &reviewed.id).await {
            tracing::error!("Failed to log diary review: {:?}", audit_err);
        }
        Ok(reviewed.into())
    }

    /// One notification per member of the selected groups
    pub async fn announce(
        &self,
        ctx: &RequestContext,
        request: AnnouncementRequest,
    ) -> Result<AnnouncementResponse, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        if request.title.trim().is_empty() {
            return Err(InternalError::invalid("title", "must not be empty"));
        }
        if request.message.trim().is_empty() {
            return Err(InternalError::invalid("message", "must not be empty"));
        }

        let mut recipients = Vec::new();
        for group_id in &request.group_ids {
            self.mentored_group(&principal, group_id).await?;
            recipients.extend(
                self.group_store
                    .members_of(group_id)
                    .await?
                    .into_iter()
                    .map(|m| m.student_id),
            );
        }
        recipients.sort();
        recipients.dedup();

        let sent = self
            .notification_store
            .notify_all(&recipients, request.title.trim(), request.message.trim(), "info")
            .await?;
        tracing::info!(mentor_id = %principal.user_id, recipients = sent, "Announcement sent");

        Ok(AnnouncementResponse { recipients: sent as u64 })
    }

    pub async fn group_phases(&self, ctx: &RequestContext, group_id: &str) -> Result<PhaseProgressResponse, InternalError> {
        let principal = ctx.require_role(Role::Mentor)?;
        let group = self.mentored_group(&principal, group_id).await?;
        let merged = self.phase_progress.for_group(&group.id).await?;
        Ok(PhaseProgressResponse::from_merged(Some(group.id), &merged))
    }
}
