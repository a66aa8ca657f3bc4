use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::errors::internal::PhaseError;
use crate::providers::PhaseProgressProvider;
use crate::stores::{
    AcademicStore, DiaryStore, DocumentStore, GroupStore, MeetingRequest, MeetingStore, NewDiaryEntry, NewDocument,
    NotificationStore, PhaseStore, UserStore,
};
use crate::types::db::project_group;
use crate::types::dto::common::PhaseProgressResponse;
use crate::types::dto::student::{
    DiaryEntryRequest, DiaryEntryView, DocumentRequest, DocumentView, GroupMemberView, MeetingRequestBody,
    MeetingView, NotificationView, StudentGroupResponse, StudentGroupView,
};
use crate::types::internal::auth::Principal;
use crate::types::internal::context::RequestContext;
use crate::types::internal::phase::PhaseStatus;
use crate::types::internal::role::Role;

/// Student dashboard workflows, scoped to the student's own group
pub struct StudentCoordinator {
    user_store: Arc<UserStore>,
    group_store: Arc<GroupStore>,
    phase_store: Arc<PhaseStore>,
    diary_store: Arc<DiaryStore>,
    document_store: Arc<DocumentStore>,
    meeting_store: Arc<MeetingStore>,
    notification_store: Arc<NotificationStore>,
    academic_store: Arc<AcademicStore>,
    phase_progress: Arc<PhaseProgressProvider>,
    audit_logger: Arc<AuditLogger>,
}

impl StudentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            group_store: app_data.group_store.clone(),
            phase_store: app_data.phase_store.clone(),
            diary_store: app_data.diary_store.clone(),
            document_store: app_data.document_store.clone(),
            meeting_store: app_data.meeting_store.clone(),
            notification_store: app_data.notification_store.clone(),
            academic_store: app_data.academic_store.clone(),
            phase_progress: app_data.phase_progress.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    async fn group_of(&self, principal: &Principal) -> Result<Option<project_group::Model>, InternalError> {
        match self.group_store.membership_for_student(&principal.user_id).await? {
            Some(membership) => Ok(Some(self.group_store.get_group(&membership.group_id).await?)),
            None => Ok(None),
        }
    }

    async fn require_group(&self, principal: &Principal) -> Result<project_group::Model, InternalError> {
        self.group_of(principal).await?.ok_or_else(|| {
            PhaseError::NoGroupAssigned {
                user_id: principal.user_id.clone(),
            }
            .into()
        })
    }

    /// The student's group with mentor, department, year and member names
    pub async fn my_group(&self, ctx: &RequestContext) -> Result<StudentGroupResponse, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let Some(group) = self.group_of(&principal).await? else {
            return Ok(StudentGroupResponse { group: None });
        };

        let mentor_name = match &group.mentor_id {
            Some(mentor_id) => self
                .user_store
                .get_profile(mentor_id)
                .await?
                .map(|p| p.full_name)
                .unwrap_or_else(|| "Unknown".to_string()),
            None => "Not Assigned".to_string(),
        };

        let department_name = match &group.department_id {
            Some(id) => self.academic_store.get_department(id).await?.map(|d| d.name),
            None => None,
        };

        let academic_year = match &group.academic_year_id {
            Some(id) => match self.academic_store.get_year(id).await {
                Ok(year) => Some(year.year_name),
                Err(InternalError::Record(_)) => None,
                Err(err) => return Err(err),
            },
            None => None,
        };

        let memberships = self.group_store.members_of(&group.id).await?;
        let member_ids: Vec<String> = memberships.iter().map(|m| m.student_id.clone()).collect();
        let profiles: HashMap<String, _> = self
            .user_store
            .profiles_for(&member_ids)
            .await?
            .into_iter()
            .map(|p| (p.user_id.clone(), p))
            .collect();

        let members = memberships
            .into_iter()
            .map(|m| {
                let profile = profiles.get(&m.student_id);
                GroupMemberView {
                    full_name: profile.map(|p| p.full_name.clone()).unwrap_or_else(|| "Unknown".to_string()),
                    usn: profile.and_then(|p| p.usn.clone()),
                    user_id: m.student_id,
                    is_leader: m.is_leader,
                }
            })
            .collect();

        Ok(StudentGroupResponse {
            group: Some(StudentGroupView {
                id: group.id,
                group_code: group.group_id,
                project_title: if group.project_title.trim().is_empty() {
                    "Untitled Project".to_string()
                } else {
                    group.project_title
                },
                project_description: group.project_description,
                status: group.status,
                department_name,
                mentor_name,
                academic_year,
                members,
            }),
        })
    }

    /// Merged phase progress of the student's group
    ///
    /// Without a group the catalog is still listed, merged with no status rows.
    pub async fn my_phases(&self, ctx: &RequestContext) -> Result<PhaseProgressResponse, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        match self.group_of(&principal).await? {
            Some(group) => {
                let merged = self.phase_progress.for_group(&group.id).await?;
                Ok(PhaseProgressResponse::from_merged(Some(group.id), &merged))
            }
            None => {
                let merged = self.phase_progress.without_group().await?;
                Ok(PhaseProgressResponse::from_merged(None, &merged))
            }
        }
    }

    /// Mark a phase submitted for the student's group
    pub async fn submit_phase(&self, ctx: &RequestContext, phase_id: &str) -> Result<PhaseProgressResponse, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;

        let definition = self.phase_store.get_definition(phase_id).await?;
        if definition.is_locked {
            return Err(PhaseError::PhaseLocked {
                phase_number: definition.phase_number,
            }
            .into());
        }

        let latest = self.phase_store.latest_status(&group.id, &definition.id).await?;
        if latest.is_some_and(|row| row.status == PhaseStatus::Approved) {
            return Err(PhaseError::AlreadyApproved {
                phase_number: definition.phase_number,
            }
            .into());
        }

        self.phase_store.submit(&group.id, &definition.id).await?;
        self.phase_progress.invalidate_group(&group.id);

        tracing::info!(group_id = %group.id, phase = definition.phase_number, "Phase submitted");
        if let Err(audit_err) = self.audit_logger.log_phase_submitted(ctx, &group.id, &definition.id).await {
            tracing::error!("Failed to log phase submission: {:?}", audit_err);
        }

        let merged = self.phase_progress.for_group(&group.id).await?;
        Ok(PhaseProgressResponse::from_merged(Some(group.id), &merged))
    }

    pub async fn diary(&self, ctx: &RequestContext) -> Result<Vec<DiaryEntryView>, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        let entries = self.diary_store.entries_for_group(&group.id).await?;
        Ok(entries.into_iter().map(DiaryEntryView::from).collect())
    }

    pub async fn add_diary_entry(
        &self,
        ctx: &RequestContext,
        request: DiaryEntryRequest,
    ) -> Result<DiaryEntryView, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        let entry = NewDiaryEntry {
            work_done: request.work_done,
            issues_faced: request.issues_faced,
            next_plan: request.next_plan,
        };
        let created = self.diary_store.add_entry(&group.id, &principal.user_id, entry).await?;
        Ok(created.into())
    }

    pub async fn documents(&self, ctx: &RequestContext) -> Result<Vec<DocumentView>, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        let documents = self.document_store.documents_for_group(&group.id).await?;
        Ok(documents.into_iter().map(DocumentView::from).collect())
    }

    pub async fn add_document(&self, ctx: &RequestContext, request: DocumentRequest) -> Result<DocumentView, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        if let Some(phase_id) = &request.phase_id {
            self.phase_store.get_definition(phase_id).await?;
        }
        let document = NewDocument {
            document_type: request.document_type,
            title: request.title,
            file_name: request.file_name,
            file_url: request.file_url,
            file_size: request.file_size,
            phase_id: request.phase_id,
        };
        let created = self.document_store.add_document(&group.id, &principal.user_id, document).await?;
        Ok(created.into())
    }

    /// Meetings of the student's group from now on, soonest first
    pub async fn meetings(&self, ctx: &RequestContext) -> Result<Vec<MeetingView>, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        let meetings = self
            .meeting_store
            .upcoming_for_group(&group.id, Utc::now().timestamp())
            .await?;
        Ok(meetings.into_iter().map(MeetingView::from).collect())
    }

    pub async fn request_meeting(
        &self,
        ctx: &RequestContext,
        request: MeetingRequestBody,
    ) -> Result<MeetingView, InternalError> {
        let principal = ctx.require_role(Role::Student)?;
        let group = self.require_group(&principal).await?;
        let meeting = MeetingRequest {
            title: request.title,
            description: request.description,
            meeting_type: request.meeting_type,
            scheduled_at: request.scheduled_at,
            location: request.location,
        };
        let created = self
            .meeting_store
            .request_meeting(&group.id, &principal.user_id, meeting)
            .await?;
        Ok(created.into())
    }

    /// Own notifications, newest first; any signed-in role may read its own
    pub async fn notifications(&self, ctx: &RequestContext) -> Result<Vec<NotificationView>, InternalError> {
        let principal = ctx.require_principal()?;
        let notifications = self.notification_store.for_user(&principal.user_id).await?;
        Ok(notifications.into_iter().map(NotificationView::from).collect())
    }

    pub async fn mark_notification_read(&self, ctx: &RequestContext, notification_id: &str) -> Result<(), InternalError> {
        let principal = ctx.require_principal()?;
        self.notification_store.mark_read(&principal.user_id, notification_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::RoleError;
    use crate::stores::{NewGroup, PhaseDraft};
    use crate::test::utils::{create_test_user, setup_test_app_data};
    use crate::types::internal::auth::Claims;
    use crate::types::internal::phase::PhaseState;

    fn ctx_for(user_id: &str, roles: &[Role]) -> RequestContext {
        RequestContext::new().with_auth(Claims {
            sub: user_id.to_string(),
            email: format!("{}@uni.edu", user_id),
            active_role: roles[0],
            roles: roles.to_vec(),
            exp: i64::MAX,
            iat: 0,
            jti: "test".to_string(),
        })
    }

    fn draft(n: i32, locked: bool) -> PhaseDraft {
        PhaseDraft {
            phase_number: n,
            phase_name: format!("Phase {}", n),
            description: None,
            completion_percentage: n * 25,
            start_date: None,
            end_date: None,
            is_locked: locked,
        }
    }

    async fn student_in_group(app_data: &Arc<AppData>) -> (String, String) {
        let student = create_test_user(&app_data.connections.main, "asha@uni.edu").await;
        let group = app_data
            .group_store
            .create_group(NewGroup {
                group_code: "CSE-01".to_string(),
                project_title: "Smart Campus".to_string(),
                project_description: None,
                department_id: None,
                academic_year_id: None,
            })
            .await
            .unwrap();
        app_data.group_store.add_member(&group.id, &student, true).await.unwrap();
        (student, group.id)
    }

    #[tokio::test]
    async fn test_group_details_with_fallback_names() {
        let app_data = setup_test_app_data().await;
        let (student, group_id) = student_in_group(&app_data).await;
        let coordinator = StudentCoordinator::new(app_data);

        let response = coordinator.my_group(&ctx_for(&student, &[Role::Student])).await.unwrap();
        let group = response.group.unwrap();

        assert_eq!(group.id, group_id);
        assert_eq!(group.mentor_name, "Not Assigned");
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].full_name, "asha");
        assert!(group.department_name.is_none());
    }

    #[tokio::test]
    async fn test_student_without_group() {
        let app_data = setup_test_app_data().await;
        let student = create_test_user(&app_data.connections.main, "solo@uni.edu").await;
        app_data.phase_store.create_definition(draft(1, false)).await.unwrap();
        app_data.phase_store.create_definition(draft(2, false)).await.unwrap();
        let coordinator = StudentCoordinator::new(app_data);
        let ctx = ctx_for(&student, &[Role::Student]);

        assert!(coordinator.my_group(&ctx).await.unwrap().group.is_none());

        let progress = coordinator.my_phases(&ctx).await.unwrap();
        assert!(progress.group_id.is_none());
        assert_eq!(progress.phases.len(), 2);
        assert_eq!(progress.phases[0].state, PhaseState::Current);
        assert_eq!(progress.phases[1].state, PhaseState::Locked);
        assert_eq!(progress.current_phase_number, Some(1));

        assert!(matches!(
            coordinator.diary(&ctx).await,
            Err(InternalError::Phase(PhaseError::NoGroupAssigned { .. }))
        ));
    }

    #[tokio::test]
    async fn test_requires_student_role() {
        let app_data = setup_test_app_data().await;
        let coordinator = StudentCoordinator::new(app_data);

        assert!(matches!(
            coordinator.my_group(&ctx_for("m1", &[Role::Mentor])).await,
            Err(InternalError::Role(RoleError::RoleRequired { required: Role::Student }))
        ));
    }

    #[tokio::test]
    async fn test_submit_phase_updates_progress() {
        let app_data = setup_test_app_data().await;
        let (student, _) = student_in_group(&app_data).await;
        let phase1 = app_data.phase_store.create_definition(draft(1, false)).await.unwrap();
        app_data.phase_store.create_definition(draft(2, false)).await.unwrap();
        let coordinator = StudentCoordinator::new(app_data.clone());
        let ctx = ctx_for(&student, &[Role::Student]);

        let before = coordinator.my_phases(&ctx).await.unwrap();
        assert_eq!(before.phases[0].state, PhaseState::Current);
        assert!(before.phases[0].status.is_none());

        let after = coordinator.submit_phase(&ctx, &phase1.id).await.unwrap();
        assert_eq!(after.phases[0].state, PhaseState::Current);
        assert_eq!(after.phases[0].status.as_deref(), Some("submitted"));
        assert_eq!(after.current_phase_number, Some(1));

        let submitted = app_data.audit_store.recent_events("phase_submitted", 10).await.unwrap();
        assert_eq!(submitted.len(), 1);
    }

    #[tokio::test]
    async fn test_locked_phase_cannot_be_submitted() {
        let app_data = setup_test_app_data().await;
        let (student, _) = student_in_group(&app_data).await;
        let locked = app_data.phase_store.create_definition(draft(1, true)).await.unwrap();
        let coordinator = StudentCoordinator::new(app_data);

        assert!(matches!(
            coordinator.submit_phase(&ctx_for(&student, &[Role::Student]), &locked.id).await,
            Err(InternalError::Phase(PhaseError::PhaseLocked { phase_number: 1 }))
        ));
    }

    #[tokio::test]
    async fn test_approved_phase_cannot_be_resubmitted() {
        let app_data = setup_test_app_data().await;
        let (student, group_id) = student_in_group(&app_data).await;
        let phase1 = app_data.phase_store.create_definition(draft(1, false)).await.unwrap();
        let coordinator = StudentCoordinator::new(app_data.clone());
        let ctx = ctx_for(&student, &[Role::Student]);

        let row = app_data.phase_store.submit(&group_id, &phase1.id).await.unwrap();
        app_data
            .phase_store
            .approve(&row.id, "mentor-1", Some("Well done".to_string()))
            .await
            .unwrap();
        app_data.phase_progress.invalidate_group(&group_id);

        assert!(matches!(
            coordinator.submit_phase(&ctx, &phase1.id).await,
            Err(InternalError::Phase(PhaseError::AlreadyApproved { phase_number: 1 }))
        ));

        let progress = coordinator.my_phases(&ctx).await.unwrap();
        assert_eq!(progress.phases[0].state, PhaseState::Completed);
        assert_eq!(progress.phases[0].status.as_deref(), Some("approved"));
        assert_eq!(progress.phases[0].mentor_remarks.as_deref(), Some("Well done"));
    }

    #[tokio::test]
    async fn test_diary_documents_and_meetings() {
        let app_data = setup_test_app_data().await;
        let (student, _) = student_in_group(&app_data).await;
        let coordinator = StudentCoordinator::new(app_data);
        let ctx = ctx_for(&student, &[Role::Student]);

        coordinator
            .add_diary_entry(
                &ctx,
                DiaryEntryRequest {
                    work_done: "Drafted synopsis".to_string(),
                    issues_faced: None,
                    next_plan: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(coordinator.diary(&ctx).await.unwrap().len(), 1);

        coordinator
            .add_document(
                &ctx,
                DocumentRequest {
                    document_type: "synopsis".to_string(),
                    title: "Synopsis".to_string(),
                    file_name: "synopsis.pdf".to_string(),
                    file_url: "https://files.example/synopsis.pdf".to_string(),
                    file_size: None,
                    phase_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(coordinator.documents(&ctx).await.unwrap().len(), 1);

        coordinator
            .request_meeting(
                &ctx,
                MeetingRequestBody {
                    title: "Synopsis review".to_string(),
                    description: None,
                    meeting_type: "review".to_string(),
                    scheduled_at: Utc::now().timestamp() + 86_400,
                    location: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(coordinator.meetings(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notifications_read_flow() {
        let app_data = setup_test_app_data().await;
        let (student, _) = student_in_group(&app_data).await;
        app_data
            .notification_store
            .notify_all(&[student.clone()], "Hello", "Welcome", "info")
            .await
            .unwrap();
        let coordinator = StudentCoordinator::new(app_data);
        let ctx = ctx_for(&student, &[Role::Student]);

        let notifications = coordinator.notifications(&ctx).await.unwrap();
        coordinator.mark_notification_read(&ctx, &notifications[0].id).await.unwrap();

        assert!(coordinator.notifications(&ctx).await.unwrap()[0].is_read);
    }
}
