use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::coordinators::StudentCoordinator;
use crate::errors::AppError;
use crate::providers::TokenProvider;
use crate::types::dto::common::{MessageResponse, PhaseProgressResponse};
use crate::types::dto::student::{
    DiaryEntryRequest, DiaryEntryView, DocumentRequest, DocumentView, MeetingRequestBody, MeetingView,
    NotificationView, StudentGroupResponse,
};

/// Student dashboard endpoints
pub struct StudentApi {
    student_coordinator: Arc<StudentCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl StudentApi {
    pub fn new(student_coordinator: Arc<StudentCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            student_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum StudentTags {
    /// Student dashboard
    Student,
    /// Notifications for any signed-in user
    Notifications,
}

#[OpenApi]
impl StudentApi {
    /// The caller's project group, or null when not yet assigned
    #[oai(path = "/student/group", method = "get", tag = "StudentTags::Student")]
    async fn my_group(&self, req: &Request, auth: BearerAuth) -> Result<Json<StudentGroupResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.my_group(&ctx).await?))
    }

    /// Phase progress of the caller's group
    #[oai(path = "/student/phases", method = "get", tag = "StudentTags::Student")]
    async fn my_phases(&self, req: &Request, auth: BearerAuth) -> Result<Json<PhaseProgressResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.my_phases(&ctx).await?))
    }

    /// Submit a phase for mentor review
    #[oai(path = "/student/phases/:phase_id/submit", method = "post", tag = "StudentTags::Student")]
    async fn submit_phase(
        &self,
        req: &Request,
        auth: BearerAuth,
        phase_id: Path<String>,
    ) -> Result<Json<PhaseProgressResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.submit_phase(&ctx, &phase_id.0).await?))
    }

    #[oai(path = "/student/diary", method = "get", tag = "StudentTags::Student")]
    async fn diary(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<DiaryEntryView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.diary(&ctx).await?))
    }

    #[oai(path = "/student/diary", method = "post", tag = "StudentTags::Student")]
    async fn add_diary_entry(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<DiaryEntryRequest>,
    ) -> Result<Json<DiaryEntryView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.add_diary_entry(&ctx, body.0).await?))
    }

    #[oai(path = "/student/documents", method = "get", tag = "StudentTags::Student")]
    async fn documents(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<DocumentView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.documents(&ctx).await?))
    }

    /// Record an uploaded document; the file itself is stored elsewhere
    #[oai(path = "/student/documents", method = "post", tag = "StudentTags::Student")]
    async fn add_document(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<DocumentRequest>,
    ) -> Result<Json<DocumentView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.add_document(&ctx, body.0).await?))
    }

    #[oai(path = "/student/meetings", method = "get", tag = "StudentTags::Student")]
    async fn meetings(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<MeetingView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.meetings(&ctx).await?))
    }

    #[oai(path = "/student/meetings", method = "post", tag = "StudentTags::Student")]
    async fn request_meeting(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<MeetingRequestBody>,
    ) -> Result<Json<MeetingView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.request_meeting(&ctx, body.0).await?))
    }

    #[oai(path = "/notifications", method = "get", tag = "StudentTags::Notifications")]
    async fn notifications(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<NotificationView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.student_coordinator.notifications(&ctx).await?))
    }

    #[oai(path = "/notifications/:id/read", method = "post", tag = "StudentTags::Notifications")]
    async fn mark_notification_read(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        self.student_coordinator.mark_notification_read(&ctx, &id.0).await?;
        Ok(Json(MessageResponse::new("Notification marked as read")))
    }
}
