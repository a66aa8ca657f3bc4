use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::coordinators::MentorCoordinator;
use crate::errors::AppError;
use crate::providers::TokenProvider;
use crate::types::dto::common::PhaseProgressResponse;
use crate::types::dto::mentor::{
    AnnouncementRequest, AnnouncementResponse, ApprovePhaseRequest, MentorGroupView, ReviewDiaryRequest,
    ReviewItemView,
};
use crate::types::dto::student::DiaryEntryView;

/// Mentor dashboard endpoints
pub struct MentorApi {
    mentor_coordinator: Arc<MentorCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl MentorApi {
    pub fn new(mentor_coordinator: Arc<MentorCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            mentor_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum MentorTags {
    /// Mentor dashboard
    Mentor,
}

#[OpenApi(prefix_path = "/mentor")]
impl MentorApi {
    /// Groups assigned to the caller
    #[oai(path = "/groups", method = "get", tag = "MentorTags::Mentor")]
    async fn groups(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<MentorGroupView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.mentor_coordinator.my_groups(&ctx).await?))
    }

    #[oai(path = "/groups/:group_id/phases", method = "get", tag = "MentorTags::Mentor")]
    async fn group_phases(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<String>,
    ) -> Result<Json<PhaseProgressResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.mentor_coordinator.group_phases(&ctx, &group_id.0).await?))
    }

    /// Submitted phases and unreviewed diary entries, newest first
    #[oai(path = "/reviews", method = "get", tag = "MentorTags::Mentor")]
    async fn review_queue(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<ReviewItemView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.mentor_coordinator.review_queue(&ctx).await?))
    }

    #[oai(path = "/phase-submissions/:status_id/approve", method = "post", tag = "MentorTags::Mentor")]
    async fn approve_phase(
        &self,
        req: &Request,
        auth: BearerAuth,
        status_id: Path<String>,
        body: Json<ApprovePhaseRequest>,
    ) -> Result<Json<PhaseProgressResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        let response = self
            .mentor_coordinator
            .approve_phase(&ctx, &status_id.0, body.0.remarks)
            .await?;
        Ok(Json(response))
    }

    #[oai(path = "/diary/:entry_id/review", method = "post", tag = "MentorTags::Mentor")]
    async fn review_diary_entry(
        &self,
        req: &Request,
        auth: BearerAuth,
        entry_id: Path<String>,
        body: Json<ReviewDiaryRequest>,
    ) -> Result<Json<DiaryEntryView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        let response = self
            .mentor_coordinator
            .review_diary_entry(&ctx, &entry_id.0, body.0.comments)
            .await?;
        Ok(Json(response))
    }

    /// Notify every student in the selected groups
    #[oai(path = "/announcements", method = "post", tag = "MentorTags::Mentor")]
    async fn announce(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<AnnouncementRequest>,
    ) -> Result<Json<AnnouncementResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.mentor_coordinator.announce(&ctx, body.0).await?))
    }
}
