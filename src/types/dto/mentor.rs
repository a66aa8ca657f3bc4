use poem_openapi::{Enum, Object};

use crate::types::dto::common::PhaseView;

/// Group card on the mentor dashboard
#[derive(Object, Debug)]
pub struct MentorGroupView {
    pub id: String,
    pub group_code: String,
    pub project_title: String,
    pub status: Option<String>,
    pub member_count: u64,
    pub current_phase: Option<PhaseView>,
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "snake_case")]
pub enum ReviewItemKind {
    PhaseSubmission,
    DiaryEntry,
}

/// Something awaiting the mentor's review
#[derive(Object, Debug)]
pub struct ReviewItemView {
    pub kind: ReviewItemKind,

    /// Status row id or diary entry id
    pub id: String,
    pub group_id: String,
    pub group_code: String,
    pub title: String,

    /// Unix timestamp used for ordering, newest first
    pub submitted_at: Option<i64>,
}

#[derive(Object, Debug)]
pub struct ApprovePhaseRequest {
    pub remarks: Option<String>,
}

#[derive(Object, Debug)]
pub struct ReviewDiaryRequest {
    pub comments: Option<String>,
}

#[derive(Object, Debug)]
pub struct AnnouncementRequest {
    pub group_ids: Vec<String>,
    pub title: String,
    pub message: String,
}

#[derive(Object, Debug)]
pub struct AnnouncementResponse {
    /// Notifications written
    pub recipients: u64,
}
