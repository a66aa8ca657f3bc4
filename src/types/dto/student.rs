use poem_openapi::Object;

use crate::types::db::{document, meeting, notification, project_diary};

#[derive(Object, Debug, Clone)]
pub struct GroupMemberView {
    pub user_id: String,
    pub full_name: String,
    pub usn: Option<String>,
    pub is_leader: bool,
}

/// The student's own group
#[derive(Object, Debug)]
pub struct StudentGroupView {
    pub id: String,
    pub group_code: String,
    pub project_title: String,
    pub project_description: Option<String>,
    pub status: Option<String>,
    pub department_name: Option<String>,
    pub mentor_name: String,
    pub academic_year: Option<String>,
    pub members: Vec<GroupMemberView>,
}

#[derive(Object, Debug)]
pub struct StudentGroupResponse {
    /// Absent when the student has not been placed in a group
    pub group: Option<StudentGroupView>,
}

#[derive(Object, Debug)]
pub struct DiaryEntryView {
    pub id: String,
    pub entry_date: String,
    pub work_done: String,
    pub issues_faced: Option<String>,
    pub next_plan: Option<String>,
    pub is_reviewed: bool,
    pub mentor_comments: Option<String>,
    pub created_at: i64,
}

impl From<project_diary::Model> for DiaryEntryView {
    fn from(m: project_diary::Model) -> Self {
        Self {
            id: m.id,
            entry_date: m.entry_date,
            work_done: m.work_done,
            issues_faced: m.issues_faced,
            next_plan: m.next_plan,
            is_reviewed: m.is_reviewed,
            mentor_comments: m.mentor_comments,
            created_at: m.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct DiaryEntryRequest {
    pub work_done: String,
    pub issues_faced: Option<String>,
    pub next_plan: Option<String>,
}

#[derive(Object, Debug)]
pub struct DocumentView {
    pub id: String,
    pub document_type: String,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub version: Option<i32>,
    pub phase_id: Option<String>,
    pub created_at: i64,
}

impl From<document::Model> for DocumentView {
    fn from(m: document::Model) -> Self {
        Self {
            id: m.id,
            document_type: m.document_type,
            title: m.title,
            file_name: m.file_name,
            file_url: m.file_url,
            file_size: m.file_size,
            version: m.version,
            phase_id: m.phase_id,
            created_at: m.created_at,
        }
    }
}

/// Metadata of a file already stored elsewhere
#[derive(Object, Debug)]
pub struct DocumentRequest {
    /// One of synopsis, srs, design, ppt, report, certificate, other
    pub document_type: String,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub phase_id: Option<String>,
}

#[derive(Object, Debug)]
pub struct MeetingView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub meeting_type: Option<String>,

    /// Unix timestamp
    pub scheduled_at: i64,
    pub location: Option<String>,
}

impl From<meeting::Model> for MeetingView {
    fn from(m: meeting::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            meeting_type: m.meeting_type,
            scheduled_at: m.scheduled_at,
            location: m.location,
        }
    }
}

#[derive(Object, Debug)]
pub struct MeetingRequestBody {
    pub title: String,
    pub description: Option<String>,

    /// One of mentor, review, external, general
    pub meeting_type: String,

    /// Unix timestamp
    pub scheduled_at: i64,
    pub location: Option<String>,
}

#[derive(Object, Debug)]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub message: String,
    pub notification_type: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}

impl From<notification::Model> for NotificationView {
    fn from(m: notification::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            message: m.message,
            notification_type: m.notification_type,
            link: m.link,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}
