use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::meeting;

pub const MEETING_TYPES: [&str; 4] = ["mentor", "review", "external", "general"];

#[derive(Debug, Clone)]
pub struct MeetingRequest {
    pub title: String,
    pub description: Option<String>,
    pub meeting_type: String,
    pub scheduled_at: i64,
    pub location: Option<String>,
}

pub struct MeetingStore {
    db: DatabaseConnection,
}

impl MeetingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Meetings of a group scheduled at or after `now`, soonest first
    pub async fn upcoming_for_group(&self, group_id: &str, now: i64) -> Result<Vec<meeting::Model>, InternalError> {
        meeting::Entity::find()
            .filter(meeting::Column::GroupId.eq(group_id))
            .filter(meeting::Column::ScheduledAt.gte(now))
            .order_by_asc(meeting::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("upcoming_meetings", e))
    }

    pub async fn request_meeting(
        &self,
        group_id: &str,
        requested_by: &str,
        request: MeetingRequest,
    ) -> Result<meeting::Model, InternalError> {
        let meeting_type = request.meeting_type.trim().to_lowercase();
        if !MEETING_TYPES.contains(&meeting_type.as_str()) {
            return Err(InternalError::invalid(
                "meeting_type",
                format!("must be one of {}", MEETING_TYPES.join(", ")),
            ));
        }
        if request.title.trim().is_empty() {
            return Err(InternalError::invalid("title", "must not be empty"));
        }

        meeting::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            group_id: Set(Some(group_id.to_string())),
            title: Set(request.title.trim().to_string()),
            description: Set(request.description),
            meeting_type: Set(Some(meeting_type)),
            scheduled_at: Set(request.scheduled_at),
            location: Set(request.location),
            created_by: Set(Some(requested_by.to_string())),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_meeting", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_group, setup_test_db};

    fn request(title: &str, at: i64) -> MeetingRequest {
        MeetingRequest {
            title: title.to_string(),
            description: None,
            meeting_type: "mentor".to_string(),
            scheduled_at: at,
            location: Some("Lab 3".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upcoming_excludes_past_and_sorts() {
        let db = setup_test_db().await;
        let group_id = create_test_group(&db, "CSE-01").await;
        let store = MeetingStore::new(db);
        let now = 1_000_000;

        store.request_meeting(&group_id, "s1", request("later", now + 200)).await.unwrap();
        store.request_meeting(&group_id, "s1", request("past", now - 10)).await.unwrap();
        store.request_meeting(&group_id, "s1", request("soon", now + 100)).await.unwrap();

        let upcoming = store.upcoming_for_group(&group_id, now).await.unwrap();
        let titles: Vec<_> = upcoming.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "later"]);
    }

    #[tokio::test]
    async fn test_unknown_meeting_type_rejected() {
        let db = setup_test_db().await;
        let group_id = create_test_group(&db, "CSE-01").await;
        let store = MeetingStore::new(db);
        let mut bad = request("sync", 10);
        bad.meeting_type = "party".to_string();

        assert!(store.request_meeting(&group_id, "s1", bad).await.is_err());
    }
}
