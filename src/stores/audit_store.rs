use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Repository for audit event storage operations
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event to the database
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if serialization or database insert fails
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), InternalError> {
        let data_json = serde_json::to_string(&event.data)
            .map_err(|e| AuditError::LogWriteFailed(format!("Failed to serialize audit data: {}", e)))?;

        let audit_event = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            occurred_at: Set(Utc::now().timestamp()),
            event_type: Set(event.event_type.to_string()),
            actor_id: Set(event.actor_id),
            target_id: Set(event.target_id),
            ip_address: Set(event.ip_address),
            request_id: Set(event.request_id),
            data: Set(data_json),
        };

        audit_event
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Most recent events of one type, newest first
    pub async fn recent_events(
        &self,
        event_type: &str,
        limit: u64,
    ) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::EventType.eq(event_type))
            .order_by_desc(audit_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("recent_audit_events", e))
    }
}
