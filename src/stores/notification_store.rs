use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::notification;

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Notifications of one user, newest first
    pub async fn for_user(&self, user_id: &str) -> Result<Vec<notification::Model>, InternalError> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("notifications_for_user", e))
    }

    /// Mark one of the user's notifications read
    ///
    /// A notification owned by someone else is reported as not found.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<(), InternalError> {
        let found = notification::Entity::find_by_id(notification_id.to_string())
            .filter(notification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_notification", e))?
            .ok_or_else(|| InternalError::not_found("notification", notification_id))?;

        let mut active: notification::ActiveModel = found.into();
        active.is_read = Set(true);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("mark_notification_read", e))?;
        Ok(())
    }

    /// Send the same notification to each recipient; returns the number written
    pub async fn notify_all(
        &self,
        recipients: &[String],
        title: &str,
        message: &str,
        notification_type: &str,
    ) -> Result<usize, InternalError> {
        if recipients.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().timestamp();
        let rows = recipients.iter().map(|user_id| notification::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.clone()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            notification_type: Set(Some(notification_type.to_string())),
            link: Set(None),
            is_read: Set(false),
            created_at: Set(now),
        });

        notification::Entity::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_notifications", e))?;

        Ok(recipients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::RecordError;
    use crate::test::utils::{create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_notify_and_mark_read() {
        let db = setup_test_db().await;
        let a = create_test_user(&db, "a@uni.edu").await;
        let b = create_test_user(&db, "b@uni.edu").await;
        let store = NotificationStore::new(db);

        let sent = store
            .notify_all(&[a.clone(), b.clone()], "Review", "Review on Friday", "info")
            .await
            .unwrap();
        assert_eq!(sent, 2);

        let mine = store.for_user(&a).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(!mine[0].is_read);

        store.mark_read(&a, &mine[0].id).await.unwrap();
        assert!(store.for_user(&a).await.unwrap()[0].is_read);
    }

    #[tokio::test]
    async fn test_cannot_mark_someone_elses_notification() {
        let db = setup_test_db().await;
        let a = create_test_user(&db, "a@uni.edu").await;
        let b = create_test_user(&db, "b@uni.edu").await;
        let store = NotificationStore::new(db);
        store.notify_all(&[a.clone()], "T", "M", "info").await.unwrap();
        let id = store.for_user(&a).await.unwrap()[0].id.clone();

        assert!(matches!(
            store.mark_read(&b, &id).await,
            Err(InternalError::Record(RecordError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_no_recipients_is_noop() {
        let store = NotificationStore::new(setup_test_db().await);
        assert_eq!(store.notify_all(&[], "T", "M", "info").await.unwrap(), 0);
    }
}
