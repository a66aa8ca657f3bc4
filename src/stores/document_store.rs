use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::document;

pub const DOCUMENT_TYPES: [&str; 7] = ["synopsis", "srs", "design", "ppt", "report", "certificate", "other"];

/// Metadata of an uploaded document; the file itself lives elsewhere
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub document_type: String,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub phase_id: Option<String>,
}

pub struct DocumentStore {
    db: DatabaseConnection,
}

impl DocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn documents_for_group(&self, group_id: &str) -> Result<Vec<document::Model>, InternalError> {
        document::Entity::find()
            .filter(document::Column::GroupId.eq(group_id))
            .order_by_desc(document::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("documents_for_group", e))
    }

    pub async fn add_document(
        &self,
        group_id: &str,
        uploaded_by: &str,
        doc: NewDocument,
    ) -> Result<document::Model, InternalError> {
        let document_type = doc.document_type.trim().to_lowercase();
        if !DOCUMENT_TYPES.contains(&document_type.as_str()) {
            return Err(InternalError::invalid(
                "document_type",
                format!("must be one of {}", DOCUMENT_TYPES.join(", ")),
            ));
        }
        if doc.title.trim().is_empty() {
            return Err(InternalError::invalid("title", "must not be empty"));
        }
        if doc.file_url.trim().is_empty() {
            return Err(InternalError::invalid("file_url", "must not be empty"));
        }

        // Re-uploads of the same type bump the version
        let version = document::Entity::find()
            .filter(document::Column::GroupId.eq(group_id))
            .filter(document::Column::DocumentType.eq(document_type.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("count_document_versions", e))?
            .len() as i32
            + 1;

        document::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            group_id: Set(group_id.to_string()),
            phase_id: Set(doc.phase_id),
            document_type: Set(document_type),
            title: Set(doc.title.trim().to_string()),
            file_name: Set(doc.file_name),
            file_url: Set(doc.file_url),
            file_size: Set(doc.file_size),
            version: Set(Some(version)),
            uploaded_by: Set(Some(uploaded_by.to_string())),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_document", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_group, setup_test_db};

    fn doc(kind: &str) -> NewDocument {
        NewDocument {
            document_type: kind.to_string(),
            title: "Synopsis draft".to_string(),
            file_name: "synopsis.pdf".to_string(),
            file_url: "https://files.example/synopsis.pdf".to_string(),
            file_size: Some(2048),
            phase_id: None,
        }
    }

    #[tokio::test]
    async fn test_versions_increment_per_type() {
        let db = setup_test_db().await;
        let group_id = create_test_group(&db, "CSE-01").await;
        let store = DocumentStore::new(db);

        let first = store.add_document(&group_id, "s1", doc("Synopsis")).await.unwrap();
        let second = store.add_document(&group_id, "s1", doc("synopsis")).await.unwrap();
        let other = store.add_document(&group_id, "s1", doc("srs")).await.unwrap();

        assert_eq!(first.document_type, "synopsis");
        assert_eq!(first.version, Some(1));
        assert_eq!(second.version, Some(2));
        assert_eq!(other.version, Some(1));
        assert_eq!(store.documents_for_group(&group_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_type_rejected() {
        let db = setup_test_db().await;
        let group_id = create_test_group(&db, "CSE-01").await;
        let store = DocumentStore::new(db);

        assert!(store.add_document(&group_id, "s1", doc("video")).await.is_err());
    }
}
