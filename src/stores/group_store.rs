use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::RecordError;
use crate::types::db::{group_member, project_group};

/// Fields accepted when an administrator creates a group
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub group_code: String,
    pub project_title: String,
    pub project_description: Option<String>,
    pub department_id: Option<String>,
    pub academic_year_id: Option<String>,
}

/// Project groups and their membership
pub struct GroupStore {
    db: DatabaseConnection,
}

impl GroupStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_group(&self, new_group: NewGroup) -> Result<project_group::Model, InternalError> {
        let code = new_group.group_code.trim().to_string();
        if code.is_empty() {
            return Err(InternalError::invalid("group_id", "must not be empty"));
        }
        if new_group.project_title.trim().is_empty() {
            return Err(InternalError::invalid("project_title", "must not be empty"));
        }

        let existing = project_group::Entity::find()
            .filter(project_group::Column::GroupId.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_group_by_code", e))?;
        if existing.is_some() {
            return Err(RecordError::Conflict {
                entity: "group",
                message: format!("Group {} already exists", code),
            }
            .into());
        }

        let now = Utc::now().timestamp();
        project_group::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            group_id: Set(code),
            project_title: Set(new_group.project_title.trim().to_string()),
            project_description: Set(new_group.project_description),
            status: Set(Some("active".to_string())),
            mentor_id: Set(None),
            department_id: Set(new_group.department_id),
            academic_year_id: Set(new_group.academic_year_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_group", e))
    }

    /// All groups ordered by group code
    pub async fn list_groups(&self) -> Result<Vec<project_group::Model>, InternalError> {
        project_group::Entity::find()
            .order_by_asc(project_group::Column::GroupId)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_groups", e))
    }

    pub async fn get_group(&self, id: &str) -> Result<project_group::Model, InternalError> {
        project_group::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_group", e))?
            .ok_or_else(|| InternalError::not_found("group", id))
    }

    /// Groups supervised by one mentor, ordered by group code
    pub async fn groups_for_mentor(&self, mentor_id: &str) -> Result<Vec<project_group::Model>, InternalError> {
        project_group::Entity::find()
            .filter(project_group::Column::MentorId.eq(mentor_id))
            .order_by_asc(project_group::Column::GroupId)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("groups_for_mentor", e))
    }

    /// Assign or clear the mentor of a group
    pub async fn set_mentor(
        &self,
        id: &str,
        mentor_id: Option<String>,
    ) -> Result<project_group::Model, InternalError> {
        let mut active: project_group::ActiveModel = self.get_group(id).await?.into();
        active.mentor_id = Set(mentor_id);
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_mentor", e))
    }

    /// Groups whose status is `delayed`, oldest update first
    pub async fn delayed_groups(&self, limit: u64) -> Result<Vec<project_group::Model>, InternalError> {
        project_group::Entity::find()
            .filter(project_group::Column::Status.eq("delayed"))
            .order_by_asc(project_group::Column::UpdatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("delayed_groups", e))
    }

    pub async fn count_groups(&self) -> Result<u64, InternalError> {
        project_group::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_groups", e))
    }

    /// Add a student to a group; the first member becomes leader unless one is named
    pub async fn add_member(
        &self,
        group_id: &str,
        student_id: &str,
        is_leader: bool,
    ) -> Result<group_member::Model, InternalError> {
        self.get_group(group_id).await?;

        if let Some(existing) = self.membership_for_student(student_id).await? {
            return Err(RecordError::Conflict {
                entity: "group_member",
                message: if existing.group_id == group_id {
                    "Student is already a member of this group".to_string()
                } else {
                    "Student already belongs to another group".to_string()
                },
            }
            .into());
        }

        group_member::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            group_id: Set(group_id.to_string()),
            student_id: Set(student_id.to_string()),
            is_leader: Set(is_leader),
            joined_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_group_member", e))
    }

    /// Membership row of a student, if the student is in a group
    pub async fn membership_for_student(
        &self,
        student_id: &str,
    ) -> Result<Option<group_member::Model>, InternalError> {
        group_member::Entity::find()
            .filter(group_member::Column::StudentId.eq(student_id))
            .order_by_asc(group_member::Column::JoinedAt)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("membership_for_student", e))
    }

    /// Members of one group, leader first
    pub async fn members_of(&self, group_id: &str) -> Result<Vec<group_member::Model>, InternalError> {
        group_member::Entity::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .order_by_desc(group_member::Column::IsLeader)
            .order_by_asc(group_member::Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("members_of", e))
    }

    /// Member count per group id; groups without members are absent
    pub async fn member_counts(&self, group_ids: &[String]) -> Result<HashMap<String, u64>, InternalError> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = group_member::Entity::find()
            .filter(group_member::Column::GroupId.is_in(group_ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("member_counts", e))?;

        let mut counts = HashMap::new();
        for row in rows {
            *counts.entry(row.group_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_db};

    fn new_group(code: &str) -> NewGroup {
        NewGroup {
            group_code: code.to_string(),
            project_title: format!("Project {}", code),
            project_description: None,
            department_id: None,
            academic_year_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_groups_sorted_by_code() {
        let store = GroupStore::new(setup_test_db().await);
        store.create_group(new_group("CSE-02")).await.unwrap();
        store.create_group(new_group("CSE-01")).await.unwrap();

        let groups = store.list_groups().await.unwrap();
        let codes: Vec<_> = groups.iter().map(|g| g.group_id.as_str()).collect();
        assert_eq!(codes, vec!["CSE-01", "CSE-02"]);
        assert_eq!(groups[0].status.as_deref(), Some("active"));
    }

    #[tokio::test]
    async fn test_duplicate_group_code_conflicts() {
        let store = GroupStore::new(setup_test_db().await);
        store.create_group(new_group("CSE-01")).await.unwrap();

        let result = store.create_group(new_group("CSE-01")).await;
        assert!(matches!(result, Err(InternalError::Record(RecordError::Conflict { .. }))));
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let store = GroupStore::new(setup_test_db().await);
        let mut group = new_group("CSE-01");
        group.project_title = "  ".to_string();

        assert!(matches!(
            store.create_group(group).await,
            Err(InternalError::Record(RecordError::Invalid { field: "project_title", .. }))
        ));
    }

    #[tokio::test]
    async fn test_assign_and_clear_mentor() {
        let db = setup_test_db().await;
        let mentor = create_test_user(&db, "mentor@uni.edu").await;
        let store = GroupStore::new(db);
        let group = store.create_group(new_group("CSE-01")).await.unwrap();

        let updated = store.set_mentor(&group.id, Some(mentor.clone())).await.unwrap();
        assert_eq!(updated.mentor_id.as_deref(), Some(mentor.as_str()));
        assert_eq!(store.groups_for_mentor(&mentor).await.unwrap().len(), 1);

        let cleared = store.set_mentor(&group.id, None).await.unwrap();
        assert!(cleared.mentor_id.is_none());
        assert!(store.groups_for_mentor(&mentor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_membership_and_counts() {
        let db = setup_test_db().await;
        let a = create_test_user(&db, "a@uni.edu").await;
        let b = create_test_user(&db, "b@uni.edu").await;
        let store = GroupStore::new(db);
        let group = store.create_group(new_group("CSE-01")).await.unwrap();

        store.add_member(&group.id, &a, false).await.unwrap();
        store.add_member(&group.id, &b, true).await.unwrap();

        let members = store.members_of(&group.id).await.unwrap();
        assert_eq!(members[0].student_id, b);
        assert_eq!(store.membership_for_student(&a).await.unwrap().unwrap().group_id, group.id);

        let counts = store.member_counts(&[group.id.clone()]).await.unwrap();
        assert_eq!(counts.get(&group.id), Some(&2));
    }

    #[tokio::test]
    async fn test_student_cannot_join_two_groups() {
        let db = setup_test_db().await;
        let a = create_test_user(&db, "a@uni.edu").await;
        let store = GroupStore::new(db);
        let first = store.create_group(new_group("CSE-01")).await.unwrap();
        let second = store.create_group(new_group("CSE-02")).await.unwrap();
        store.add_member(&first.id, &a, true).await.unwrap();

        let result = store.add_member(&second.id, &a, false).await;
        assert!(matches!(result, Err(InternalError::Record(RecordError::Conflict { .. }))));
    }

    #[tokio::test]
    async fn test_missing_group_not_found() {
        let store = GroupStore::new(setup_test_db().await);
        assert!(matches!(
            store.get_group("missing").await,
            Err(InternalError::Record(RecordError::NotFound { entity: "group", .. }))
        ));
    }
}
