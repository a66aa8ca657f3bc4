use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::RecordError;
use crate::types::db::{academic_year, department};

#[derive(Debug, Clone)]
pub struct NewAcademicYear {
    pub year_name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
}

/// Academic years and departments
pub struct AcademicStore {
    db: DatabaseConnection,
}

impl AcademicStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Academic years, newest name first
    pub async fn list_years(&self) -> Result<Vec<academic_year::Model>, InternalError> {
        academic_year::Entity::find()
            .order_by_desc(academic_year::Column::YearName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_academic_years", e))
    }

    pub async fn get_year(&self, id: &str) -> Result<academic_year::Model, InternalError> {
        academic_year::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_academic_year", e))?
            .ok_or_else(|| InternalError::not_found("academic_year", id))
    }

    /// Create a year; an active year deactivates every other one
    pub async fn create_year(&self, new_year: NewAcademicYear) -> Result<academic_year::Model, InternalError> {
        let year_name = new_year.year_name.trim().to_string();
        if year_name.is_empty() {
            return Err(InternalError::invalid("year_name", "must not be empty"));
        }
        let clash = academic_year::Entity::find()
            .filter(academic_year::Column::YearName.eq(year_name.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("find_academic_year", e))?;
        if clash > 0 {
            return Err(RecordError::Conflict {
                entity: "academic_year",
                message: format!("Academic year {} already exists", year_name),
            }
            .into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("begin_create_year", e))?;

        if new_year.is_active {
            academic_year::Entity::update_many()
                .col_expr(academic_year::Column::IsActive, Expr::value(false))
                .exec(&txn)
                .await
                .map_err(|e| InternalError::database("deactivate_years", e))?;
        }

        let created = academic_year::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            year_name: Set(year_name),
            start_date: Set(new_year.start_date),
            end_date: Set(new_year.end_date),
            is_active: Set(new_year.is_active),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_academic_year", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("commit_create_year", e))?;
        Ok(created)
    }

    /// Set a year's active flag; activating deactivates every other year
    pub async fn set_year_active(&self, id: &str, active: bool) -> Result<academic_year::Model, InternalError> {
        let existing = self.get_year(id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("begin_set_year_active", e))?;

        if active {
            academic_year::Entity::update_many()
                .col_expr(academic_year::Column::IsActive, Expr::value(false))
                .filter(academic_year::Column::Id.ne(id))
                .exec(&txn)
                .await
                .map_err(|e| InternalError::database("deactivate_years", e))?;
        }

        let mut model: academic_year::ActiveModel = existing.into();
        model.is_active = Set(active);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_academic_year", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("commit_set_year_active", e))?;
        Ok(updated)
    }

    /// Departments ordered by name
    pub async fn list_departments(&self) -> Result<Vec<department::Model>, InternalError> {
        department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_departments", e))
    }

    pub async fn get_department(&self, id: &str) -> Result<Option<department::Model>, InternalError> {
        department::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_department", e))
    }

    pub async fn create_department(&self, name: &str, code: &str) -> Result<department::Model, InternalError> {
        let name = name.trim();
        let code = code.trim().to_uppercase();
        if name.is_empty() {
            return Err(InternalError::invalid("name", "must not be empty"));
        }
        if code.is_empty() {
            return Err(InternalError::invalid("code", "must not be empty"));
        }

        let clash = department::Entity::find()
            .filter(department::Column::Code.eq(code.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("find_department", e))?;
        if clash > 0 {
            return Err(RecordError::Conflict {
                entity: "department",
                message: format!("Department code {} already exists", code),
            }
            .into());
        }

        department::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            code: Set(code),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_department", e))
    }

    pub async fn count_departments(&self) -> Result<u64, InternalError> {
        department::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_departments", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    fn year(name: &str, active: bool) -> NewAcademicYear {
        NewAcademicYear {
            year_name: name.to_string(),
            start_date: "2024-07-01".to_string(),
            end_date: "2025-06-30".to_string(),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_years_newest_first() {
        let store = AcademicStore::new(setup_test_db().await);
        store.create_year(year("2023-24", false)).await.unwrap();
        store.create_year(year("2024-25", false)).await.unwrap();

        let names: Vec<_> = store.list_years().await.unwrap().into_iter().map(|y| y.year_name).collect();
        assert_eq!(names, vec!["2024-25", "2023-24"]);
    }

    #[tokio::test]
    async fn test_only_one_active_year() {
        let store = AcademicStore::new(setup_test_db().await);
        let first = store.create_year(year("2023-24", true)).await.unwrap();
        let second = store.create_year(year("2024-25", true)).await.unwrap();

        assert!(!store.get_year(&first.id).await.unwrap().is_active);
        assert!(store.get_year(&second.id).await.unwrap().is_active);

        store.set_year_active(&first.id, true).await.unwrap();
        assert!(store.get_year(&first.id).await.unwrap().is_active);
        assert!(!store.get_year(&second.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_duplicate_year_conflicts() {
        let store = AcademicStore::new(setup_test_db().await);
        store.create_year(year("2024-25", false)).await.unwrap();
        assert!(matches!(
            store.create_year(year("2024-25", false)).await,
            Err(InternalError::Record(RecordError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn test_departments_sorted_and_unique() {
        let store = AcademicStore::new(setup_test_db().await);
        store.create_department("Mechanical", "me").await.unwrap();
        store.create_department("Computer Science", "cse").await.unwrap();

        let names: Vec<_> = store.list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Computer Science", "Mechanical"]);
        assert!(store.create_department("CS again", "CSE").await.is_err());
        assert_eq!(store.count_departments().await.unwrap(), 2);
    }
}
