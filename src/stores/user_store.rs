use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::{profile, user};

/// Profile fields captured at registration
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub full_name: String,
    pub usn: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

/// Accounts and their profiles
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an account and its profile in one transaction
    ///
    /// Emails are stored lowercase. `password_hash` must already be hashed.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: String,
        new_profile: NewProfile,
    ) -> Result<user::Model, InternalError> {
        let email = email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail(email).into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("begin_create_user", e))?;

        let now = Utc::now().timestamp();
        let user_id = Uuid::new_v4().to_string();

        let created = user::ActiveModel {
            id: Set(user_id.clone()),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                InternalError::from(CredentialError::DuplicateEmail(email.clone()))
            } else {
                InternalError::database("insert_user", e)
            }
        })?;

        profile::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            full_name: Set(new_profile.full_name),
            email: Set(email),
            usn: Set(new_profile.usn),
            phone: Set(new_profile.phone),
            department: Set(new_profile.department),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_profile", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("commit_create_user", e))?;

        Ok(created)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<user::Model, InternalError> {
        user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user", e))?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()).into())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<profile::Model>, InternalError> {
        profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_profile", e))
    }

    /// Profiles for the given users, in no particular order
    pub async fn profiles_for(&self, user_ids: &[String]) -> Result<Vec<profile::Model>, InternalError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        profile::Entity::find()
            .filter(profile::Column::UserId.is_in(user_ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("profiles_for", e))
    }

    /// All profiles, newest first
    pub async fn list_profiles(&self) -> Result<Vec<profile::Model>, InternalError> {
        profile::Entity::find()
            .order_by_desc(profile::Column::CreatedAt)
            .order_by_asc(profile::Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_profiles", e))
    }

    pub async fn count_users(&self) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}
