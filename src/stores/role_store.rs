use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::user_role;
use crate::types::internal::role::{Role, RoleGrants};

/// Role grants, one row per (user, role)
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn parse_rows(rows: Vec<user_role::Model>) -> Vec<(String, Role)> {
        rows.into_iter()
            .filter_map(|row| match row.role.parse::<Role>() {
                Ok(role) => Some((row.user_id, role)),
                Err(_) => {
                    tracing::warn!(user_id = %row.user_id, role = %row.role, "Ignoring unknown role grant");
                    None
                }
            })
            .collect()
    }

    /// Grants of one user in creation order (same-second ties in insertion order)
    pub async fn grants_for(&self, user_id: &str) -> Result<RoleGrants, InternalError> {
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::CreatedAt)
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("grants_for", e))?;

        Ok(RoleGrants::from_ordered(Self::parse_rows(rows).into_iter().map(|(_, role)| role)))
    }

    /// Grants of every user that has at least one
    pub async fn all_grants(&self) -> Result<HashMap<String, RoleGrants>, InternalError> {
        let rows = user_role::Entity::find()
            .order_by_asc(user_role::Column::CreatedAt)
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("all_grants", e))?;

        let mut by_user: HashMap<String, Vec<Role>> = HashMap::new();
        for (user_id, role) in Self::parse_rows(rows) {
            by_user.entry(user_id).or_default().push(role);
        }

        Ok(by_user
            .into_iter()
            .map(|(user_id, roles)| (user_id, RoleGrants::from_ordered(roles)))
            .collect())
    }

    /// Add a grant; returns false when the user already held the role
    pub async fn add_grant(&self, user_id: &str, role: Role) -> Result<bool, InternalError> {
        if self.has_grant(user_id, role).await? {
            return Ok(false);
        }

        user_role::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("add_grant", e))?;

        Ok(true)
    }

    /// Remove a grant; returns false when the user did not hold the role
    pub async fn remove_grant(&self, user_id: &str, role: Role) -> Result<bool, InternalError> {
        let result = user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::Role.eq(role.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("remove_grant", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn has_grant(&self, user_id: &str, role: Role) -> Result<bool, InternalError> {
        let count = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("has_grant", e))?;
        Ok(count > 0)
    }

    pub async fn count_with_role(&self, role: Role) -> Result<u64, InternalError> {
        user_role::Entity::find()
            .filter(user_role::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_with_role", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_grants_in_creation_order() {
        let db = setup_test_db().await;
        let user_id = create_test_user(&db, "m@uni.edu").await;
        let store = RoleStore::new(db);

        assert!(store.add_grant(&user_id, Role::Mentor).await.unwrap());
        assert!(store.add_grant(&user_id, Role::Admin).await.unwrap());

        let grants = store.grants_for(&user_id).await.unwrap();
        assert_eq!(grants.as_slice(), &[Role::Mentor, Role::Admin]);
    }

    #[tokio::test]
    async fn test_add_grant_is_idempotent() {
        let db = setup_test_db().await;
        let user_id = create_test_user(&db, "s@uni.edu").await;
        let store = RoleStore::new(db);

        assert!(store.add_grant(&user_id, Role::Student).await.unwrap());
        assert!(!store.add_grant(&user_id, Role::Student).await.unwrap());
        assert_eq!(store.count_with_role(Role::Student).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_grant() {
        let db = setup_test_db().await;
        let user_id = create_test_user(&db, "s@uni.edu").await;
        let store = RoleStore::new(db);
        store.add_grant(&user_id, Role::Student).await.unwrap();

        assert!(store.remove_grant(&user_id, Role::Student).await.unwrap());
        assert!(!store.remove_grant(&user_id, Role::Student).await.unwrap());
        assert!(store.grants_for(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_grants_grouped_by_user() {
        let db = setup_test_db().await;
        let a = create_test_user(&db, "a@uni.edu").await;
        let b = create_test_user(&db, "b@uni.edu").await;
        let store = RoleStore::new(db);
        store.add_grant(&a, Role::Student).await.unwrap();
        store.add_grant(&b, Role::Mentor).await.unwrap();
        store.add_grant(&b, Role::Admin).await.unwrap();

        let grants = store.all_grants().await.unwrap();
        assert_eq!(grants.get(&a).map(|g| g.len()), Some(1));
        assert_eq!(grants.get(&b).map(|g| g.len()), Some(2));
    }
}
