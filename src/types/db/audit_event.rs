use sea_orm::entity::prelude::*;

/// SeaORM entity for audit_events table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub occurred_at: i64,
    pub event_type: String,
    pub actor_id: String,
    pub target_id: Option<String>,
    pub ip_address: Option<String>,
    pub request_id: Option<String>,
    /// JSON object of event fields
    pub data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
