use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "project_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-facing group code, e.g. CSE-2024-07
    #[sea_orm(unique)]
    pub group_id: String,
    pub project_title: String,
    pub project_description: Option<String>,
    pub status: Option<String>,
    pub mentor_id: Option<String>,
    pub department_id: Option<String>,
    pub academic_year_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
