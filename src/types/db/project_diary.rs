use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "project_diary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    /// Calendar date, YYYY-MM-DD
    pub entry_date: String,
    pub work_done: String,
    pub issues_faced: Option<String>,
    pub next_plan: Option<String>,
    pub submitted_by: Option<String>,
    pub is_reviewed: bool,
    pub mentor_comments: Option<String>,
    pub reviewed_at: Option<i64>,
    pub reviewed_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
