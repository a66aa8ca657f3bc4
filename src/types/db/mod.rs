// Database entities - SeaORM models
pub mod academic_year;
pub mod audit_event;
pub mod department;
pub mod document;
pub mod group_member;
pub mod group_phase_status;
pub mod meeting;
pub mod notification;
pub mod profile;
pub mod project_diary;
pub mod project_group;
pub mod project_phase;
pub mod user;
pub mod user_role;
