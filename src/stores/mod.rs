// Stores layer - Data access and repository pattern
pub mod academic_store;
pub mod audit_store;
pub mod diary_store;
pub mod document_store;
pub mod group_store;
pub mod meeting_store;
pub mod notification_store;
pub mod phase_store;
pub mod query_cache;
pub mod role_store;
pub mod user_store;

pub use academic_store::{AcademicStore, NewAcademicYear};
pub use audit_store::AuditStore;
pub use diary_store::{DiaryStore, NewDiaryEntry};
pub use document_store::{DocumentStore, NewDocument};
pub use group_store::{GroupStore, NewGroup};
pub use meeting_store::{MeetingRequest, MeetingStore};
pub use notification_store::NotificationStore;
pub use phase_store::{PhaseDraft, PhaseStore};
pub use query_cache::{CacheEntity, CacheScope, QueryCache};
pub use role_store::RoleStore;
pub use user_store::{NewProfile, UserStore};
