// Coordinators layer - Workflow orchestration
//
// Coordinators compose stores and providers for specific API endpoints,
// enforce role scoping, write audit events and invalidate cached queries.

pub mod admin_coordinator;
pub mod login_coordinator;
pub mod mentor_coordinator;
pub mod student_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use mentor_coordinator::MentorCoordinator;
pub use student_coordinator::StudentCoordinator;
