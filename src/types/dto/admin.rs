use poem_openapi::Object;

use crate::types::db::{academic_year, department};
use crate::types::internal::phase::PhaseDefinition;
use crate::types::internal::role::Role;

#[derive(Object, Debug)]
pub struct UserWithRolesView {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub usn: Option<String>,
    pub department: Option<String>,

    /// Effective roles; a user without grants is shown as a student
    pub roles: Vec<Role>,

    /// True when the roles above come from the student fallback
    pub fallback_role: bool,
}

#[derive(Object, Debug)]
pub struct RoleChangeRequest {
    pub role: Role,
}

#[derive(Object, Debug)]
pub struct RoleChangeResponse {
    pub user_id: String,

    /// Stored grants after the change
    pub roles: Vec<Role>,

    /// False when the grant already matched the request
    pub changed: bool,
}

#[derive(Object, Debug)]
pub struct AdminGroupView {
    pub id: String,
    pub group_code: String,
    pub project_title: String,
    pub status: Option<String>,
    pub mentor_id: Option<String>,
    pub mentor_name: String,
    pub department_id: Option<String>,
    pub member_count: u64,
}

#[derive(Object, Debug)]
pub struct CreateGroupRequest {
    /// Display id, unique
    pub group_id: String,
    pub project_title: String,
    pub project_description: Option<String>,
    pub department_id: Option<String>,
    pub academic_year_id: Option<String>,
}

#[derive(Object, Debug)]
pub struct AssignMentorRequest {
    /// Null clears the mentor
    pub mentor_id: Option<String>,
}

#[derive(Object, Debug)]
pub struct AddMemberRequest {
    pub student_id: String,
    pub is_leader: Option<bool>,
}

#[derive(Object, Debug)]
pub struct PhaseDefinitionView {
    pub id: String,
    pub phase_number: i32,
    pub phase_name: String,
    pub description: Option<String>,
    pub completion_percentage: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_locked: bool,
}

impl From<PhaseDefinition> for PhaseDefinitionView {
    fn from(d: PhaseDefinition) -> Self {
        Self {
            id: d.id,
            phase_number: d.phase_number,
            phase_name: d.name,
            description: d.description,
            completion_percentage: d.completion_percentage,
            start_date: d.start_date,
            end_date: d.end_date,
            is_locked: d.is_locked,
        }
    }
}

#[derive(Object, Debug)]
pub struct PhaseDefinitionRequest {
    pub phase_number: i32,
    pub phase_name: String,
    pub description: Option<String>,

    /// 0 to 100
    pub completion_percentage: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[oai(default)]
    pub is_locked: bool,
}

#[derive(Object, Debug)]
pub struct AcademicYearView {
    pub id: String,
    pub year_name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
}

impl From<academic_year::Model> for AcademicYearView {
    fn from(m: academic_year::Model) -> Self {
        Self {
            id: m.id,
            year_name: m.year_name,
            start_date: m.start_date,
            end_date: m.end_date,
            is_active: m.is_active,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateAcademicYearRequest {
    pub year_name: String,
    pub start_date: String,
    pub end_date: String,
    #[oai(default)]
    pub is_active: bool,
}

#[derive(Object, Debug)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Object, Debug)]
pub struct DepartmentView {
    pub id: String,
    pub name: String,
    pub code: String,
}

impl From<department::Model> for DepartmentView {
    fn from(m: department::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub code: String,
}

#[derive(Object, Debug)]
pub struct DelayedGroupView {
    pub id: String,
    pub group_code: String,
    pub project_title: String,
    pub mentor_name: String,
}

#[derive(Object, Debug)]
pub struct StatsResponse {
    pub total_groups: u64,
    pub total_students: u64,
    pub total_mentors: u64,
    pub total_departments: u64,
    pub delayed_groups: Vec<DelayedGroupView>,
}
