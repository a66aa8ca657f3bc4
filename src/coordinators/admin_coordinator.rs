use std::collections::HashMap;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::errors::internal::RoleError;
use crate::providers::PhaseProgressProvider;
use crate::stores::{
    AcademicStore, CacheEntity, CacheScope, GroupStore, NewAcademicYear, NewGroup, PhaseDraft, PhaseStore,
    QueryCache, RoleStore, UserStore,
};
use crate::types::db::{profile, project_group};
use crate::types::dto::admin::{
    AcademicYearView, AddMemberRequest, AdminGroupView, CreateAcademicYearRequest, CreateDepartmentRequest,
    CreateGroupRequest, DelayedGroupView, DepartmentView, PhaseDefinitionRequest, PhaseDefinitionView,
    RoleChangeResponse, StatsResponse, UserWithRolesView,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{Role, RoleGrants};

const UNASSIGNED_MENTOR: &str = "Unassigned";
const DELAYED_GROUP_LIMIT: u64 = 5;

/// Administrator workflows: role grants, groups, phase catalog and academic configuration
///
/// Every operation requires the admin role. Mutations invalidate the query
/// cache entries they affect after the write succeeds.
pub struct AdminCoordinator {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    group_store: Arc<GroupStore>,
    phase_store: Arc<PhaseStore>,
    academic_store: Arc<AcademicStore>,
    query_cache: Arc<QueryCache>,
    phase_progress: Arc<PhaseProgressProvider>,
    audit_logger: Arc<AuditLogger>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
            group_store: app_data.group_store.clone(),
            phase_store: app_data.phase_store.clone(),
            academic_store: app_data.academic_store.clone(),
            query_cache: app_data.query_cache.clone(),
            phase_progress: app_data.phase_progress.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    async fn all_grants(&self) -> Result<Arc<HashMap<String, RoleGrants>>, InternalError> {
        self.query_cache
            .get_or_load(CacheEntity::RoleGrants, CacheScope::All, || self.role_store.all_grants())
            .await
    }

    async fn all_groups(&self) -> Result<Arc<Vec<project_group::Model>>, InternalError> {
        self.query_cache
            .get_or_load(CacheEntity::Groups, CacheScope::All, || self.group_store.list_groups())
            .await
    }

    async fn profile_map(&self, user_ids: &[String]) -> Result<HashMap<String, profile::Model>, InternalError> {
        Ok(self
            .user_store
            .profiles_for(user_ids)
            .await?
            .into_iter()
            .map(|p| (p.user_id.clone(), p))
            .collect())
    }

    fn mentor_name(mentor_id: Option<&str>, profiles: &HashMap<String, profile::Model>) -> String {
        match mentor_id {
            None => UNASSIGNED_MENTOR.to_string(),
            Some(id) => profiles
                .get(id)
                .map(|p| p.full_name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    // ---- Users and roles ----

    /// Every profile with its stored grants
    ///
    /// Users without grants are shown with the student fallback.
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserWithRolesView>, InternalError> {
        ctx.require_role(Role::Admin)?;
        let (profiles, grants) = tokio::join!(self.user_store.list_profiles(), self.all_grants());
        let grants = grants?;

        Ok(profiles?
            .into_iter()
            .map(|p| {
                let (roles, fallback_role) = match grants.get(&p.user_id) {
                    Some(g) if !g.is_empty() => (g.to_vec(), false),
                    _ => (vec![Role::Student], true),
                };
                UserWithRolesView {
                    user_id: p.user_id,
                    email: p.email,
                    full_name: p.full_name,
                    usn: p.usn,
                    department: p.department,
                    roles,
                    fallback_role,
                }
            })
            .collect())
    }

    /// Grant a role; granting a role the user already holds changes nothing
    pub async fn add_role(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        role: Role,
    ) -> Result<RoleChangeResponse, InternalError> {
        self.change_role(ctx, target_user_id, role, true).await
    }

    pub async fn remove_role(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        role: Role,
    ) -> Result<RoleChangeResponse, InternalError> {
        self.change_role(ctx, target_user_id, role, false).await
    }

    async fn change_role(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        role: Role,
        grant: bool,
    ) -> Result<RoleChangeResponse, InternalError> {
        let admin = ctx.require_role(Role::Admin)?;
        self.user_store.get_user(target_user_id).await?;

        let changed = if grant {
            self.role_store.add_grant(target_user_id, role).await?
        } else {
            self.role_store.remove_grant(target_user_id, role).await?
        };

        if changed {
            self.query_cache.invalidate_entity(CacheEntity::RoleGrants);
            tracing::info!(
                admin_id = %admin.user_id,
                target_user_id = %target_user_id,
                role = %role,
                granted = grant,
                "Role grant changed"
            );
            if let Err(audit_err) = self.audit_logger.log_role_changed(ctx, target_user_id, role, grant).await {
                tracing::error!("Failed to log role change: {:?}", audit_err);
            }
        }

        let roles = self.role_store.grants_for(target_user_id).await?;
        Ok(RoleChangeResponse {
            user_id: target_user_id.to_string(),
            roles: roles.to_vec(),
            changed,
        })
    }

    // ---- Groups ----

    pub async fn list_groups(&self, ctx: &RequestContext) -> Result<Vec<AdminGroupView>, InternalError> {
        ctx.require_role(Role::Admin)?;
        let groups = self.all_groups().await?;

        let group_ids: Vec<String> = groups.iter().map(|g| g.id.clone()).collect();
        let mentor_ids: Vec<String> = groups.iter().filter_map(|g| g.mentor_id.clone()).collect();
        let (counts, profiles) = tokio::join!(
            self.group_store.member_counts(&group_ids),
            self.profile_map(&mentor_ids)
        );
        let (counts, profiles) = (counts?, profiles?);

        Ok(groups
            .iter()
            .map(|g| AdminGroupView {
                id: g.id.clone(),
                group_code: g.group_id.clone(),
                project_title: g.project_title.clone(),
                status: g.status.clone(),
                mentor_id: g.mentor_id.clone(),
                mentor_name: Self::mentor_name(g.mentor_id.as_deref(), &profiles),
                department_id: g.department_id.clone(),
                member_count: counts.get(&g.id).copied().unwrap_or(0),
            })
            .collect())
    }

    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        request: CreateGroupRequest,
    ) -> Result<AdminGroupView, InternalError> {
        ctx.require_role(Role::Admin)?;
        let group = self
            .group_store
            .create_group(NewGroup {
                group_code: request.group_id,
                project_title: request.project_title,
                project_description: request.project_description,
                department_id: request.department_id,
                academic_year_id: request.academic_year_id,
            })
            .await?;
        self.query_cache.invalidate_entity(CacheEntity::Groups);
        tracing::info!(group_id = %group.id, group_code = %group.group_id, "Group created");

        Ok(AdminGroupView {
            mentor_name: UNASSIGNED_MENTOR.to_string(),
            member_count: 0,
            id: group.id,
            group_code: group.group_id,
            project_title: group.project_title,
            status: group.status,
            mentor_id: group.mentor_id,
            department_id: group.department_id,
        })
    }

    /// Assign a mentor, or clear it with `None`
    pub async fn assign_mentor(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        mentor_id: Option<String>,
    ) -> Result<AdminGroupView, InternalError> {
        ctx.require_role(Role::Admin)?;
        if let Some(mentor_id) = mentor_id.as_deref() {
            if !self.role_store.has_grant(mentor_id, Role::Mentor).await? {
                return Err(RoleError::NotAMentor(mentor_id.to_string()).into());
            }
        }

        let group = self.group_store.set_mentor(group_id, mentor_id).await?;
        self.query_cache.invalidate_entity(CacheEntity::Groups);

        if let Some(mentor_id) = group.mentor_id.as_deref() {
            if let Err(audit_err) = self.audit_logger.log_mentor_assigned(ctx, &group.id, mentor_id).await {
                tracing::error!("Failed to log mentor assignment: {:?}", audit_err);
            }
        }

        let mentor_ids: Vec<String> = group.mentor_id.iter().cloned().collect();
        let profiles = self.profile_map(&mentor_ids).await?;
        let counts = self.group_store.member_counts(std::slice::from_ref(&group.id)).await?;

        Ok(AdminGroupView {
            mentor_name: Self::mentor_name(group.mentor_id.as_deref(), &profiles),
            member_count: counts.get(&group.id).copied().unwrap_or(0),
            id: group.id,
            group_code: group.group_id,
            project_title: group.project_title,
            status: group.status,
            mentor_id: group.mentor_id,
            department_id: group.department_id,
        })
    }

    /// Add a student to a group; a student belongs to at most one group
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        request: AddMemberRequest,
    ) -> Result<(), InternalError> {
        ctx.require_role(Role::Admin)?;
        self.user_store.get_user(&request.student_id).await?;

        // Users without grants fall back to student
        let grants = self.role_store.grants_for(&request.student_id).await?;
        if !grants.is_empty() && !grants.contains(Role::Student) {
            return Err(InternalError::invalid("student_id", "user does not hold the student role"));
        }

        self.group_store
            .add_member(group_id, &request.student_id, request.is_leader.unwrap_or(false))
            .await?;
        self.query_cache.invalidate_entity(CacheEntity::Groups);
        tracing::info!(group_id = %group_id, student_id = %request.student_id, "Group member added");
        Ok(())
    }

    // ---- Phase catalog ----

    pub async fn list_phases(&self, ctx: &RequestContext) -> Result<Vec<PhaseDefinitionView>, InternalError> {
        ctx.require_role(Role::Admin)?;
        let definitions = self.phase_progress.definitions().await?;
        Ok(definitions.iter().cloned().map(PhaseDefinitionView::from).collect())
    }

    pub async fn create_phase(
        &self,
        ctx: &RequestContext,
        request: PhaseDefinitionRequest,
    ) -> Result<PhaseDefinitionView, InternalError> {
        ctx.require_role(Role::Admin)?;
        let created = self.phase_store.create_definition(draft_from(request)).await?;
        self.phase_progress.invalidate_definitions();
        Ok(created.into())
    }

    pub async fn update_phase(
        &self,
        ctx: &RequestContext,
        phase_id: &str,
        request: PhaseDefinitionRequest,
    ) -> Result<PhaseDefinitionView, InternalError> {
        ctx.require_role(Role::Admin)?;
        let updated = self.phase_store.update_definition(phase_id, draft_from(request)).await?;
        self.phase_progress.invalidate_definitions();
        tracing::info!(phase_id = %updated.id, locked = updated.is_locked, "Phase definition updated");
        Ok(updated.into())
    }

    // ---- Academic configuration ----

    pub async fn list_academic_years(&self, ctx: &RequestContext) -> Result<Vec<AcademicYearView>, InternalError> {
        ctx.require_role(Role::Admin)?;
        Ok(self
            .academic_store
            .list_years()
            .await?
            .into_iter()
            .map(AcademicYearView::from)
            .collect())
    }

    pub async fn create_academic_year(
        &self,
        ctx: &RequestContext,
        request: CreateAcademicYearRequest,
    ) -> Result<AcademicYearView, InternalError> {
        ctx.require_role(Role::Admin)?;
        let year = self
            .academic_store
            .create_year(NewAcademicYear {
                year_name: request.year_name,
                start_date: request.start_date,
                end_date: request.end_date,
                is_active: request.is_active,
            })
            .await?;
        Ok(year.into())
    }

    pub async fn set_academic_year_active(
        &self,
        ctx: &RequestContext,
        year_id: &str,
        is_active: bool,
    ) -> Result<AcademicYearView, InternalError> {
        ctx.require_role(Role::Admin)?;
        Ok(self.academic_store.set_year_active(year_id, is_active).await?.into())
    }

    pub async fn list_departments(&self, ctx: &RequestContext) -> Result<Vec<DepartmentView>, InternalError> {
        ctx.require_role(Role::Admin)?;
        Ok(self
            .academic_store
            .list_departments()
            .await?
            .into_iter()
            .map(DepartmentView::from)
            .collect())
    }

    pub async fn create_department(
        &self,
        ctx: &RequestContext,
        request: CreateDepartmentRequest,
    ) -> Result<DepartmentView, InternalError> {
        ctx.require_role(Role::Admin)?;
        Ok(self
            .academic_store
            .create_department(&request.name, &request.code)
            .await?
            .into())
    }

    // ---- Dashboard ----

    pub async fn stats(&self, ctx: &RequestContext) -> Result<StatsResponse, InternalError> {
        ctx.require_role(Role::Admin)?;
        let (total_groups, total_students, total_mentors, total_departments, delayed) = tokio::join!(
            self.group_store.count_groups(),
            self.role_store.count_with_role(Role::Student),
            self.role_store.count_with_role(Role::Mentor),
            self.academic_store.count_departments(),
            self.group_store.delayed_groups(DELAYED_GROUP_LIMIT)
        );
        let delayed = delayed?;

        let mentor_ids: Vec<String> = delayed.iter().filter_map(|g| g.mentor_id.clone()).collect();
        let profiles = self.profile_map(&mentor_ids).await?;

        Ok(StatsResponse {
            total_groups: total_groups?,
            total_students: total_students?,
            total_mentors: total_mentors?,
            total_departments: total_departments?,
            delayed_groups: delayed
                .into_iter()
                .map(|g| DelayedGroupView {
                    mentor_name: Self::mentor_name(g.mentor_id.as_deref(), &profiles),
                    id: g.id,
                    group_code: g.group_id,
                    project_title: g.project_title,
                })
                .collect(),
        })
    }
}

fn draft_from(request: PhaseDefinitionRequest) -> PhaseDraft {
    PhaseDraft {
        phase_number: request.phase_number,
        phase_name: request.phase_name,
        description: request.description,
        completion_percentage: request.completion_percentage,
        start_date: request.start_date,
        end_date: request.end_date,
        is_locked: request.is_locked,
    }
}
