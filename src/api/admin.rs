use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::coordinators::AdminCoordinator;
use crate::errors::AppError;
use crate::providers::TokenProvider;
use crate::types::dto::admin::{
    AcademicYearView, AddMemberRequest, AdminGroupView, AssignMentorRequest, CreateAcademicYearRequest,
    CreateDepartmentRequest, CreateGroupRequest, DepartmentView, PhaseDefinitionRequest, PhaseDefinitionView,
    RoleChangeRequest, RoleChangeResponse, SetActiveRequest, StatsResponse, UserWithRolesView,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::role::Role;

/// Administrator endpoints
pub struct AdminApi {
    admin_coordinator: Arc<AdminCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl AdminApi {
    pub fn new(admin_coordinator: Arc<AdminCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            admin_coordinator,
            token_provider,
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Users and role grants
    AdminUsers,
    /// Project groups
    AdminGroups,
    /// Phase catalog
    AdminPhases,
    /// Academic years and departments
    AdminAcademic,
    /// Dashboard statistics
    AdminStats,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    #[oai(path = "/users", method = "get", tag = "AdminTags::AdminUsers")]
    async fn list_users(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserWithRolesView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.list_users(&ctx).await?))
    }

    /// Grant a role (idempotent)
    #[oai(path = "/users/:user_id/roles", method = "post", tag = "AdminTags::AdminUsers")]
    async fn add_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        user_id: Path<String>,
        body: Json<RoleChangeRequest>,
    ) -> Result<Json<RoleChangeResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.add_role(&ctx, &user_id.0, body.0.role).await?))
    }

    #[oai(path = "/users/:user_id/roles/:role", method = "delete", tag = "AdminTags::AdminUsers")]
    async fn remove_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        user_id: Path<String>,
        role: Path<Role>,
    ) -> Result<Json<RoleChangeResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.remove_role(&ctx, &user_id.0, role.0).await?))
    }

    #[oai(path = "/groups", method = "get", tag = "AdminTags::AdminGroups")]
    async fn list_groups(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<AdminGroupView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.list_groups(&ctx).await?))
    }

    #[oai(path = "/groups", method = "post", tag = "AdminTags::AdminGroups")]
    async fn create_group(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateGroupRequest>,
    ) -> Result<Json<AdminGroupView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.create_group(&ctx, body.0).await?))
    }

    /// Assign a mentor, or unassign with a null mentor_id
    #[oai(path = "/groups/:group_id/mentor", method = "put", tag = "AdminTags::AdminGroups")]
    async fn assign_mentor(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<String>,
        body: Json<AssignMentorRequest>,
    ) -> Result<Json<AdminGroupView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        let response = self
            .admin_coordinator
            .assign_mentor(&ctx, &group_id.0, body.0.mentor_id)
            .await?;
        Ok(Json(response))
    }

    #[oai(path = "/groups/:group_id/members", method = "post", tag = "AdminTags::AdminGroups")]
    async fn add_member(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<String>,
        body: Json<AddMemberRequest>,
    ) -> Result<Json<MessageResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        self.admin_coordinator.add_member(&ctx, &group_id.0, body.0).await?;
        Ok(Json(MessageResponse::new("Member added")))
    }

    #[oai(path = "/phases", method = "get", tag = "AdminTags::AdminPhases")]
    async fn list_phases(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<PhaseDefinitionView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.list_phases(&ctx).await?))
    }

    #[oai(path = "/phases", method = "post", tag = "AdminTags::AdminPhases")]
    async fn create_phase(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<PhaseDefinitionRequest>,
    ) -> Result<Json<PhaseDefinitionView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.create_phase(&ctx, body.0).await?))
    }

    /// Edit a phase definition, including its lock flag
    #[oai(path = "/phases/:phase_id", method = "put", tag = "AdminTags::AdminPhases")]
    async fn update_phase(
        &self,
        req: &Request,
        auth: BearerAuth,
        phase_id: Path<String>,
        body: Json<PhaseDefinitionRequest>,
    ) -> Result<Json<PhaseDefinitionView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.update_phase(&ctx, &phase_id.0, body.0).await?))
    }

    #[oai(path = "/academic-years", method = "get", tag = "AdminTags::AdminAcademic")]
    async fn list_academic_years(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<AcademicYearView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.list_academic_years(&ctx).await?))
    }

    #[oai(path = "/academic-years", method = "post", tag = "AdminTags::AdminAcademic")]
    async fn create_academic_year(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateAcademicYearRequest>,
    ) -> Result<Json<AcademicYearView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.create_academic_year(&ctx, body.0).await?))
    }

    /// Activating a year deactivates every other year
    #[oai(path = "/academic-years/:year_id/active", method = "put", tag = "AdminTags::AdminAcademic")]
    async fn set_academic_year_active(
        &self,
        req: &Request,
        auth: BearerAuth,
        year_id: Path<String>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<AcademicYearView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        let response = self
            .admin_coordinator
            .set_academic_year_active(&ctx, &year_id.0, body.0.is_active)
            .await?;
        Ok(Json(response))
    }

    #[oai(path = "/departments", method = "get", tag = "AdminTags::AdminAcademic")]
    async fn list_departments(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<DepartmentView>>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.list_departments(&ctx).await?))
    }

    #[oai(path = "/departments", method = "post", tag = "AdminTags::AdminAcademic")]
    async fn create_department(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateDepartmentRequest>,
    ) -> Result<Json<DepartmentView>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.create_department(&ctx, body.0).await?))
    }

    #[oai(path = "/stats", method = "get", tag = "AdminTags::AdminStats")]
    async fn stats(&self, req: &Request, auth: BearerAuth) -> Result<Json<StatsResponse>, AppError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.token_provider)?;
        Ok(Json(self.admin_coordinator.stats(&ctx).await?))
    }
}

#[cfg(test)]
mod tests {
    use poem_openapi::auth::Bearer;

    use super::*;
    use crate::test::utils::{create_test_user, setup_test_app_data};
    use crate::types::internal::role::RoleGrants;

    #[tokio::test]
    async fn test_non_admin_token_is_forbidden() {
        let app_data = setup_test_app_data().await;
        let user = create_test_user(&app_data.connections.main, "s@uni.edu").await;
        let (token, _) = app_data
            .token_provider
            .generate_jwt(&user, "s@uni.edu", Role::Student, &RoleGrants::from_ordered([Role::Student]))
            .unwrap();
        let api = AdminApi::new(
            Arc::new(AdminCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
        );

        let result = api.stats(&Request::builder().finish(), BearerAuth(Bearer { token })).await;

        match result {
            Err(err) => assert_eq!(err.status_code(), 403),
            Ok(_) => panic!("expected forbidden"),
        }
    }

    #[tokio::test]
    async fn test_admin_token_reads_stats() {
        let app_data = setup_test_app_data().await;
        let admin = create_test_user(&app_data.connections.main, "a@uni.edu").await;
        let (token, _) = app_data
            .token_provider
            .generate_jwt(&admin, "a@uni.edu", Role::Admin, &RoleGrants::from_ordered([Role::Admin]))
            .unwrap();
        let api = AdminApi::new(
            Arc::new(AdminCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
        );

        let stats = api
            .stats(&Request::builder().finish(), BearerAuth(Bearer { token }))
            .await
            .unwrap();
        assert_eq!(stats.total_groups, 0);
    }
}
