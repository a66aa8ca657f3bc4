use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, payload::Json};

use crate::api::helpers;
use crate::coordinators::LoginCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, WhoAmIResponse};

/// Authentication API endpoints
pub struct AuthApi {
    login_coordinator: Arc<LoginCoordinator>,
}

impl AuthApi {
    pub fn new(login_coordinator: Arc<LoginCoordinator>) -> Self {
        Self { login_coordinator }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Signup, login and session inspection
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account holding the chosen role
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<Json<RegisterResponse>, AuthError> {
        let ctx = helpers::anonymous_context(req);
        let response = self.login_coordinator.register(&ctx, body.0).await?;
        Ok(Json(response))
    }

    /// Log in for a requested dashboard role
    ///
    /// The response names the role the session was actually resolved to;
    /// `mismatch` is set when it differs from the requested one.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = helpers::anonymous_context(req);
        let response = self
            .login_coordinator
            .login(&ctx, &body.email, &body.password, body.requested_role)
            .await?;
        Ok(Json(response))
    }

    /// Decode the bearer token
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = helpers::authenticated_context(req, &auth.0, &self.login_coordinator.token_provider())?;
        Ok(Json(self.login_coordinator.whoami(&ctx)?))
    }
}
