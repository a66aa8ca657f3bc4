use std::net::IpAddr;

use poem::Request;

use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, RoleError};
use crate::types::internal::auth::{Claims, Principal};
use crate::types::internal::role::Role;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries what logging and auditing need: who is acting, from where, and
/// under which request id.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT validated successfully)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Unauthenticated API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_string(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Base API context carrying the client IP
    pub fn from_request(req: &Request) -> Self {
        let ctx = Self::new();
        match Self::extract_ip_address(req) {
            Some(ip) => ctx.with_ip_address(ip),
            None => ctx,
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                if let Ok(ip) = ip.trim().parse() {
                    return Some(ip);
                }
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            if let Ok(ip) = real_ip.trim().parse() {
                return Some(ip);
            }
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims; the subject becomes the actor
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    pub fn principal(&self) -> Option<Principal> {
        self.claims.as_ref().filter(|_| self.authenticated).map(Principal::from_claims)
    }

    /// The signed-in principal, or an authentication error
    pub fn require_principal(&self) -> Result<Principal, InternalError> {
        self.principal()
            .ok_or_else(|| CredentialError::Unauthenticated.into())
    }

    /// The signed-in principal, provided it holds `role`
    pub fn require_role(&self, role: Role) -> Result<Principal, InternalError> {
        let principal = self.require_principal()?;
        if principal.has_role(role) {
            Ok(principal)
        } else {
            tracing::debug!(user_id = %principal.user_id, required = %role, "Role check failed");
            Err(RoleError::RoleRequired { required: role }.into())
        }
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip_address.map(|ip| ip.to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
