use poem::Request;
use poem_openapi::auth::Bearer;

use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// Build a RequestContext for a bearer-authenticated endpoint
///
/// The token is validated here; role checks happen in the coordinators.
pub fn authenticated_context(
    req: &Request,
    bearer: &Bearer,
    token_provider: &TokenProvider,
) -> Result<RequestContext, InternalError> {
    let claims = token_provider.validate_jwt(&bearer.token)?;
    Ok(RequestContext::from_request(req).with_auth(claims))
}

/// Build a RequestContext for an endpoint without authentication
pub fn anonymous_context(req: &Request) -> RequestContext {
    RequestContext::from_request(req)
}
