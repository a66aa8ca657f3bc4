#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use poem::Request;
    use poem_openapi::auth::Bearer;

    use crate::api::helpers::{anonymous_context, authenticated_context};
    use crate::errors::InternalError;
    use crate::errors::internal::CredentialError;
    use crate::test::utils::setup_test_app_data;
    use crate::types::internal::role::{Role, RoleGrants};

    #[test]
    fn test_anonymous_context_reads_forwarded_ip() {
        let req = Request::builder()
            .header("X-Forwarded-For", "192.168.1.1, 10.0.0.1")
            .finish();

        let ctx = anonymous_context(&req);

        assert_eq!(ctx.ip_address, Some("192.168.1.1".parse::<IpAddr>().unwrap()));
        assert!(!ctx.authenticated);
    }

    #[test]
    fn test_anonymous_context_reads_real_ip() {
        let req = Request::builder().header("X-Real-IP", "192.168.1.2").finish();

        let ctx = anonymous_context(&req);

        assert_eq!(ctx.ip_address, Some("192.168.1.2".parse::<IpAddr>().unwrap()));
    }

    #[test]
    fn test_anonymous_context_without_headers() {
        let req = Request::builder().finish();
        assert_eq!(anonymous_context(&req).ip_address, None);
    }

    #[tokio::test]
    async fn test_authenticated_context_with_valid_jwt() {
        let app_data = setup_test_app_data().await;
        let grants = RoleGrants::from_ordered([Role::Mentor]);
        let (token, _) = app_data
            .token_provider
            .generate_jwt("user-1", "m@uni.edu", Role::Mentor, &grants)
            .unwrap();

        let req = Request::builder().finish();
        let ctx = authenticated_context(&req, &Bearer { token }, &app_data.token_provider).unwrap();

        assert!(ctx.authenticated);
        assert_eq!(ctx.actor_id, "user-1");
        assert!(ctx.require_role(Role::Mentor).is_ok());
        assert!(ctx.require_role(Role::Admin).is_err());
    }

    #[tokio::test]
    async fn test_authenticated_context_rejects_invalid_jwt() {
        let app_data = setup_test_app_data().await;
        let req = Request::builder().finish();

        let result = authenticated_context(
            &req,
            &Bearer {
                token: "invalid-jwt-token".to_string(),
            },
            &app_data.token_provider,
        );

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }
}
