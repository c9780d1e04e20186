use crate::{
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract user from JWT session cookie if present and valid
/// Returns:
/// - None: No JWT cookie present
/// - Some(Ok(user)): Valid JWT found and verified
/// - Some(Err(error)): JWT cookie present but invalid/malformed
#[instrument(skip(parts, config))]
fn try_jwt_session_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }))
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name == cookie_name {
                match session::verify_session_token(value, config) {
                    Ok(user) => return Some(Ok(user)),
                    Err(_) => {
                        // Invalid/expired token, continue checking other cookies or return None
                        // We don't propagate JWT verification errors as they're expected for expired tokens
                        continue;
                    }
                }
            }
        }
    }
    None
}

/// Extract user from a Bearer JWT in the Authorization header if present
/// Returns:
/// - None: No Authorization header or not a Bearer token
/// - Some(Ok(user)): Valid token found and verified
/// - Some(Err(error)): Bearer token present but invalid
#[instrument(skip(parts, config))]
fn try_bearer_token_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let auth_header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid authorization header: {e}"),
            }))
        }
    };

    // Check for Bearer token format
    let token = auth_str.strip_prefix("Bearer ")?;

    Some(session::verify_session_token(token, config))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Each method returns Option<Result<CurrentUser>>:
        // - None means the auth method is not applicable (no credentials present)
        // - Some(Ok(user)) means successful authentication
        // - Some(Err(error)) means auth credentials were present but invalid
        //
        // Try both and return the first successful one, so a client with a valid
        // session cookie plus a stale Bearer token can still authenticate.

        match try_bearer_token_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found Bearer token authenticated user: {}", user.id);
                return Ok(user);
            }
            Some(Err(e)) => {
                trace!("Bearer token authentication failed: {:?}", e);
            }
            None => {
                trace!("No Bearer token authentication attempted");
            }
        }

        match try_jwt_session_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found JWT session authenticated user: {}", user.id);
                return Ok(user);
            }
            Some(Err(e)) => {
                trace!("JWT session authentication failed: {:?}", e);
            }
            None => {
                trace!("No JWT session authentication attempted");
            }
        }

        Err(Error::Unauthenticated { message: None })
    }
}

/// Reject the request unless the user is an administrator.
pub fn require_admin(user: &CurrentUser) -> Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(Error::Forbidden {
            action: "administer complaints".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::models::users::{CurrentUser, Role},
        auth::session::create_session_token,
        config::Config,
    };
    use axum::http::request::Parts;
    use std::time::Duration;
    use uuid::Uuid;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.secret_key = Some("test-secret-key-for-jwt".to_string());
        config.auth.session.jwt_expiry = Duration::from_secs(3600);
        config
    }

    fn create_test_user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            role,
            is_superuser: false,
            is_staff: false,
        }
    }

    fn create_test_parts_with_header(header_name: &str, header_value: &str) -> Parts {
        let request = axum::http::Request::builder()
            .uri("http://localhost/test")
            .header(header_name, header_value)
            .body(())
            .unwrap();

        let (parts, _body) = request.into_parts();
        parts
    }

    #[test]
    fn test_cookie_session_extraction() {
        let config = create_test_config();
        let user = create_test_user(Role::Client);
        let token = create_session_token(&user, &config).unwrap();

        let parts = create_test_parts_with_header(
            "cookie",
            &format!("other=1; {}={}", config.auth.session.cookie_name, token),
        );

        let result = try_jwt_session_auth(&parts, &config).unwrap().unwrap();
        assert_eq!(result.id, user.id);
        assert_eq!(result.email, user.email);
    }

    #[test]
    fn test_expired_cookie_is_skipped() {
        let config = create_test_config();

        let parts = create_test_parts_with_header(
            "cookie",
            &format!("{}=not-a-real-token", config.auth.session.cookie_name),
        );

        // Invalid cookie tokens are swallowed, so other auth methods can still run
        assert!(try_jwt_session_auth(&parts, &config).is_none());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let config = create_test_config();
        let user = create_test_user(Role::Admin);
        let token = create_session_token(&user, &config).unwrap();

        let parts = create_test_parts_with_header("authorization", &format!("Bearer {token}"));

        let result = try_bearer_token_auth(&parts, &config).unwrap().unwrap();
        assert_eq!(result.id, user.id);
        assert_eq!(result.role, Role::Admin);
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let config = create_test_config();
        let parts = create_test_parts_with_header("authorization", "Basic dXNlcjpwYXNz");

        assert!(try_bearer_token_auth(&parts, &config).is_none());
    }

    #[test]
    fn test_require_admin() {
        let admin = create_test_user(Role::Admin);
        assert!(require_admin(&admin).is_ok());

        let mut superuser = create_test_user(Role::Client);
        superuser.is_superuser = true;
        assert!(require_admin(&superuser).is_ok());

        let client = create_test_user(Role::Client);
        let error = require_admin(&client).unwrap_err();
        assert_eq!(error.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
