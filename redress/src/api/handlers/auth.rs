//! Authentication and profile endpoints.

use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::{
    AppState,
    api::models::{
        auth::{AuthSuccessResponse, LoginResponse, LogoutResponse, RegisterResponse},
        users::{AuthResponse, CurrentUser, LoginRequest, RegisterRequest, Role, UserProfile, UserProfileUpdate},
    },
    auth::{password, session},
    avatars::resolve_avatar_url,
    db::{
        handlers::{Repository, Users},
        models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    },
    errors::Error,
};

/// Build the profile representation for a database user, resolving the
/// avatar's derived URL against the media store.
fn profile_for(state: &AppState, user: UserDBResponse) -> UserProfile {
    let avatar_url = resolve_avatar_url(user.avatar.as_deref(), &state.avatars, state.config.public_url.as_ref());
    UserProfile::from_user(user, avatar_url)
}

fn validate_password_length(state: &AppState, password: &str) -> Result<(), Error> {
    let password_config = &state.config.auth.password;
    if password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }
    Ok(())
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<RegisterResponse, Error> {
    // Check if registration is allowed
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    validate_password_length(&state, &request.password)?;

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let argon2_params = password::Argon2Params {
        memory_kib: state.config.auth.password.argon2_memory_kib,
        iterations: state.config.auth.password.argon2_iterations,
        parallelism: state.config.auth.password.argon2_parallelism,
    };
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(argon2_params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let role = request.role.unwrap_or_default();
    let create_request = UserCreateDBRequest {
        username: request.username,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        role,
        is_superuser: false,
        is_staff: role == Role::Admin,
        password_hash: Some(password_hash),
    };

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);
    // Unique violations on username/email surface as 409 with the offending field
    let created_user = user_repo.create(&create_request).await?;

    // Create session token
    let current_user = CurrentUser::from(&created_user);
    let token = session::create_session_token(&current_user, &state.config)?;

    // Set session cookie
    let cookie = create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        user: profile_for(&state, created_user),
        token,
        message: "Registration successful".to_string(),
    };

    Ok(RegisterResponse { auth_response, cookie })
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Find user by email
    let mut user = user_repo
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        })?;

    let password_hash = user.password_hash.as_ref().ok_or_else(|| Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    // The response body carries this login's timestamp, not the previous one
    user.last_login = Some(user_repo.touch_last_login(user.id).await?);

    // Create session token
    let current_user = CurrentUser::from(&user);
    let token = session::create_session_token(&current_user, &state.config)?;

    // Set session cookie
    let cookie = create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        user: profile_for(&state, user),
        token,
        message: "Login successful".to_string(),
    };

    Ok(LoginResponse { auth_response, cookie })
}

/// Logout (clear session)
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse, Error> {
    // Create expired cookie to clear session
    let cookie = clear_session_cookie(&state.config);

    let auth_response = AuthSuccessResponse {
        message: "Logout successful".to_string(),
    };

    Ok(LogoutResponse { auth_response, cookie })
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn me(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<UserProfile>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    let user = user_repo.get_by_id(current_user.id).await?.ok_or_else(|| Error::NotFound {
        resource: "user".to_string(),
        id: current_user.id.to_string(),
    })?;

    Ok(Json(profile_for(&state, user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/api/v1/auth/me",
    request_body = UserProfileUpdate,
    tag = "authentication",
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Username or email already taken"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(update): Json<UserProfileUpdate>,
) -> Result<Json<UserProfile>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    let update_request = UserUpdateDBRequest::from_profile_update(update);
    let user = user_repo.update(current_user.id, &update_request).await?;

    Ok(Json(profile_for(&state, user)))
}

/// Upload a new avatar image for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/auth/me/avatar",
    tag = "authentication",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated profile with new avatar", body = UserProfile),
        (status = 400, description = "No file in request"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>, Error> {
    let mut stored = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Invalid multipart request: {e}"),
    })? {
        if field.name() != Some("avatar") {
            continue;
        }

        let filename = field.file_name().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read avatar upload: {e}"),
        })?;

        if bytes.is_empty() {
            return Err(Error::BadRequest {
                message: "Avatar file is empty".to_string(),
            });
        }

        stored = Some(state.avatars.save(filename.as_deref(), &bytes).await?);
        break;
    }

    let stored = stored.ok_or_else(|| Error::BadRequest {
        message: "Missing 'avatar' file field".to_string(),
    })?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    let update_request = UserUpdateDBRequest {
        avatar: Some(stored),
        ..Default::default()
    };
    let user = user_repo.update(current_user.id, &update_request).await?;

    Ok(Json(profile_for(&state, user)))
}

/// Helper function to create a session cookie
fn create_session_cookie(token: &str, config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;
    let max_age = session_config.jwt_expiry.as_secs();

    // Secure is a bare attribute: browsers key off its presence, so it must
    // be omitted entirely for plain-HTTP deployments rather than set to false.
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
        session_config.cookie_name, token, session_config.cookie_same_site, max_age
    );
    if session_config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Helper function to create the cookie clearing the session
fn clear_session_cookie(config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;

    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite={}; Max-Age=0",
        session_config.cookie_name, session_config.cookie_same_site
    );
    if session_config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> crate::config::Config {
        let mut config = crate::config::Config::default();
        config.secret_key = Some("test-secret".to_string());
        config
    }

    #[tokio::test]
    async fn test_profile_carries_stamped_last_login() {
        // Login stamps last_login on the row before building the response
        // body, so the profile must reflect the new value, not a stale None.
        let config = test_config();
        let dir = tempfile::tempdir().unwrap();
        let state = crate::AppState::builder()
            .db(sqlx::PgPool::connect_lazy(&config.database.url).unwrap())
            .config(config.clone())
            .avatars(crate::avatars::AvatarStore::new(dir.path()))
            .build();

        let mut user = UserDBResponse {
            id: uuid::Uuid::new_v4(),
            username: "jsmith".to_string(),
            email: "jsmith@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Client,
            is_superuser: false,
            is_staff: false,
            avatar: None,
            password_hash: Some("$argon2id$...".to_string()),
            date_joined: chrono::Utc::now(),
            last_login: None,
        };

        let stamped = chrono::Utc::now();
        user.last_login = Some(stamped);

        let profile = profile_for(&state, user);
        assert_eq!(profile.last_login, Some(stamped));
    }

    #[test]
    fn test_session_cookie_format() {
        let mut config = test_config();
        config.auth.session.jwt_expiry = Duration::from_secs(3600);

        let cookie = create_session_cookie("tok123", &config);
        assert!(cookie.starts_with("redress_session=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=strict"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_session_cookie_omits_secure_when_disabled() {
        // Secure is presence-keyed per RFC 6265; "Secure=false" would still
        // mark the cookie secure and break plain-HTTP deployments.
        let mut config = test_config();
        config.auth.session.cookie_secure = false;

        let cookie = create_session_cookie("tok123", &config);
        assert!(!cookie.contains("Secure"));

        let clear = clear_session_cookie(&config);
        assert!(!clear.contains("Secure"));
        assert!(clear.starts_with("redress_session=;"));
        assert!(clear.contains("Max-Age=0"));
    }

    #[test]
    fn test_clear_session_cookie_format() {
        let config = test_config();

        let cookie = clear_session_cookie(&config);
        assert!(cookie.starts_with("redress_session=;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }
}
