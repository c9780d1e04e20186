//! API request/response models for users.
//!
//! Field policy follows the representation contracts: the password is
//! write-only (accepted on registration input, never emitted), and the
//! server-assigned subset (`id`, `role`, `is_superuser`, `is_staff`,
//! `date_joined`, `last_login`, `avatar_url`) is absent from the update
//! models so clients cannot set it.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User role, mirroring the `user_role` database enum.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Client,
    Admin,
}

/// Registration input. `password` is write-only: it appears here and nowhere
/// in any response model. `role` is optional; omission leaves the default.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Full profile representation returned by the `/auth/me` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
    /// Relative storage path of the avatar image, e.g. "avatars/<uuid>.png"
    pub avatar: Option<String>,
    /// Derived at serialization time from `avatar`; empty string when the
    /// avatar is unset or its storage URL cannot be resolved.
    pub avatar_url: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Build a profile from a database row and an already-resolved avatar URL.
    pub fn from_user(db: UserDBResponse, avatar_url: String) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            first_name: db.first_name,
            last_name: db.last_name,
            role: db.role,
            is_superuser: db.is_superuser,
            is_staff: db.is_staff,
            avatar: db.avatar,
            avatar_url,
            date_joined: db.date_joined,
            last_login: db.last_login,
        }
    }
}

/// Client-writable profile fields. Everything else on [`UserProfile`] is
/// read-only at the API boundary.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Authenticated identity carried through request handling.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
}

impl CurrentUser {
    /// Admins are users with the ADMIN role or the superuser flag.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }
}

impl From<&UserDBResponse> for CurrentUser {
    fn from(db: &UserDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username.clone(),
            email: db.email.clone(),
            role: db.role,
            is_superuser: db.is_superuser,
            is_staff: db.is_staff,
        }
    }
}

/// Body returned by login and registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    /// JWT session token, also set as a cookie.
    pub token: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_db_user() -> UserDBResponse {
        UserDBResponse {
            id: Uuid::new_v4(),
            username: "jsmith".to_string(),
            email: "jsmith@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            role: Role::Client,
            is_superuser: false,
            is_staff: false,
            avatar: None,
            password_hash: Some("$argon2id$...".to_string()),
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn profile_never_contains_password() {
        let profile = UserProfile::from_user(sample_db_user(), String::new());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"CLIENT\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn register_role_is_optional() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username": "a", "password": "hunter22", "email": "a@example.com"}"#,
        )
        .unwrap();
        assert!(request.role.is_none());
        assert_eq!(request.role.unwrap_or_default(), Role::Client);

        let request: RegisterRequest = serde_json::from_str(
            r#"{"username": "a", "password": "hunter22", "email": "a@example.com", "role": "ADMIN"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Some(Role::Admin));
    }

    #[test]
    fn profile_update_ignores_server_assigned_fields() {
        // Clients sending read-only fields get them silently dropped
        let update: UserProfileUpdate = serde_json::from_str(
            r#"{"username": "new", "role": "ADMIN", "is_superuser": true, "date_joined": "2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(update.username.as_deref(), Some("new"));
        assert!(update.email.is_none());
    }

    #[test]
    fn profile_round_trip_preserves_writable_fields() {
        let profile = UserProfile::from_user(sample_db_user(), String::new());
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.username, profile.username);
        assert_eq!(back.email, profile.email);
        assert_eq!(back.first_name, profile.first_name);
        assert_eq!(back.last_name, profile.last_name);
        assert_eq!(back.avatar, profile.avatar);
    }
}
