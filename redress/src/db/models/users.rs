//! Database models for users.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user.
///
/// Only a password hash crosses this boundary; plaintext passwords are hashed
/// in the auth layer before the request is built.
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub password_hash: Option<String>,
}

/// Database request for updating a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdateDBRequest {
    pub fn from_profile_update(update: crate::api::models::users::UserProfileUpdate) -> Self {
        Self {
            username: update.username,
            email: update.email,
            first_name: update.first_name,
            last_name: update.last_name,
            avatar: None, // Avatar changes go through the upload endpoint
            password_hash: None,
        }
    }
}

/// Database response for a user
#[derive(Debug, Clone)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
