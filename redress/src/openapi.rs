//! OpenAPI documentation configuration.
//!
//! One API surface: the complaint service's REST API under `/api/v1/*`,
//! served interactively at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;

/// Security scheme: the session JWT, carried in a cookie (browsers) or a
/// Bearer Authorization header (programmatic clients).
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "session_token".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("redress_session"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Redress API",
        description = "Complaint and feedback service: user accounts with avatars, \
                       complaint lifecycle tracking with an audit trail, admin responses, \
                       and general feedback."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::me,
        api::handlers::auth::update_me,
        api::handlers::auth::upload_avatar,
        api::handlers::complaints::create_complaint,
        api::handlers::complaints::list_complaints,
        api::handlers::complaints::get_complaint,
        api::handlers::complaints::update_complaint_status,
        api::handlers::complaints::list_complaint_history,
        api::handlers::complaints::create_admin_response,
        api::handlers::complaints::list_admin_responses,
        api::handlers::feedback::create_feedback,
        api::handlers::feedback::list_feedback,
    ),
    components(schemas(
        api::models::users::Role,
        api::models::users::RegisterRequest,
        api::models::users::LoginRequest,
        api::models::users::UserProfile,
        api::models::users::UserProfileUpdate,
        api::models::users::AuthResponse,
        api::models::auth::AuthSuccessResponse,
        api::models::complaints::ComplaintStatus,
        api::models::complaints::ComplaintCreate,
        api::models::complaints::ComplaintStatusUpdate,
        api::models::complaints::ComplaintResponse,
        api::models::admin_responses::AdminResponseCreate,
        api::models::admin_responses::AdminResponseResponse,
        api::models::history::HistoryAction,
        api::models::history::HistoryEntryResponse,
        api::models::feedback::FeedbackCreate,
        api::models::feedback::FeedbackResponse,
    )),
    tags(
        (name = "authentication", description = "Registration, login, and profile management"),
        (name = "complaints", description = "Complaint lifecycle and admin responses"),
        (name = "feedback", description = "General feedback"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_spec_builds() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json().unwrap();
        assert!(json.contains("/api/v1/complaints"));
        assert!(json.contains("/api/v1/auth/register"));
        assert!(json.contains("session_token"));
    }
}
