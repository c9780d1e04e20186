//! API request/response models for feedback.
//!
//! Same read-only-field pattern as complaints: `id`, `user_id` and
//! `created_at` are server-assigned.

use crate::db::models::feedback::FeedbackDBResponse;
use crate::types::{FeedbackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackCreate {
    pub text: String,
    /// Optional 1-5 satisfaction rating.
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: FeedbackId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackDBResponse> for FeedbackResponse {
    fn from(db: FeedbackDBResponse) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            text: db.text,
            rating: db.rating,
            created_at: db.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_ignores_server_assigned_fields() {
        let create: FeedbackCreate = serde_json::from_str(
            r#"{
                "id": "00000000-0000-0000-0000-000000000001",
                "user_id": "00000000-0000-0000-0000-000000000002",
                "created_at": "2020-01-01T00:00:00Z",
                "text": "great support",
                "rating": 5
            }"#,
        )
        .unwrap();
        assert_eq!(create.text, "great support");
        assert_eq!(create.rating, Some(5));
    }
}
