//! API request/response models for complaints.

use crate::db::models::complaints::ComplaintDBResponse;
use crate::types::{ComplaintId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Complaint lifecycle status, mirroring the `complaint_status` database enum.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[default]
    New,
    InReview,
    InProgress,
    Resolved,
    Rejected,
    Closed,
}

impl ComplaintStatus {
    /// Wire-format name, matching the database enum labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::New => "NEW",
            ComplaintStatus::InReview => "IN_REVIEW",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Rejected => "REJECTED",
            ComplaintStatus::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation input. `id`, `user_id` and `created_at` are server-assigned;
/// client-supplied values for them are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ComplaintCreate {
    pub text: String,
    pub category: Option<String>,
}

/// Admin-only status transition request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ComplaintStatusUpdate {
    pub status: ComplaintStatus,
}

/// Full complaint representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ComplaintId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub text: String,
    pub category: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintDBResponse> for ComplaintResponse {
    fn from(db: ComplaintDBResponse) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            text: db.text,
            category: db.category,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&ComplaintStatus::New).unwrap(), "\"NEW\"");
        assert_eq!(serde_json::to_string(&ComplaintStatus::InReview).unwrap(), "\"IN_REVIEW\"");
        assert_eq!(serde_json::to_string(&ComplaintStatus::InProgress).unwrap(), "\"IN_PROGRESS\"");
        assert_eq!(serde_json::to_string(&ComplaintStatus::Resolved).unwrap(), "\"RESOLVED\"");
    }

    #[test]
    fn create_ignores_server_assigned_fields() {
        // A client trying to set id/user_id/created_at gets them dropped at
        // deserialization; the server assigns its own values.
        let create: ComplaintCreate = serde_json::from_str(
            r#"{
                "id": "00000000-0000-0000-0000-000000000001",
                "user_id": "00000000-0000-0000-0000-000000000002",
                "created_at": "2020-01-01T00:00:00Z",
                "text": "The elevator is broken",
                "category": "facilities"
            }"#,
        )
        .unwrap();
        assert_eq!(create.text, "The elevator is broken");
        assert_eq!(create.category.as_deref(), Some("facilities"));
    }

    #[test]
    fn response_round_trip() {
        let db = ComplaintDBResponse {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            text: "noisy dorm".to_string(),
            category: None,
            status: ComplaintStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = ComplaintResponse::from(db);
        let json = serde_json::to_string(&response).unwrap();
        let back: ComplaintResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, response.text);
        assert_eq!(back.category, response.category);
        assert_eq!(back.status, response.status);
    }
}
