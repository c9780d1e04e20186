//! API response models for the complaint audit trail.

use crate::api::models::users::Role;
use crate::db::models::history::HistoryEntryDBResponse;
use crate::types::{ComplaintId, HistoryEntryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle event kind, mirroring the `history_action` database enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "history_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Created,
    StatusChanged,
    AdminResponse,
    Feedback,
}

/// One audit-trail entry. History is append-only and written server-side as a
/// side effect of complaint operations; there is no client write surface.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: HistoryEntryId,
    #[schema(value_type = String, format = "uuid")]
    pub complaint_id: ComplaintId,
    #[schema(value_type = String, format = "uuid")]
    pub actor_id: UserId,
    pub actor_role: Role,
    pub action: HistoryAction,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntryDBResponse> for HistoryEntryResponse {
    fn from(db: HistoryEntryDBResponse) -> Self {
        Self {
            id: db.id,
            complaint_id: db.complaint_id,
            actor_id: db.actor_id,
            actor_role: db.actor_role,
            action: db.action,
            detail: db.detail,
            created_at: db.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&HistoryAction::Created).unwrap(), "\"CREATED\"");
        assert_eq!(serde_json::to_string(&HistoryAction::StatusChanged).unwrap(), "\"STATUS_CHANGED\"");
        assert_eq!(serde_json::to_string(&HistoryAction::AdminResponse).unwrap(), "\"ADMIN_RESPONSE\"");
        assert_eq!(serde_json::to_string(&HistoryAction::Feedback).unwrap(), "\"FEEDBACK\"");
    }
}
