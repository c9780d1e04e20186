//! Database models for the complaint audit trail.

use crate::api::models::history::HistoryAction;
use crate::api::models::users::Role;
use crate::types::{ComplaintId, HistoryEntryId, UserId};
use chrono::{DateTime, Utc};

/// Database request for appending a history entry. Written internally by the
/// complaint and admin-response repositories, never from client input.
#[derive(Debug, Clone)]
pub struct HistoryEntryCreateDBRequest {
    pub complaint_id: ComplaintId,
    pub actor_id: UserId,
    pub actor_role: Role,
    pub action: HistoryAction,
    pub detail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryEntryDBResponse {
    pub id: HistoryEntryId,
    pub complaint_id: ComplaintId,
    pub actor_id: UserId,
    pub actor_role: Role,
    pub action: HistoryAction,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
