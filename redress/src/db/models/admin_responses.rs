//! Database models for admin responses.

use crate::api::models::users::Role;
use crate::types::{AdminResponseId, ComplaintId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct AdminResponseCreateDBRequest {
    pub complaint_id: ComplaintId,
    pub responder_id: UserId,
    pub responder_role: Role,
    pub message: String,
}

/// Database request for updating an admin response.
#[derive(Debug, Clone, Default)]
pub struct AdminResponseUpdateDBRequest {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminResponseDBResponse {
    pub id: AdminResponseId,
    pub complaint_id: ComplaintId,
    pub responder_id: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
