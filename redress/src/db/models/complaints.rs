//! Database models for complaints.

use crate::api::models::complaints::ComplaintStatus;
use crate::api::models::users::Role;
use crate::types::{ComplaintId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a complaint. The submitter and their role
/// come from the authenticated request context, never from client input.
#[derive(Debug, Clone)]
pub struct ComplaintCreateDBRequest {
    pub user_id: UserId,
    pub actor_role: Role,
    pub text: String,
    pub category: Option<String>,
}

/// Database request for updating a complaint. Currently only status
/// transitions are permitted; the actor is recorded in the audit trail.
#[derive(Debug, Clone)]
pub struct ComplaintUpdateDBRequest {
    pub status: Option<ComplaintStatus>,
    pub actor_id: UserId,
    pub actor_role: Role,
}

/// Database response for a complaint
#[derive(Debug, Clone)]
pub struct ComplaintDBResponse {
    pub id: ComplaintId,
    pub user_id: UserId,
    pub text: String,
    pub category: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
