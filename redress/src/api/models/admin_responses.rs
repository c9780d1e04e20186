//! API request/response models for admin responses to complaints.

use crate::db::models::admin_responses::AdminResponseDBResponse;
use crate::types::{AdminResponseId, ComplaintId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminResponseCreate {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponseResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: AdminResponseId,
    #[schema(value_type = String, format = "uuid")]
    pub complaint_id: ComplaintId,
    #[schema(value_type = String, format = "uuid")]
    pub responder_id: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminResponseDBResponse> for AdminResponseResponse {
    fn from(db: AdminResponseDBResponse) -> Self {
        Self {
            id: db.id,
            complaint_id: db.complaint_id,
            responder_id: db.responder_id,
            message: db.message,
            created_at: db.created_at,
        }
    }
}
