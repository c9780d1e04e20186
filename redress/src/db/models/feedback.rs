//! Database models for feedback.

use crate::types::{FeedbackId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct FeedbackCreateDBRequest {
    pub user_id: UserId,
    pub text: String,
    pub rating: Option<i32>,
}

/// Database request for updating a feedback record. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct FeedbackUpdateDBRequest {
    pub text: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct FeedbackDBResponse {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}
