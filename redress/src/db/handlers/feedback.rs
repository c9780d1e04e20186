//! Database repository for feedback.

use crate::types::{FeedbackId, UserId, abbrev_uuid};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::feedback::{FeedbackCreateDBRequest, FeedbackDBResponse, FeedbackUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing feedback. `user_id = None` lists across all users.
#[derive(Debug, Clone)]
pub struct FeedbackFilter {
    pub user_id: Option<UserId>,
    pub skip: i64,
    pub limit: i64,
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct FeedbackRecord {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackDBResponse {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            text: record.text,
            rating: record.rating,
            created_at: record.created_at,
        }
    }
}

pub struct Feedback<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Feedback<'c> {
    type CreateRequest = FeedbackCreateDBRequest;
    type UpdateRequest = FeedbackUpdateDBRequest;
    type Response = FeedbackDBResponse;
    type Id = FeedbackId;
    type Filter = FeedbackFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let record = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            INSERT INTO feedback (id, user_id, text, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(&request.text)
        .bind(request.rating)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(FeedbackDBResponse::from(record))
    }

    #[instrument(skip(self), fields(feedback_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let record = sqlx::query_as::<_, FeedbackRecord>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(record.map(FeedbackDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let records = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            SELECT * FROM feedback
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(records.into_iter().map(FeedbackDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(feedback_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(feedback_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let record = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            UPDATE feedback SET
                text = COALESCE($2, text),
                rating = COALESCE($3, rating)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.text)
        .bind(request.rating)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(FeedbackDBResponse::from(record))
    }
}

impl<'c> Feedback<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
