//! Database repository for admin responses.

use crate::types::{AdminResponseId, ComplaintId, abbrev_uuid};
use crate::{
    api::models::history::HistoryAction,
    db::{
        errors::{DbError, Result},
        handlers::{history, repository::Repository},
        models::{
            admin_responses::{AdminResponseCreateDBRequest, AdminResponseDBResponse, AdminResponseUpdateDBRequest},
            history::HistoryEntryCreateDBRequest,
        },
    },
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing admin responses
#[derive(Debug, Clone)]
pub struct AdminResponseFilter {
    pub complaint_id: Option<ComplaintId>,
    pub skip: i64,
    pub limit: i64,
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct AdminResponse {
    pub id: AdminResponseId,
    pub complaint_id: ComplaintId,
    pub responder_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminResponse> for AdminResponseDBResponse {
    fn from(response: AdminResponse) -> Self {
        Self {
            id: response.id,
            complaint_id: response.complaint_id,
            responder_id: response.responder_id,
            message: response.message,
            created_at: response.created_at,
        }
    }
}

pub struct AdminResponses<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for AdminResponses<'c> {
    type CreateRequest = AdminResponseCreateDBRequest;
    type UpdateRequest = AdminResponseUpdateDBRequest;
    type Response = AdminResponseDBResponse;
    type Id = AdminResponseId;
    type Filter = AdminResponseFilter;

    #[instrument(skip(self, request), fields(complaint_id = %abbrev_uuid(&request.complaint_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let response_id = Uuid::new_v4();

        // Response row and its ADMIN_RESPONSE audit entry land atomically.
        let mut tx = self.db.begin().await?;

        let response = sqlx::query_as::<_, AdminResponse>(
            r#"
            INSERT INTO admin_responses (id, complaint_id, responder_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(response_id)
        .bind(request.complaint_id)
        .bind(request.responder_id)
        .bind(&request.message)
        .fetch_one(&mut *tx)
        .await?;

        history::record(
            &mut *tx,
            &HistoryEntryCreateDBRequest {
                complaint_id: request.complaint_id,
                actor_id: request.responder_id,
                actor_role: request.responder_role,
                action: HistoryAction::AdminResponse,
                detail: Some(request.message.clone()),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(AdminResponseDBResponse::from(response))
    }

    #[instrument(skip(self), fields(response_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let response = sqlx::query_as::<_, AdminResponse>("SELECT * FROM admin_responses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(response.map(AdminResponseDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let responses = sqlx::query_as::<_, AdminResponse>(
            r#"
            SELECT * FROM admin_responses
            WHERE ($1::uuid IS NULL OR complaint_id = $1)
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.complaint_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(responses.into_iter().map(AdminResponseDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(response_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admin_responses WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(response_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let response = sqlx::query_as::<_, AdminResponse>(
            r#"
            UPDATE admin_responses SET
                message = COALESCE($2, message)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.message)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(AdminResponseDBResponse::from(response))
    }
}

impl<'c> AdminResponses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
