//! Database repository for complaints.

use crate::types::{ComplaintId, UserId, abbrev_uuid};
use crate::{
    api::models::complaints::ComplaintStatus,
    api::models::history::HistoryAction,
    db::{
        errors::{DbError, Result},
        handlers::{history, repository::Repository},
        models::{
            complaints::{ComplaintCreateDBRequest, ComplaintDBResponse, ComplaintUpdateDBRequest},
            history::HistoryEntryCreateDBRequest,
        },
    },
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing complaints. `user_id = None` lists across all users
/// (admin view); `Some` restricts to one submitter.
#[derive(Debug, Clone)]
pub struct ComplaintFilter {
    pub user_id: Option<UserId>,
    pub skip: i64,
    pub limit: i64,
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Complaint {
    pub id: ComplaintId,
    pub user_id: UserId,
    pub text: String,
    pub category: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintDBResponse {
    fn from(complaint: Complaint) -> Self {
        Self {
            id: complaint.id,
            user_id: complaint.user_id,
            text: complaint.text,
            category: complaint.category,
            status: complaint.status,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}

pub struct Complaints<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Complaints<'c> {
    type CreateRequest = ComplaintCreateDBRequest;
    type UpdateRequest = ComplaintUpdateDBRequest;
    type Response = ComplaintDBResponse;
    type Id = ComplaintId;
    type Filter = ComplaintFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let complaint_id = Uuid::new_v4();

        // Complaint row and its CREATED audit entry land atomically.
        let mut tx = self.db.begin().await?;

        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (id, user_id, text, category)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(complaint_id)
        .bind(request.user_id)
        .bind(&request.text)
        .bind(&request.category)
        .fetch_one(&mut *tx)
        .await?;

        history::record(
            &mut *tx,
            &HistoryEntryCreateDBRequest {
                complaint_id,
                actor_id: request.user_id,
                actor_role: request.actor_role,
                action: HistoryAction::Created,
                detail: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(ComplaintDBResponse::from(complaint))
    }

    #[instrument(skip(self), fields(complaint_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let complaint = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(complaint.map(ComplaintDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let complaints = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
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

        Ok(complaints.into_iter().map(ComplaintDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(complaint_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(complaint_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Status change and its audit entry land atomically.
        let mut tx = self.db.begin().await?;

        let previous = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints SET
                status = COALESCE($2, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.status)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(status) = request.status {
            if status != previous.status {
                history::record(
                    &mut *tx,
                    &HistoryEntryCreateDBRequest {
                        complaint_id: id,
                        actor_id: request.actor_id,
                        actor_role: request.actor_role,
                        action: HistoryAction::StatusChanged,
                        detail: Some(format!("{} -> {}", previous.status, status)),
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(ComplaintDBResponse::from(complaint))
    }
}

impl<'c> Complaints<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
