//! Database repository for the complaint audit trail.
//!
//! History is append-only: entries are written by the complaint and
//! admin-response repositories as part of their transactions, and read back
//! per complaint. There is no update or delete surface.

use crate::types::{ComplaintId, abbrev_uuid};
use crate::{
    api::models::history::HistoryAction,
    api::models::users::Role,
    db::{
        errors::Result,
        models::history::{HistoryEntryCreateDBRequest, HistoryEntryDBResponse},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, Postgres};
use tracing::instrument;
use uuid::Uuid;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct HistoryEntry {
    pub id: Uuid,
    pub complaint_id: ComplaintId,
    pub actor_id: Uuid,
    pub actor_role: Role,
    pub action: HistoryAction,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for HistoryEntryDBResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            complaint_id: entry.complaint_id,
            actor_id: entry.actor_id,
            actor_role: entry.actor_role,
            action: entry.action,
            detail: entry.detail,
            created_at: entry.created_at,
        }
    }
}

/// Append a history entry using any executor, so sibling repositories can
/// record events inside their own transactions.
pub(crate) async fn record<'e, E>(executor: E, request: &HistoryEntryCreateDBRequest) -> Result<HistoryEntryDBResponse>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let entry = sqlx::query_as::<_, HistoryEntry>(
        r#"
        INSERT INTO complaint_history (id, complaint_id, actor_id, actor_role, action, detail)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.complaint_id)
    .bind(request.actor_id)
    .bind(request.actor_role)
    .bind(request.action)
    .bind(&request.detail)
    .fetch_one(executor)
    .await?;

    Ok(HistoryEntryDBResponse::from(entry))
}

pub struct ComplaintHistory<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ComplaintHistory<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// List a complaint's audit trail, oldest first.
    #[instrument(skip(self), fields(complaint_id = %abbrev_uuid(&complaint_id)), err)]
    pub async fn list_for_complaint(&mut self, complaint_id: ComplaintId) -> Result<Vec<HistoryEntryDBResponse>> {
        let entries =
            sqlx::query_as::<_, HistoryEntry>("SELECT * FROM complaint_history WHERE complaint_id = $1 ORDER BY created_at ASC")
                .bind(complaint_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(entries.into_iter().map(HistoryEntryDBResponse::from).collect())
    }
}
