//! Complaint endpoints: submission, listing, status transitions, the audit
//! trail, and admin responses.
//!
//! Access model: clients only ever see their own complaints; admins see all
//! of them. A non-owner requesting someone else's complaint gets a 404 rather
//! than a 403, so complaint IDs don't leak.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        admin_responses::{AdminResponseCreate, AdminResponseResponse},
        complaints::{ComplaintCreate, ComplaintResponse, ComplaintStatusUpdate},
        history::HistoryEntryResponse,
        pagination::Pagination,
        users::CurrentUser,
    },
    auth::current_user::require_admin,
    db::{
        handlers::{AdminResponses, ComplaintHistory, Complaints, Repository},
        handlers::{admin_responses::AdminResponseFilter, complaints::ComplaintFilter},
        models::{
            admin_responses::AdminResponseCreateDBRequest,
            complaints::{ComplaintCreateDBRequest, ComplaintDBResponse, ComplaintUpdateDBRequest},
        },
    },
    errors::Error,
    types::ComplaintId,
};

/// Fetch a complaint the current user is allowed to see, or 404.
async fn fetch_visible_complaint(
    repo: &mut Complaints<'_>,
    id: ComplaintId,
    current_user: &CurrentUser,
) -> Result<ComplaintDBResponse, Error> {
    let not_found = || Error::NotFound {
        resource: "complaint".to_string(),
        id: id.to_string(),
    };

    let complaint = repo.get_by_id(id).await?.ok_or_else(not_found)?;

    if complaint.user_id != current_user.id && !current_user.is_admin() {
        return Err(not_found());
    }

    Ok(complaint)
}

/// Submit a new complaint
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = ComplaintCreate,
    tag = "complaints",
    responses(
        (status = 201, description = "Complaint created", body = ComplaintResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_complaint(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ComplaintCreate>,
) -> Result<(StatusCode, Json<ComplaintResponse>), Error> {
    if request.text.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Complaint text cannot be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Complaints::new(&mut pool_conn);

    let created = repo
        .create(&ComplaintCreateDBRequest {
            user_id: current_user.id,
            actor_role: current_user.role,
            text: request.text,
            category: request.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ComplaintResponse::from(created))))
}

/// List complaints (own complaints for clients, all for admins)
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    tag = "complaints",
    params(Pagination),
    responses(
        (status = 200, description = "Complaints, newest first", body = Vec<ComplaintResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_complaints(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ComplaintResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Complaints::new(&mut pool_conn);

    let filter = ComplaintFilter {
        user_id: if current_user.is_admin() { None } else { Some(current_user.id) },
        skip: pagination.skip(),
        limit: pagination.limit(),
    };

    let complaints = repo.list(&filter).await?;

    Ok(Json(complaints.into_iter().map(ComplaintResponse::from).collect()))
}

/// Get a single complaint
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{complaint_id}",
    tag = "complaints",
    params(("complaint_id" = uuid::Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Complaint not found"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn get_complaint(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(complaint_id): Path<ComplaintId>,
) -> Result<Json<ComplaintResponse>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Complaints::new(&mut pool_conn);

    let complaint = fetch_visible_complaint(&mut repo, complaint_id, &current_user).await?;

    Ok(Json(ComplaintResponse::from(complaint)))
}

/// Change a complaint's status (admin only)
#[utoipa::path(
    patch,
    path = "/api/v1/complaints/{complaint_id}/status",
    request_body = ComplaintStatusUpdate,
    tag = "complaints",
    params(("complaint_id" = uuid::Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Complaint not found"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn update_complaint_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(complaint_id): Path<ComplaintId>,
    Json(request): Json<ComplaintStatusUpdate>,
) -> Result<Json<ComplaintResponse>, Error> {
    require_admin(&current_user)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Complaints::new(&mut pool_conn);

    let updated = repo
        .update(
            complaint_id,
            &ComplaintUpdateDBRequest {
                status: Some(request.status),
                actor_id: current_user.id,
                actor_role: current_user.role,
            },
        )
        .await?;

    Ok(Json(ComplaintResponse::from(updated)))
}

/// Get a complaint's audit trail, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{complaint_id}/history",
    tag = "complaints",
    params(("complaint_id" = uuid::Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "History entries, oldest first", body = Vec<HistoryEntryResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Complaint not found"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_complaint_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(complaint_id): Path<ComplaintId>,
) -> Result<Json<Vec<HistoryEntryResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    {
        let mut repo = Complaints::new(&mut pool_conn);
        fetch_visible_complaint(&mut repo, complaint_id, &current_user).await?;
    }

    let mut history_repo = ComplaintHistory::new(&mut pool_conn);
    let entries = history_repo.list_for_complaint(complaint_id).await?;

    Ok(Json(entries.into_iter().map(HistoryEntryResponse::from).collect()))
}

/// Respond to a complaint (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/complaints/{complaint_id}/responses",
    request_body = AdminResponseCreate,
    tag = "complaints",
    params(("complaint_id" = uuid::Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 201, description = "Response created", body = AdminResponseResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Complaint not found"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_admin_response(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(complaint_id): Path<ComplaintId>,
    Json(request): Json<AdminResponseCreate>,
) -> Result<(StatusCode, Json<AdminResponseResponse>), Error> {
    require_admin(&current_user)?;

    if request.message.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Response message cannot be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    {
        let mut repo = Complaints::new(&mut pool_conn);
        fetch_visible_complaint(&mut repo, complaint_id, &current_user).await?;
    }

    let mut response_repo = AdminResponses::new(&mut pool_conn);
    let created = response_repo
        .create(&AdminResponseCreateDBRequest {
            complaint_id,
            responder_id: current_user.id,
            responder_role: current_user.role,
            message: request.message,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AdminResponseResponse::from(created))))
}

/// List the responses on a complaint, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{complaint_id}/responses",
    tag = "complaints",
    params(("complaint_id" = uuid::Uuid, Path, description = "Complaint ID"), Pagination),
    responses(
        (status = 200, description = "Responses, oldest first", body = Vec<AdminResponseResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Complaint not found"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_admin_responses(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(complaint_id): Path<ComplaintId>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<AdminResponseResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    {
        let mut repo = Complaints::new(&mut pool_conn);
        fetch_visible_complaint(&mut repo, complaint_id, &current_user).await?;
    }

    let mut response_repo = AdminResponses::new(&mut pool_conn);
    let responses = response_repo
        .list(&AdminResponseFilter {
            complaint_id: Some(complaint_id),
            skip: pagination.skip(),
            limit: pagination.limit(),
        })
        .await?;

    Ok(Json(responses.into_iter().map(AdminResponseResponse::from).collect()))
}
