//! General feedback endpoints, separate from the complaint lifecycle.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        feedback::{FeedbackCreate, FeedbackResponse},
        pagination::Pagination,
        users::CurrentUser,
    },
    db::{
        handlers::{Feedback, Repository, feedback::FeedbackFilter},
        models::feedback::FeedbackCreateDBRequest,
    },
    errors::Error,
};

/// Submit feedback
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    request_body = FeedbackCreate,
    tag = "feedback",
    responses(
        (status = 201, description = "Feedback created", body = FeedbackResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_feedback(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<FeedbackCreate>,
) -> Result<(StatusCode, Json<FeedbackResponse>), Error> {
    if request.text.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Feedback text cannot be empty".to_string(),
        });
    }

    if let Some(rating) = request.rating {
        if !(1..=5).contains(&rating) {
            return Err(Error::BadRequest {
                message: "Rating must be between 1 and 5".to_string(),
            });
        }
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Feedback::new(&mut pool_conn);

    let created = repo
        .create(&FeedbackCreateDBRequest {
            user_id: current_user.id,
            text: request.text,
            rating: request.rating,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(created))))
}

/// List feedback (own feedback for clients, all for admins)
#[utoipa::path(
    get,
    path = "/api/v1/feedback",
    tag = "feedback",
    params(Pagination),
    responses(
        (status = 200, description = "Feedback, newest first", body = Vec<FeedbackResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    security(("session_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_feedback(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<FeedbackResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Feedback::new(&mut pool_conn);

    let filter = FeedbackFilter {
        user_id: if current_user.is_admin() { None } else { Some(current_user.id) },
        skip: pagination.skip(),
        limit: pagination.limit(),
    };

    let records = repo.list(&filter).await?;

    Ok(Json(records.into_iter().map(FeedbackResponse::from).collect()))
}
