use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;

use super::board::{ReviewBoard, ReviewError};
use super::domain::{ReviewForm, ReviewId};
use crate::remote::{DataService, RemoteError};
use crate::residences::ResidenceId;

/// Router exposing the review list, submission and deletion endpoints.
pub fn review_router<D>(board: Arc<ReviewBoard<D>>) -> Router
where
    D: DataService + 'static,
{
    Router::new()
        .route(
            "/api/v1/residences/:residence_id/reviews",
            get(list_handler::<D>).post(submit_handler::<D>),
        )
        .route(
            "/api/v1/residences/:residence_id/reviews/:review_id",
            delete(delete_handler::<D>),
        )
        .with_state(board)
}

pub(crate) async fn list_handler<D>(
    State(board): State<Arc<ReviewBoard<D>>>,
    Path(residence_id): Path<String>,
) -> Response
where
    D: DataService + 'static,
{
    match board.load(&ResidenceId(residence_id)).await {
        Ok(display) => (StatusCode::OK, Json(display)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<D>(
    State(board): State<Arc<ReviewBoard<D>>>,
    Path(residence_id): Path<String>,
    Json(form): Json<ReviewForm>,
) -> Response
where
    D: DataService + 'static,
{
    match board.submit(&ResidenceId(residence_id), form).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<D>(
    State(board): State<Arc<ReviewBoard<D>>>,
    Path((residence_id, review_id)): Path<(String, String)>,
) -> Response
where
    D: DataService + 'static,
{
    match board
        .delete(&ResidenceId(residence_id), &ReviewId(review_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReviewError) -> Response {
    match error {
        ReviewError::UnknownResidence(_)
        | ReviewError::UnknownReview { .. }
        | ReviewError::Remote(RemoteError::NotFound) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ReviewError::Validation(fields) => {
            let payload = json!({
                "error": "review form invalid",
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        ReviewError::Remote(remote) => {
            let payload = json!({ "error": remote.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
