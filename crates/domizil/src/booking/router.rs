use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::form::BookingForm;
use super::service::BookingService;
use super::BookingError;
use crate::calendar::{parse_iso_date, CalendarCursor};
use crate::remote::DataService;
use crate::residences::ResidenceId;

#[derive(Debug, Deserialize)]
pub(crate) struct SelectDayRequest {
    pub(crate) day: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthQuery {
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<u32>,
    pub(crate) step: Option<i32>,
}

/// Router exposing calendar selection and booking submission per residence.
pub fn booking_router<D>(service: Arc<BookingService<D>>) -> Router
where
    D: DataService + 'static,
{
    Router::new()
        .route("/api/v1/residences", get(list_handler::<D>))
        .route(
            "/api/v1/residences/:residence_id/calendar",
            get(calendar_handler::<D>),
        )
        .route(
            "/api/v1/residences/:residence_id/calendar/select",
            post(select_handler::<D>),
        )
        .route(
            "/api/v1/residences/:residence_id/calendar/reset",
            post(reset_handler::<D>),
        )
        .route(
            "/api/v1/residences/:residence_id/booking/form",
            put(form_handler::<D>),
        )
        .route(
            "/api/v1/residences/:residence_id/booking",
            get(snapshot_handler::<D>).post(submit_handler::<D>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<D>(State(service): State<Arc<BookingService<D>>>) -> Response
where
    D: DataService + 'static,
{
    (StatusCode::OK, Json(service.snapshots())).into_response()
}

pub(crate) async fn calendar_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    D: DataService + 'static,
{
    let requested = match (query.year, query.month) {
        (Some(year), Some(month)) => match CalendarCursor::new(year, month) {
            Some(cursor) => Some(cursor),
            None => {
                let payload = json!({ "error": format!("{year}-{month:02} is not a calendar month") });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        },
        _ => None,
    };

    let result = service.with_card(&ResidenceId(residence_id), |card| {
        let target = match requested {
            Some(cursor) => cursor,
            None => card.displayed_month(),
        };
        let target = match query.step {
            Some(step) => target.advanced(step)?,
            None => target,
        };
        card.show_month(target);
        Some(card.month_view(None))
    });

    match result {
        Ok(Some(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "requested month is out of range" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn select_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
    Json(request): Json<SelectDayRequest>,
) -> Response
where
    D: DataService + 'static,
{
    let day: NaiveDate = match parse_iso_date(&request.day) {
        Ok(day) => day,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let result = service.with_card(&ResidenceId(residence_id), |card| {
        card.select_day(day);
        card.snapshot()
    });

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
) -> Response
where
    D: DataService + 'static,
{
    let result = service.with_card(&ResidenceId(residence_id), |card| {
        card.reset_selection();
        card.snapshot()
    });

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn form_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
    Json(form): Json<BookingForm>,
) -> Response
where
    D: DataService + 'static,
{
    let result = service.with_card(&ResidenceId(residence_id), |card| {
        card.update_form(form);
        card.snapshot()
    });

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
) -> Response
where
    D: DataService + 'static,
{
    match service.snapshot(&ResidenceId(residence_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<D>(
    State(service): State<Arc<BookingService<D>>>,
    Path(residence_id): Path<String>,
) -> Response
where
    D: DataService + 'static,
{
    match service.submit(&ResidenceId(residence_id)).await {
        Ok(confirmation) => (StatusCode::ACCEPTED, Json(confirmation)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: BookingError) -> Response {
    match error {
        BookingError::UnknownResidence(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        BookingError::Validation(fields) => {
            let payload = json!({
                "error": "booking form invalid",
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        BookingError::InFlight(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        BookingError::Submission(_) => {
            let payload = json!({ "error": "booking inquiry could not be submitted" });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
