//! HTTP request handlers for the work signup API.
//!
//! Each handler tags its request with a correlation id, calls the store and
//! maps the outcome to JSON. Expected signup conflicts are logged at `warn`
//! and returned as 409s; they are never retried here.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AssignmentId, PeriodId, ShiftId};
use crate::signup::{ShiftFilter, SignupRequest};

use super::request::{PhaseChangeBody, RemovalQuery, ShiftQuery, SignupBody, UserQuery};
use super::response::{ApiError, ApiErrorResponse, RemovalResponse, ShiftListResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/periods/:period_id/shifts", get(list_shifts_handler))
        .route("/periods/:period_id/phase", post(change_phase_handler))
        .route("/periods/:period_id/status", get(signup_status_handler))
        .route("/periods/:period_id/topline", get(topline_handler))
        .route("/shifts/:shift_id/signups", post(signup_handler))
        .route("/assignments/:assignment_id", delete(remove_assignment_handler))
        .with_state(state)
}

/// Handler for `GET /periods/:period_id/shifts`.
async fn list_shifts_handler(
    State(state): State<AppState>,
    period_id: Result<Path<PeriodId>, PathRejection>,
    query: Result<Query<ShiftQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(period_id) = match period_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, period_id = %period_id, "Listing shifts");

    let store = state.store();
    let filter = ShiftFilter::from(&query);
    match store.list_shifts(period_id, query.user_id.as_ref(), &filter) {
        Ok(shifts) => {
            info!(correlation_id = %correlation_id, count = shifts.len(), "Listed shifts");
            json_response(
                StatusCode::OK,
                ShiftListResponse {
                    shifts,
                    poll_interval_seconds: store.config().roster.poll_interval_seconds,
                },
            )
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `POST /shifts/:shift_id/signups`.
async fn signup_handler(
    State(state): State<AppState>,
    shift_id: Result<Path<ShiftId>, PathRejection>,
    payload: Result<Json<SignupBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(shift_id) = match shift_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        shift_id = %shift_id,
        user_id = %body.user_id,
        admin = body.admin,
        "Processing signup"
    );

    let start_time = Instant::now();
    let request = SignupRequest {
        shift_id,
        user_id: body.user_id.clone(),
        mode: body.mode(),
    };
    match state.store().signup(request) {
        Ok(assignment) => {
            info!(
                correlation_id = %correlation_id,
                assignment_id = %assignment.id,
                duration_us = start_time.elapsed().as_micros(),
                "Signup completed"
            );
            json_response(StatusCode::CREATED, assignment)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `DELETE /assignments/:assignment_id`.
async fn remove_assignment_handler(
    State(state): State<AppState>,
    assignment_id: Result<Path<AssignmentId>, PathRejection>,
    query: Result<Query<RemovalQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(assignment_id) = match assignment_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        assignment_id = %assignment_id,
        admin_override = query.admin_override,
        "Processing removal"
    );

    match state
        .store()
        .remove_assignment(assignment_id, query.admin_override)
    {
        Ok(removed) => json_response(StatusCode::OK, RemovalResponse { removed }),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `POST /periods/:period_id/phase`.
async fn change_phase_handler(
    State(state): State<AppState>,
    period_id: Result<Path<PeriodId>, PathRejection>,
    payload: Result<Json<PhaseChangeBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(period_id) = match period_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        period_id = %period_id,
        phase = %body.phase,
        "Processing phase change"
    );

    match state
        .store()
        .change_phase(period_id, body.phase, body.authority())
    {
        Ok(period) => json_response(StatusCode::OK, period),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /periods/:period_id/status`. Responds `null` for periods
/// without staggered picking.
async fn signup_status_handler(
    State(state): State<AppState>,
    period_id: Result<Path<PeriodId>, PathRejection>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(period_id) = match period_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, period_id = %period_id, user_id = %query.user_id, "Fetching signup status");

    match state.store().signup_status(period_id, &query.user_id) {
        Ok(status) => json_response(StatusCode::OK, status),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /periods/:period_id/topline`. Responds `null` when the
/// user has no obligation.
async fn topline_handler(
    State(state): State<AppState>,
    period_id: Result<Path<PeriodId>, PathRejection>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(period_id) = match period_id {
        Ok(path) => path,
        Err(rejection) => return path_error(correlation_id, rejection),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, period_id = %period_id, user_id = %query.user_id, "Fetching topline");

    match state.store().topline(period_id, &query.user_id) {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => engine_error(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    if err.is_signup_conflict() {
        warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
    } else {
        warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    }
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_error(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn path_error(correlation_id: Uuid, rejection: PathRejection) -> Response {
    let message = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %message, "Invalid path");
    json_response(StatusCode::BAD_REQUEST, ApiError::invalid_request(message))
}

fn query_error(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let message = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %message, "Invalid query string");
    json_response(StatusCode::BAD_REQUEST, ApiError::invalid_request(message))
}
