//! Response types for the work signup API.
//!
//! This module defines the success bodies, the error body, and the mapping
//! from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Assignment;
use crate::signup::ShiftListing;

/// Body of a shift listing.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftListResponse {
    /// Matching shifts with live rosters.
    pub shifts: Vec<ShiftListing>,
    /// How often clients should poll for roster changes.
    pub poll_interval_seconds: u64,
}

/// Body of an assignment removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalResponse {
    /// The removed assignment, or `null` when it was already gone.
    pub removed: Option<Assignment>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for an unparseable path or query string.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("INVALID_REQUEST", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidPeriod { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    format!("Check the period's '{}' setting", field),
                ),
            ),
            EngineError::InvalidPhaseTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("INVALID_PHASE_TRANSITION", message),
            ),
            EngineError::PeriodNotFound(_) => {
                (StatusCode::NOT_FOUND, ApiError::new("PERIOD_NOT_FOUND", message))
            }
            EngineError::JobNotFound(_) => {
                (StatusCode::NOT_FOUND, ApiError::new("JOB_NOT_FOUND", message))
            }
            EngineError::ShiftNotFound(_) => {
                (StatusCode::NOT_FOUND, ApiError::new("SHIFT_NOT_FOUND", message))
            }
            EngineError::SignupsNotOpen { .. } => {
                (StatusCode::CONFLICT, ApiError::new("SIGNUPS_NOT_OPEN", message))
            }
            EngineError::AlreadySignedUp { .. } => {
                (StatusCode::CONFLICT, ApiError::new("ALREADY_SIGNED_UP", message))
            }
            EngineError::SlotsExceeded { .. } => {
                (StatusCode::CONFLICT, ApiError::new("SLOTS_EXCEEDED", message))
            }
            EngineError::RoundLimitExceeded { next_increase_at, .. } => (
                StatusCode::CONFLICT,
                match next_increase_at {
                    Some(at) => ApiError::with_details(
                        "ROUND_LIMIT_EXCEEDED",
                        message,
                        format!("next_increase_at={}", at.to_rfc3339()),
                    ),
                    None => ApiError::new("ROUND_LIMIT_EXCEEDED", message),
                },
            ),
            EngineError::TooLateToCancel { .. } => {
                (StatusCode::CONFLICT, ApiError::new("TOO_LATE_TO_CANCEL", message))
            }
            EngineError::InvariantViolation { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "INVARIANT_VIOLATION",
                    "The change was aborted",
                    message,
                ),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodId, PeriodPhase, ShiftId, UserId};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api_error: ApiErrorResponse = EngineError::PeriodNotFound(PeriodId::new()).into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "PERIOD_NOT_FOUND");
    }

    #[test]
    fn test_signup_conflicts_map_to_409() {
        let cases = [
            (
                EngineError::SlotsExceeded {
                    shift_id: ShiftId::new(),
                    capacity: 1,
                },
                "SLOTS_EXCEEDED",
            ),
            (
                EngineError::AlreadySignedUp {
                    user_id: UserId::from("ada"),
                    job_title: "Knembler".to_string(),
                },
                "ALREADY_SIGNED_UP",
            ),
            (
                EngineError::InvalidPhaseTransition {
                    from: PeriodPhase::Draft,
                    to: PeriodPhase::Open,
                },
                "INVALID_PHASE_TRANSITION",
            ),
        ];

        for (error, code) in cases {
            let api_error: ApiErrorResponse = error.into();
            assert_eq!(api_error.status, StatusCode::CONFLICT);
            assert_eq!(api_error.error.code, code);
        }
    }

    #[test]
    fn test_round_limit_details_carry_next_increase() {
        let at = Utc.with_ymd_and_hms(2026, 2, 20, 12, 5, 0).unwrap();
        let api_error: ApiErrorResponse = EngineError::RoundLimitExceeded {
            limit: Decimal::from(11),
            assigned: Decimal::from(8),
            requested: Decimal::from(4),
            next_limit: Some(Decimal::from(22)),
            next_increase_at: Some(at),
        }
        .into();

        assert_eq!(api_error.error.code, "ROUND_LIMIT_EXCEEDED");
        assert!(api_error.error.message.contains("11"));
        assert_eq!(
            api_error.error.details.as_deref(),
            Some("next_increase_at=2026-02-20T12:05:00+00:00")
        );
    }

    #[test]
    fn test_invariant_violation_is_500() {
        let api_error: ApiErrorResponse = EngineError::InvariantViolation {
            message: "over-full shift".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
