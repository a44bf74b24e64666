//! Error types for the work signup engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition a period, signup or removal operation can fail with.
//! Signup conflicts are expected, user-facing outcomes and carry enough data
//! to explain themselves (the current round limit, the time it next rises).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AssignmentId, JobId, PeriodId, PeriodPhase, ShiftId, UserId};

/// The main error type for the work signup engine.
///
/// # Example
///
/// ```
/// use work_signup_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period's configuration is inconsistent.
    #[error("Invalid period field '{field}': {message}")]
    InvalidPeriod {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested phase change is not allowed from the current phase.
    #[error("Cannot move period from {from} to {to}")]
    InvalidPhaseTransition {
        /// The phase the period was in.
        from: PeriodPhase,
        /// The phase that was requested.
        to: PeriodPhase,
    },

    /// No period with the given id exists.
    #[error("Period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// No job with the given id exists.
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// No shift with the given id exists.
    #[error("Shift not found: {0}")]
    ShiftNotFound(ShiftId),

    /// Worker signups are only accepted while the period is open.
    #[error("Signups are not open, the period is in the {phase} phase")]
    SignupsNotOpen {
        /// The period's phase at the time of the attempt.
        phase: PeriodPhase,
    },

    /// The user already holds a slot in this shift, or in a sibling shift of a
    /// job that forbids multiple shifts.
    #[error("User {user_id} is already signed up for job '{job_title}'")]
    AlreadySignedUp {
        /// The user who attempted the signup.
        user_id: UserId,
        /// The title of the job they already hold a shift for.
        job_title: String,
    },

    /// Every slot in the shift is taken.
    #[error("All {capacity} slots for shift {shift_id} are taken, someone beat you to it")]
    SlotsExceeded {
        /// The full shift.
        shift_id: ShiftId,
        /// The shift's slot count.
        capacity: u32,
    },

    /// Admitting the shift would push the worker past the current round limit.
    #[error(
        "Your round limit is {limit} hours and you have {assigned} hours; this shift adds {requested}{}",
        describe_next_increase(.next_limit, .next_increase_at)
    )]
    RoundLimitExceeded {
        /// The limit in force for the current round.
        limit: Decimal,
        /// Fixed-slot hours already held.
        assigned: Decimal,
        /// Hours the rejected shift would add.
        requested: Decimal,
        /// The limit that takes effect in the next round, if any.
        next_limit: Option<Decimal>,
        /// When the next round begins, if any.
        next_increase_at: Option<DateTime<Utc>>,
    },

    /// The cancellation cutoff for the assignment's shift has passed.
    #[error("Too late to cancel assignment {assignment_id}, the cutoff was {cutoff}")]
    TooLateToCancel {
        /// The assignment that could not be removed.
        assignment_id: AssignmentId,
        /// The last moment at which removal was allowed.
        cutoff: DateTime<Utc>,
    },

    /// Committed state would violate a data invariant; the transaction was aborted.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },
}

fn describe_next_increase(
    next_limit: &Option<Decimal>,
    next_increase_at: &Option<DateTime<Utc>>,
) -> String {
    match (next_limit, next_increase_at) {
        (Some(limit), Some(at)) => format!(
            ". The limit will rise to {} hours at {}",
            limit.normalize(),
            at.format("%Y-%m-%d %H:%M UTC")
        ),
        _ => String::new(),
    }
}

impl EngineError {
    /// Returns true for the expected, user-facing signup and cancellation
    /// outcomes. These are reported to the caller and never retried.
    pub fn is_signup_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::AlreadySignedUp { .. }
                | EngineError::SlotsExceeded { .. }
                | EngineError::RoundLimitExceeded { .. }
                | EngineError::TooLateToCancel { .. }
                | EngineError::SignupsNotOpen { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
