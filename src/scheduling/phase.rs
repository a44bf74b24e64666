//! Period phase state machine.
//!
//! Phases move forward `draft → ready → open → published → archived`. Any
//! phase may be archived, and an admin may reopen a published or archived
//! period for corrections. The time-triggered `ready → open` promotion is a
//! conditional update: it only fires while the period is ready and due, so
//! repeating it is a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Period, PeriodPhase};

/// Who is asking for a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAuthority {
    /// A work coordinator running the normal lifecycle.
    #[default]
    Coordinator,
    /// An administrator, additionally allowed to reopen finished periods.
    Admin,
}

/// Checks whether `from → to` is allowed for the given authority.
///
/// # Examples
///
/// ```
/// use work_signup_engine::models::PeriodPhase;
/// use work_signup_engine::scheduling::{check_transition, TransitionAuthority};
///
/// assert!(check_transition(PeriodPhase::Draft, PeriodPhase::Ready, TransitionAuthority::Coordinator).is_ok());
/// assert!(check_transition(PeriodPhase::Published, PeriodPhase::Open, TransitionAuthority::Coordinator).is_err());
/// assert!(check_transition(PeriodPhase::Published, PeriodPhase::Open, TransitionAuthority::Admin).is_ok());
/// ```
pub fn check_transition(
    from: PeriodPhase,
    to: PeriodPhase,
    authority: TransitionAuthority,
) -> EngineResult<()> {
    use PeriodPhase::*;

    let allowed = match (from, to) {
        (Draft, Ready) | (Ready, Open) | (Open, Published) => true,
        (Archived, Archived) => false,
        (_, Archived) => true,
        (Published | Archived, Open) => authority == TransitionAuthority::Admin,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(EngineError::InvalidPhaseTransition { from, to })
    }
}

/// Moves the period to `to`, returning the phase it left.
///
/// Leaving draft locks the configuration, so `draft → ready` re-validates it.
pub fn transition(
    period: &mut Period,
    to: PeriodPhase,
    authority: TransitionAuthority,
) -> EngineResult<PeriodPhase> {
    let from = period.phase;
    check_transition(from, to, authority)?;
    if from == PeriodPhase::Draft {
        period.validate()?;
    }
    period.phase = to;
    Ok(from)
}

/// Opens a ready period whose auto-open time has passed.
///
/// Returns true only for the call that performed the promotion.
pub fn promote_if_due(period: &mut Period, now: DateTime<Utc>) -> bool {
    if period.is_due_to_open(now) {
        period.phase = PeriodPhase::Open;
        true
    } else {
        false
    }
}
