//! The signup gate.
//!
//! [`SignupGate::attempt`] validates and commits in one pass over a state the
//! caller holds exclusively, so a check can never go stale before its commit.
//! Checks run in a fixed order: phase, duplicates, capacity, round limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SignupSettings;
use crate::directory::Directory;
use crate::error::{EngineError, EngineResult};
use crate::events::WorkEvent;
use crate::models::{Assignment, AssignmentId, Job, Period, PeriodPhase, Shift, ShiftId, UserId};
use crate::scheduling::RoundScheduler;
use crate::store::WorkState;

use super::{quota_scope, regular_target};

/// Who is taking the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupMode {
    /// A worker picking for themselves. Needs an open period and is round gated.
    #[default]
    Worker,
    /// A coordinator placing someone, including draft-phase preassignment.
    /// Skips round gating but not duplicate or capacity checks.
    Admin,
}

/// A request for one slot of one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    /// The shift to join.
    pub shift_id: ShiftId,
    /// The user taking the slot.
    pub user_id: UserId,
    /// Worker or admin path.
    pub mode: SignupMode,
}

impl SignupRequest {
    /// Creates a worker signup.
    pub fn worker(shift_id: ShiftId, user_id: UserId) -> Self {
        Self {
            shift_id,
            user_id,
            mode: SignupMode::Worker,
        }
    }

    /// Creates an administrative assignment.
    pub fn admin(shift_id: ShiftId, user_id: UserId) -> Self {
        Self {
            shift_id,
            user_id,
            mode: SignupMode::Admin,
        }
    }
}

/// Admits and removes assignments.
pub struct SignupGate<'a> {
    directory: &'a dyn Directory,
    settings: &'a SignupSettings,
}

impl<'a> SignupGate<'a> {
    /// Creates a gate reading households and shares from `directory`.
    pub fn new(directory: &'a dyn Directory, settings: &'a SignupSettings) -> Self {
        Self { directory, settings }
    }

    /// Validates the request against committed state and commits it.
    ///
    /// On any error the state is left untouched.
    pub(crate) fn attempt(
        &self,
        state: &mut WorkState,
        request: &SignupRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<Assignment> {
        let (period, job, shift) = state.owners_of(request.shift_id)?;
        let user_id = &request.user_id;

        check_phase(period.phase(), request.mode)?;

        if shift.taken() > shift.capacity {
            return Err(EngineError::InvariantViolation {
                message: format!(
                    "shift {} holds {} assignments for {} slots",
                    shift.id,
                    shift.taken(),
                    shift.capacity
                ),
            });
        }

        if shift.has_user(user_id)
            || (!job.multiple_shifts_allowed && holds_sibling_shift(state, job, shift, user_id))
        {
            return Err(EngineError::AlreadySignedUp {
                user_id: user_id.clone(),
                job_title: job.title.clone(),
            });
        }

        if shift.is_full() {
            return Err(EngineError::SlotsExceeded {
                shift_id: shift.id,
                capacity: shift.capacity,
            });
        }

        if request.mode == SignupMode::Worker && job.is_fixed_slot() {
            self.check_round_limit(state, period, job, user_id, now)?;
        }

        let assignment = Assignment {
            id: AssignmentId::new(),
            shift_id: shift.id,
            user_id: user_id.clone(),
            preassigned: period.is_draft(),
            created_at: now,
        };
        let (period_id, job_id) = (period.id, job.id);

        let shift = state
            .shifts
            .get_mut(&request.shift_id)
            .ok_or(EngineError::ShiftNotFound(request.shift_id))?;
        shift.assignments.push(assignment.clone());
        state.assignment_index.insert(assignment.id, assignment.shift_id);
        state.outbox.push(WorkEvent::AssignmentCreated {
            period_id,
            job_id,
            assignment: assignment.clone(),
        });

        Ok(assignment)
    }

    /// Removes an assignment.
    ///
    /// Returns `Ok(None)` when the assignment does not exist, so repeating a
    /// removal is harmless. Without `admin_override` the period must be open
    /// and the shift's cancellation cutoff must not have passed.
    pub(crate) fn remove(
        &self,
        state: &mut WorkState,
        assignment_id: AssignmentId,
        now: DateTime<Utc>,
        admin_override: bool,
    ) -> EngineResult<Option<Assignment>> {
        let Some(&shift_id) = state.assignment_index.get(&assignment_id) else {
            return Ok(None);
        };
        let (period, job, shift) = state.owners_of(shift_id)?;

        let phase = period.phase();
        if phase == PeriodPhase::Archived || (!admin_override && phase != PeriodPhase::Open) {
            return Err(EngineError::SignupsNotOpen { phase });
        }

        if !admin_override {
            let cutoff = shift.starts_at - self.settings.cancellation_cutoff();
            if now >= cutoff {
                return Err(EngineError::TooLateToCancel {
                    assignment_id,
                    cutoff,
                });
            }
        }
        let (period_id, job_id) = (period.id, job.id);

        let shift = state
            .shifts
            .get_mut(&shift_id)
            .ok_or(EngineError::ShiftNotFound(shift_id))?;
        let Some(position) = shift.assignments.iter().position(|a| a.id == assignment_id) else {
            state.assignment_index.remove(&assignment_id);
            return Ok(None);
        };
        let assignment = shift.assignments.remove(position);
        state.assignment_index.remove(&assignment_id);
        state.outbox.push(WorkEvent::AssignmentRemoved {
            period_id,
            job_id,
            assignment: assignment.clone(),
            at: now,
        });

        Ok(Some(assignment))
    }

    fn check_round_limit(
        &self,
        state: &WorkState,
        period: &Period,
        job: &Job,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        if !period.is_staggered() {
            return Ok(());
        }
        let users = quota_scope(period, user_id, self.directory);
        let target = regular_target(period, &users, self.directory)?;
        let Some(scheduler) = RoundScheduler::for_period(period, target) else {
            return Ok(());
        };

        let assigned = state.ledger(period.id).fixed_slot_hours(&users);
        debug!(
            user_id = %user_id,
            assigned = %assigned,
            requested = %job.hours,
            limit = %scheduler.limit_at(now),
            "Checking round limit"
        );
        scheduler.check(now, assigned, job.hours)
    }
}

fn check_phase(phase: PeriodPhase, mode: SignupMode) -> EngineResult<()> {
    let allowed = match mode {
        SignupMode::Worker => phase == PeriodPhase::Open,
        SignupMode::Admin => phase != PeriodPhase::Archived,
    };
    if allowed {
        Ok(())
    } else {
        Err(EngineError::SignupsNotOpen { phase })
    }
}

fn holds_sibling_shift(state: &WorkState, job: &Job, shift: &Shift, user_id: &UserId) -> bool {
    state
        .shifts
        .values()
        .any(|other| other.job_id == job.id && other.id != shift.id && other.has_user(user_id))
}
