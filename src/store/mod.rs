//! The in-memory work store.
//!
//! [`WorkStore`] owns every period, job, shift and assignment behind one
//! `parking_lot::RwLock`. Listings, status and topline reads share the read
//! lock. Signups, removals and phase changes take the write lock and validate
//! and commit inside the same critical section, so concurrent attempts on the
//! last slot of a shift resolve to exactly one winner.
//!
//! Any operation that concerns a period first promotes it to open when it is
//! ready and past its auto-open time.

mod state;

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::directory::Directory;
use crate::error::{EngineError, EngineResult};
use crate::events::WorkEvent;
use crate::models::{
    Assignment, AssignmentId, Job, JobId, Period, PeriodId, PeriodPhase, Shift, ShiftId, UserId,
};
use crate::scheduling::{Topline, ToplineSummary, TransitionAuthority, promote_if_due, transition};
use crate::signup::{
    ShiftFilter, ShiftListing, SignupGate, SignupRequest, SignupStatus, list_shifts, signup_status,
};

pub(crate) use state::WorkState;

/// Shared, thread-safe store of work periods and their signups.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use work_signup_engine::clock::SystemClock;
/// use work_signup_engine::config::EngineConfig;
/// use work_signup_engine::directory::InMemoryDirectory;
/// use work_signup_engine::models::{Job, Period, PeriodPhase, Shift, SlotType, UserId};
/// use work_signup_engine::scheduling::TransitionAuthority;
/// use work_signup_engine::store::WorkStore;
/// use chrono::{Duration, NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let store = WorkStore::new(
///     Arc::new(SystemClock),
///     Arc::new(InMemoryDirectory::new()),
///     EngineConfig::default(),
/// );
/// let period = Period::new(
///     "Spring",
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
/// );
/// let period_id = store.add_period(period).unwrap();
/// let job = Job::new(period_id, "Dishes", Decimal::from(2), SlotType::FixedSlot);
/// let starts = Utc::now() + Duration::days(7);
/// let shift = Shift::new(&job, starts, starts + Duration::hours(2), 1);
/// store.add_job(job).unwrap();
/// let shift_id = store.add_shift(shift).unwrap();
///
/// store.change_phase(period_id, PeriodPhase::Ready, TransitionAuthority::Coordinator).unwrap();
/// store.change_phase(period_id, PeriodPhase::Open, TransitionAuthority::Coordinator).unwrap();
///
/// let assignment = store.attempt_signup(shift_id, UserId::from("ada")).unwrap();
/// assert!(!assignment.preassigned);
/// assert!(store.attempt_signup(shift_id, UserId::from("bob")).is_err());
/// ```
pub struct WorkStore {
    state: RwLock<WorkState>,
    clock: Arc<dyn Clock>,
    directory: Arc<dyn Directory>,
    config: EngineConfig,
}

impl WorkStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>, directory: Arc<dyn Directory>, config: EngineConfig) -> Self {
        Self {
            state: RwLock::new(WorkState::default()),
            clock,
            directory,
            config,
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the store's clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns the household and share directory.
    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    /// Adds a period after validating it.
    pub fn add_period(&self, period: Period) -> EngineResult<PeriodId> {
        period.validate()?;
        let id = period.id;
        info!(period_id = %id, name = %period.name, phase = %period.phase(), "Adding period");
        self.state.write().periods.insert(id, period);
        Ok(id)
    }

    /// Adds a job to an existing period.
    pub fn add_job(&self, job: Job) -> EngineResult<JobId> {
        if job.hours < Decimal::ZERO {
            return Err(EngineError::InvariantViolation {
                message: format!("job '{}' has negative hours", job.title),
            });
        }
        let mut state = self.state.write();
        check_not_archived(state.period(job.period_id)?)?;
        let id = job.id;
        debug!(job_id = %id, period_id = %job.period_id, title = %job.title, "Adding job");
        state.jobs.insert(id, job);
        Ok(id)
    }

    /// Adds an empty shift to an existing job.
    pub fn add_shift(&self, shift: Shift) -> EngineResult<ShiftId> {
        if shift.capacity == 0 {
            return Err(EngineError::InvariantViolation {
                message: format!("shift {} must have at least one slot", shift.id),
            });
        }
        if shift.ends_at < shift.starts_at {
            return Err(EngineError::InvariantViolation {
                message: format!("shift {} ends before it starts", shift.id),
            });
        }
        if !shift.assignments().is_empty() {
            return Err(EngineError::InvariantViolation {
                message: format!("shift {} must be added without assignments", shift.id),
            });
        }

        let mut state = self.state.write();
        let job = state.job(shift.job_id)?;
        check_not_archived(state.period(job.period_id)?)?;
        let id = shift.id;
        debug!(shift_id = %id, job_id = %shift.job_id, starts_at = %shift.starts_at, "Adding shift");
        state.shifts.insert(id, shift);
        Ok(id)
    }

    /// Deletes a period together with its jobs, shifts and assignments.
    pub fn remove_period(&self, period_id: PeriodId) -> EngineResult<Period> {
        let mut state = self.state.write();
        let period = state.remove_period(period_id)?;
        state.outbox.push(WorkEvent::PeriodRemoved { period_id });
        info!(period_id = %period_id, "Removed period");
        Ok(period)
    }

    /// Returns a snapshot of the period.
    pub fn period(&self, period_id: PeriodId) -> EngineResult<Period> {
        self.observe_period(period_id)?;
        Ok(self.state.read().period(period_id)?.clone())
    }

    /// Returns a snapshot of the job.
    pub fn job(&self, job_id: JobId) -> EngineResult<Job> {
        Ok(self.state.read().job(job_id)?.clone())
    }

    /// Returns a snapshot of the shift with its roster.
    pub fn shift(&self, shift_id: ShiftId) -> EngineResult<Shift> {
        let period_id = self.period_of_shift(shift_id)?;
        self.observe_period(period_id)?;
        Ok(self.state.read().shift(shift_id)?.clone())
    }

    /// Applies a manual phase change.
    pub fn change_phase(
        &self,
        period_id: PeriodId,
        to: PeriodPhase,
        authority: TransitionAuthority,
    ) -> EngineResult<Period> {
        let now = self.clock.now();
        let mut state = self.state.write();
        let period = state.period_mut(period_id)?;
        let from = match transition(period, to, authority) {
            Ok(from) => from,
            Err(e) => {
                warn!(period_id = %period_id, error = %e, "Rejected phase change");
                return Err(e);
            }
        };
        let snapshot = period.clone();
        state.outbox.push(WorkEvent::PhaseChanged {
            period_id,
            from,
            to,
            automatic: false,
            at: now,
        });
        info!(period_id = %period_id, from = %from, to = %to, "Period phase changed");
        Ok(snapshot)
    }

    /// Promotes the period to open if it is ready and due, returning its phase.
    ///
    /// Repeated calls after the promotion change nothing.
    pub fn observe_period(&self, period_id: PeriodId) -> EngineResult<PeriodPhase> {
        let now = self.clock.now();
        {
            let state = self.state.read();
            let period = state.period(period_id)?;
            if !period.is_due_to_open(now) {
                return Ok(period.phase());
            }
        }
        let mut state = self.state.write();
        promote_locked(&mut state, period_id, now)?;
        Ok(state.period(period_id)?.phase())
    }

    /// Promotes every due period, returning the ones this call opened.
    pub fn promote_due_periods(&self) -> Vec<PeriodId> {
        let now = self.clock.now();
        let due: Vec<PeriodId> = {
            let state = self.state.read();
            state
                .periods
                .values()
                .filter(|p| p.is_due_to_open(now))
                .map(|p| p.id)
                .collect()
        };
        if due.is_empty() {
            return due;
        }

        let mut state = self.state.write();
        due.into_iter()
            .filter(|id| matches!(promote_locked(&mut state, *id, now), Ok(true)))
            .collect()
    }

    /// Signs a worker up for one slot of a shift.
    pub fn attempt_signup(&self, shift_id: ShiftId, user_id: UserId) -> EngineResult<Assignment> {
        self.signup(SignupRequest::worker(shift_id, user_id))
    }

    /// Places a user on a shift administratively, without round gating.
    pub fn assign(&self, shift_id: ShiftId, user_id: UserId) -> EngineResult<Assignment> {
        self.signup(SignupRequest::admin(shift_id, user_id))
    }

    /// Validates and commits a signup in one critical section.
    pub fn signup(&self, request: SignupRequest) -> EngineResult<Assignment> {
        let now = self.clock.now();
        let gate = SignupGate::new(self.directory.as_ref(), &self.config.signup);

        let mut state = self.state.write();
        let period_id = state.owners_of(request.shift_id)?.0.id;
        promote_locked(&mut state, period_id, now)?;

        match gate.attempt(&mut state, &request, now) {
            Ok(assignment) => {
                info!(
                    assignment_id = %assignment.id,
                    shift_id = %request.shift_id,
                    user_id = %request.user_id,
                    mode = ?request.mode,
                    preassigned = assignment.preassigned,
                    "Signup committed"
                );
                Ok(assignment)
            }
            Err(e) => {
                warn!(
                    shift_id = %request.shift_id,
                    user_id = %request.user_id,
                    error = %e,
                    "Signup rejected"
                );
                Err(e)
            }
        }
    }

    /// Releases a slot. Returns `Ok(None)` if the assignment no longer exists.
    pub fn remove_assignment(
        &self,
        assignment_id: AssignmentId,
        admin_override: bool,
    ) -> EngineResult<Option<Assignment>> {
        let now = self.clock.now();
        let gate = SignupGate::new(self.directory.as_ref(), &self.config.signup);

        let mut state = self.state.write();
        if let Some(&shift_id) = state.assignment_index.get(&assignment_id) {
            let period_id = state.owners_of(shift_id)?.0.id;
            promote_locked(&mut state, period_id, now)?;
        }

        let removed = gate.remove(&mut state, assignment_id, now, admin_override);
        match &removed {
            Ok(Some(assignment)) => info!(
                assignment_id = %assignment_id,
                shift_id = %assignment.shift_id,
                user_id = %assignment.user_id,
                admin_override,
                "Assignment removed"
            ),
            Ok(None) => debug!(assignment_id = %assignment_id, "Assignment already removed"),
            Err(e) => warn!(assignment_id = %assignment_id, error = %e, "Removal rejected"),
        }
        removed
    }

    /// Lists a period's shifts with live rosters.
    pub fn list_shifts(
        &self,
        period_id: PeriodId,
        viewer: Option<&UserId>,
        filter: &ShiftFilter,
    ) -> EngineResult<Vec<ShiftListing>> {
        self.observe_period(period_id)?;
        let household = viewer
            .map(|user_id| self.directory.household_members(user_id))
            .unwrap_or_default();
        let state = self.state.read();
        list_shifts(&state, period_id, viewer, &household, filter)
    }

    /// Returns the user's round-limit status, or `None` for unstaggered periods.
    pub fn signup_status(
        &self,
        period_id: PeriodId,
        user_id: &UserId,
    ) -> EngineResult<Option<SignupStatus>> {
        self.observe_period(period_id)?;
        let now = self.clock.now();
        let state = self.state.read();
        let period = state.period(period_id)?;
        let ledger = state.ledger(period_id);
        signup_status(
            period,
            &ledger,
            self.directory.as_ref(),
            user_id,
            now,
            &self.config.display,
        )
    }

    /// Returns the user's quota obligations, or `None` when they have none.
    pub fn topline(&self, period_id: PeriodId, user_id: &UserId) -> EngineResult<Option<ToplineSummary>> {
        self.observe_period(period_id)?;
        let state = self.state.read();
        let period = state.period(period_id)?;
        let ledger = state.ledger(period_id);
        Topline::new(period, state.jobs_in(period_id), &ledger, self.directory.as_ref())
            .with_regular_title(self.config.display.regular_bucket_title.clone())
            .summary(user_id)
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<WorkEvent> {
        std::mem::take(&mut self.state.write().outbox)
    }

    fn period_of_shift(&self, shift_id: ShiftId) -> EngineResult<PeriodId> {
        Ok(self.state.read().owners_of(shift_id)?.0.id)
    }
}

/// Conditional `ready → open` promotion for a caller holding the write lock.
fn promote_locked(
    state: &mut WorkState,
    period_id: PeriodId,
    now: chrono::DateTime<chrono::Utc>,
) -> EngineResult<bool> {
    let period = state.period_mut(period_id)?;
    if !promote_if_due(period, now) {
        return Ok(false);
    }
    state.outbox.push(WorkEvent::PhaseChanged {
        period_id,
        from: PeriodPhase::Ready,
        to: PeriodPhase::Open,
        automatic: true,
        at: now,
    });
    info!(period_id = %period_id, "Period auto-opened");
    Ok(true)
}

fn check_not_archived(period: &Period) -> EngineResult<()> {
    if period.phase() == PeriodPhase::Archived {
        return Err(EngineError::InvalidPeriod {
            field: "phase".to_string(),
            message: "archived periods are read-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::directory::InMemoryDirectory;
    use crate::models::{QuotaType, Share, SlotType, Staggering};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn opens_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::from(id)
    }

    fn store_at(now: DateTime<Utc>) -> (WorkStore, Arc<FixedClock>, Arc<InMemoryDirectory>) {
        let clock = Arc::new(FixedClock::new(now));
        let directory = Arc::new(InMemoryDirectory::new());
        let store = WorkStore::new(clock.clone(), directory.clone(), EngineConfig::default());
        (store, clock, directory)
    }

    fn staggered_period() -> Period {
        Period::new(
            "Spring",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
        .with_quota(QuotaType::ByPerson, Decimal::from(32))
        .with_auto_open_time(opens_at())
        .with_staggering(Staggering {
            workers_per_round: 3,
            round_duration_minutes: 5,
            max_rounds_per_worker: 3,
        })
    }

    fn add_shift(store: &WorkStore, period_id: PeriodId, capacity: u32) -> ShiftId {
        let job = Job::new(period_id, "Knembler", Decimal::from(4), SlotType::FixedSlot);
        let starts = Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();
        let shift = Shift::new(&job, starts, starts + Duration::hours(4), capacity);
        store.add_job(job).unwrap();
        store.add_shift(shift).unwrap()
    }

    #[test]
    fn test_add_period_rejects_invalid() {
        let (store, _, _) = store_at(opens_at());
        let period = staggered_period().with_quota(QuotaType::None, Decimal::ZERO);
        assert!(matches!(
            store.add_period(period),
            Err(EngineError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_add_shift_rejects_zero_capacity_and_unknown_job() {
        let (store, _, _) = store_at(opens_at());
        let period_id = store.add_period(staggered_period()).unwrap();
        let job = Job::new(period_id, "Knembler", Decimal::from(4), SlotType::FixedSlot);
        let starts = opens_at() + Duration::days(10);

        let empty = Shift::new(&job, starts, starts + Duration::hours(4), 0);
        assert!(matches!(
            store.add_shift(empty),
            Err(EngineError::InvariantViolation { .. })
        ));

        let orphan = Shift::new(&job, starts, starts + Duration::hours(4), 1);
        assert!(matches!(store.add_shift(orphan), Err(EngineError::JobNotFound(_))));
    }

    #[test]
    fn test_ready_period_auto_opens_once() {
        let (store, clock, _) = store_at(opens_at() - Duration::minutes(1));
        let period_id = store.add_period(staggered_period()).unwrap();
        store
            .change_phase(period_id, PeriodPhase::Ready, TransitionAuthority::Coordinator)
            .unwrap();
        store.drain_events();

        assert_eq!(store.observe_period(period_id).unwrap(), PeriodPhase::Ready);

        clock.set(opens_at());
        assert_eq!(store.observe_period(period_id).unwrap(), PeriodPhase::Open);
        assert_eq!(store.observe_period(period_id).unwrap(), PeriodPhase::Open);
        assert!(store.promote_due_periods().is_empty());

        let events = store.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            WorkEvent::PhaseChanged { automatic: true, to: PeriodPhase::Open, .. }
        ));
    }

    #[test]
    fn test_signup_observes_promotion() {
        let (store, clock, directory) = store_at(opens_at() - Duration::minutes(1));
        let period_id = store.add_period(staggered_period()).unwrap();
        directory.set_share(Share::single_adult(period_id, user("ada")));
        let shift_id = add_shift(&store, period_id, 2);
        store
            .change_phase(period_id, PeriodPhase::Ready, TransitionAuthority::Coordinator)
            .unwrap();

        assert!(matches!(
            store.attempt_signup(shift_id, user("ada")),
            Err(EngineError::SignupsNotOpen { phase: PeriodPhase::Ready })
        ));

        clock.set(opens_at());
        assert!(store.attempt_signup(shift_id, user("ada")).is_ok());
        assert!(store.period(period_id).unwrap().is_open());
    }

    #[test]
    fn test_promote_due_periods_reports_each_once() {
        let (store, clock, _) = store_at(opens_at() - Duration::minutes(1));
        let first = store.add_period(staggered_period()).unwrap();
        let second = store.add_period(staggered_period()).unwrap();
        for id in [first, second] {
            store
                .change_phase(id, PeriodPhase::Ready, TransitionAuthority::Coordinator)
                .unwrap();
        }

        clock.set(opens_at() + Duration::minutes(1));
        let mut opened = store.promote_due_periods();
        opened.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(opened, expected);
        assert!(store.promote_due_periods().is_empty());
    }

    #[test]
    fn test_draft_assignment_is_preassigned_and_survives_open() {
        let (store, _, directory) = store_at(opens_at() - Duration::days(1));
        let period_id = store.add_period(staggered_period()).unwrap();
        directory.set_share(Share::single_adult(period_id, user("ada")));
        let shift_id = add_shift(&store, period_id, 2);

        let assignment = store.assign(shift_id, user("ada")).unwrap();
        assert!(assignment.preassigned);

        store
            .change_phase(period_id, PeriodPhase::Ready, TransitionAuthority::Coordinator)
            .unwrap();
        store
            .change_phase(period_id, PeriodPhase::Open, TransitionAuthority::Coordinator)
            .unwrap();
        let shift = store.shift(shift_id).unwrap();
        assert!(shift.assignments()[0].preassigned);
    }

    #[test]
    fn test_remove_period_cascades_and_records_event() {
        let (store, _, _) = store_at(opens_at());
        let period_id = store.add_period(staggered_period()).unwrap();
        let shift_id = add_shift(&store, period_id, 1);

        store.remove_period(period_id).unwrap();
        assert!(matches!(store.shift(shift_id), Err(EngineError::ShiftNotFound(_))));
        assert!(matches!(
            store.drain_events().last(),
            Some(WorkEvent::PeriodRemoved { .. })
        ));
    }

    #[test]
    fn test_invalid_phase_change_leaves_period_untouched() {
        let (store, _, _) = store_at(opens_at());
        let period_id = store.add_period(staggered_period()).unwrap();

        assert!(matches!(
            store.change_phase(period_id, PeriodPhase::Published, TransitionAuthority::Coordinator),
            Err(EngineError::InvalidPhaseTransition { .. })
        ));
        assert_eq!(store.period(period_id).unwrap().phase(), PeriodPhase::Draft);
        assert!(store.drain_events().is_empty());
    }
}
