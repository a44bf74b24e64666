//! The committed state guarded by the store's lock.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::events::WorkEvent;
use crate::models::{AssignmentId, Job, JobId, Period, PeriodId, Shift, ShiftId};
use crate::scheduling::Ledger;

/// Periods, jobs, shifts and their rosters, plus the event outbox.
///
/// Only code holding the store's write lock may mutate this.
#[derive(Debug, Default)]
pub(crate) struct WorkState {
    pub(crate) periods: HashMap<PeriodId, Period>,
    pub(crate) jobs: HashMap<JobId, Job>,
    pub(crate) shifts: HashMap<ShiftId, Shift>,
    pub(crate) assignment_index: HashMap<AssignmentId, ShiftId>,
    pub(crate) outbox: Vec<WorkEvent>,
}

impl WorkState {
    pub(crate) fn period(&self, id: PeriodId) -> EngineResult<&Period> {
        self.periods.get(&id).ok_or(EngineError::PeriodNotFound(id))
    }

    pub(crate) fn period_mut(&mut self, id: PeriodId) -> EngineResult<&mut Period> {
        self.periods.get_mut(&id).ok_or(EngineError::PeriodNotFound(id))
    }

    pub(crate) fn job(&self, id: JobId) -> EngineResult<&Job> {
        self.jobs.get(&id).ok_or(EngineError::JobNotFound(id))
    }

    pub(crate) fn shift(&self, id: ShiftId) -> EngineResult<&Shift> {
        self.shifts.get(&id).ok_or(EngineError::ShiftNotFound(id))
    }

    /// Resolves the job and period owning a shift.
    pub(crate) fn owners_of(&self, shift_id: ShiftId) -> EngineResult<(&Period, &Job, &Shift)> {
        let shift = self.shift(shift_id)?;
        let job = self.job(shift.job_id)?;
        let period = self.period(job.period_id)?;
        Ok((period, job, shift))
    }

    pub(crate) fn jobs_in(&self, period_id: PeriodId) -> impl Iterator<Item = &Job> + '_ {
        self.jobs.values().filter(move |job| job.period_id == period_id)
    }

    /// Returns every shift of the period with its job.
    pub(crate) fn shifts_in(&self, period_id: PeriodId) -> impl Iterator<Item = (&Job, &Shift)> + '_ {
        self.shifts.values().filter_map(move |shift| {
            let job = self.jobs.get(&shift.job_id)?;
            (job.period_id == period_id).then_some((job, shift))
        })
    }

    /// Snapshots the committed hours of a period.
    pub(crate) fn ledger(&self, period_id: PeriodId) -> Ledger {
        let mut ledger = Ledger::default();
        for (job, shift) in self.shifts_in(period_id) {
            ledger.record_shift(job, shift);
        }
        ledger
    }

    /// Deletes a period with its jobs, shifts and assignments.
    pub(crate) fn remove_period(&mut self, period_id: PeriodId) -> EngineResult<Period> {
        let period = self
            .periods
            .remove(&period_id)
            .ok_or(EngineError::PeriodNotFound(period_id))?;

        let job_ids: Vec<JobId> = self.jobs_in(period_id).map(|job| job.id).collect();
        self.jobs.retain(|_, job| job.period_id != period_id);

        let shift_ids: Vec<ShiftId> = self
            .shifts
            .values()
            .filter(|shift| job_ids.contains(&shift.job_id))
            .map(|shift| shift.id)
            .collect();
        for shift_id in &shift_ids {
            self.shifts.remove(shift_id);
        }
        self.assignment_index
            .retain(|_, shift_id| !shift_ids.contains(shift_id));

        Ok(period)
    }
}
