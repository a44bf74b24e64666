//! Shift listings with live rosters.
//!
//! Listings are built from committed state on every read. Clients poll for
//! freshness; nothing here caches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::EngineResult;
use crate::models::{AssignmentId, Job, JobId, PeriodId, Shift, ShiftId, SlotType, UserId};
use crate::store::WorkState;

/// Narrows a shift listing. All set conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftFilter {
    /// Only shifts of this job.
    pub job_id: Option<JobId>,
    /// Only shifts with a free slot.
    pub open_only: bool,
    /// Only shifts the viewer holds.
    pub mine: bool,
    /// Only shifts someone in the viewer's household holds.
    pub my_household: bool,
    /// Only shifts without draft-phase assignments.
    pub not_preassigned: bool,
    /// Case-insensitive text matched against job title and description.
    pub search: Option<String>,
}

/// One roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// The assignment.
    pub assignment_id: AssignmentId,
    /// Who holds the slot.
    pub user_id: UserId,
    /// True for draft-phase assignments.
    pub preassigned: bool,
}

/// A shift as shown to a worker picking jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftListing {
    /// The shift.
    pub shift_id: ShiftId,
    /// The shift's job.
    pub job_id: JobId,
    /// The job's title.
    pub job_title: String,
    /// The job's slot type.
    pub slot_type: SlotType,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    pub ends_at: DateTime<Utc>,
    /// Hours one slot is credited with.
    pub hours: Decimal,
    /// Slot count; `None` for pooled full-community shifts.
    pub capacity: Option<u32>,
    /// Slots taken.
    pub taken: u32,
    /// Free slots; `None` for pooled full-community shifts.
    pub open_slots: Option<u32>,
    /// Committed assignments in signup order.
    pub roster: Vec<RosterEntry>,
}

impl ShiftListing {
    fn new(job: &Job, shift: &Shift) -> Self {
        let pooled = job.is_full_community() && shift.capacity == Shift::POOLED_CAPACITY;
        Self {
            shift_id: shift.id,
            job_id: job.id,
            job_title: job.title.clone(),
            slot_type: job.slot_type,
            starts_at: shift.starts_at,
            ends_at: shift.ends_at,
            hours: shift.hours_for(job),
            capacity: (!pooled).then_some(shift.capacity),
            taken: shift.taken(),
            open_slots: (!pooled).then_some(shift.open_slots()),
            roster: shift
                .assignments()
                .iter()
                .map(|a| RosterEntry {
                    assignment_id: a.id,
                    user_id: a.user_id.clone(),
                    preassigned: a.preassigned,
                })
                .collect(),
        }
    }
}

/// Lists the period's shifts matching `filter`, ordered by start time and then
/// job title.
///
/// `household` is the viewer's household, used by `my_household`. Without a
/// viewer the `mine` and `my_household` conditions match nothing.
pub(crate) fn list_shifts(
    state: &WorkState,
    period_id: PeriodId,
    viewer: Option<&UserId>,
    household: &[UserId],
    filter: &ShiftFilter,
) -> EngineResult<Vec<ShiftListing>> {
    state.period(period_id)?;

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty());

    let mut matched: Vec<(&Job, &Shift)> = state
        .shifts_in(period_id)
        .filter(|(job, shift)| {
            filter.job_id.is_none_or(|id| job.id == id)
                && (!filter.open_only || !shift.is_full())
                && (!filter.mine || viewer.is_some_and(|user_id| shift.has_user(user_id)))
                && (!filter.my_household
                    || (viewer.is_some() && household.iter().any(|member| shift.has_user(member))))
                && (!filter.not_preassigned || !shift.has_preassigned())
                && search.is_none_or(|needle| job.matches_search(needle))
        })
        .collect();

    matched.sort_by(|(a_job, a), (b_job, b)| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a_job.title.cmp(&b_job.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(matched
        .into_iter()
        .map(|(job, shift)| ShiftListing::new(job, shift))
        .collect())
}
