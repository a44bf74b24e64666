//! Shift and assignment models.
//!
//! A [`Shift`] is a time-bounded instance of a [`Job`] with a fixed number of
//! slots. It owns its [`Assignment`]s in signup order; the store never lets
//! the roster grow past `capacity`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssignmentId, Job, JobId, ShiftId, UserId};

/// One user holding one slot of a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier for the assignment.
    pub id: AssignmentId,
    /// The shift whose slot is held.
    pub shift_id: ShiftId,
    /// The user holding the slot.
    pub user_id: UserId,
    /// True when created while the period was still in draft. Never recomputed.
    pub preassigned: bool,
    /// When the assignment was committed.
    pub created_at: DateTime<Utc>,
}

/// A time-bounded instance of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: ShiftId,
    /// The job this shift belongs to.
    pub job_id: JobId,
    /// The start time of the shift.
    pub starts_at: DateTime<Utc>,
    /// The end time of the shift.
    pub ends_at: DateTime<Utc>,
    /// Number of slots.
    pub capacity: u32,
    #[serde(default)]
    pub(crate) assignments: Vec<Assignment>,
}

impl Shift {
    /// Slot count given to pooled full-community shifts when none is specified.
    pub const POOLED_CAPACITY: u32 = 1_000_000;

    /// Creates an empty shift with the given number of slots.
    pub fn new(job: &Job, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>, capacity: u32) -> Self {
        Self {
            id: ShiftId::new(),
            job_id: job.id,
            starts_at,
            ends_at,
            capacity,
            assignments: Vec::new(),
        }
    }

    /// Creates an empty shift with [`Shift::POOLED_CAPACITY`] slots.
    pub fn pooled(job: &Job, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self::new(job, starts_at, ends_at, Self::POOLED_CAPACITY)
    }

    /// Returns the shift's length in hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use work_signup_engine::models::{Job, PeriodId, Shift, SlotType};
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let job = Job::new(PeriodId::new(), "Cleanup", Decimal::from(3), SlotType::FullCommunity);
    /// let shift = Shift::pooled(
    ///     &job,
    ///     Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2026, 3, 7, 11, 30, 0).unwrap(),
    /// );
    /// assert_eq!(shift.duration_hours(), Decimal::new(25, 1)); // 2.5 hours
    /// ```
    pub fn duration_hours(&self) -> Decimal {
        let minutes = (self.ends_at - self.starts_at).num_minutes();
        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }

    /// Returns the hours one assignment of this shift is credited with.
    ///
    /// Fixed-slot shifts credit the job's hours. Full-community shifts credit
    /// their own duration, which may differ between shifts of the same job.
    pub fn hours_for(&self, job: &Job) -> Decimal {
        if job.is_full_community() {
            self.duration_hours()
        } else {
            job.hours
        }
    }

    /// Returns the committed roster in signup order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns the number of taken slots.
    pub fn taken(&self) -> u32 {
        u32::try_from(self.assignments.len()).unwrap_or(u32::MAX)
    }

    /// Returns the number of free slots.
    pub fn open_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.taken())
    }

    /// Returns true when no slot is free.
    pub fn is_full(&self) -> bool {
        self.open_slots() == 0
    }

    /// Returns true when the user holds a slot.
    pub fn has_user(&self, user_id: &UserId) -> bool {
        self.assignments.iter().any(|a| &a.user_id == user_id)
    }

    /// Returns true when any slot was filled during the draft phase.
    pub fn has_preassigned(&self) -> bool {
        self.assignments.iter().any(|a| a.preassigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodId, SlotType};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 7, hour, minute, 0).unwrap()
    }

    fn fixed_job() -> Job {
        Job::new(PeriodId::new(), "Knembler", Decimal::from(4), SlotType::FixedSlot)
    }

    fn assignment(shift: &Shift, user: &str, preassigned: bool) -> Assignment {
        Assignment {
            id: AssignmentId::new(),
            shift_id: shift.id,
            user_id: UserId::from(user),
            preassigned,
            created_at: at(8, 0),
        }
    }

    #[test]
    fn test_fixed_slot_shift_credits_job_hours() {
        let job = fixed_job();
        let shift = Shift::new(&job, at(9, 0), at(10, 0), 2);
        assert_eq!(shift.hours_for(&job), Decimal::from(4));
    }

    #[test]
    fn test_full_community_shift_credits_own_duration() {
        let job = Job::new(PeriodId::new(), "Cleanup", Decimal::from(3), SlotType::FullCommunity);
        let shift = Shift::pooled(&job, at(9, 0), at(10, 15));
        assert_eq!(shift.hours_for(&job), Decimal::new(125, 2)); // 1.25
        assert_eq!(shift.capacity, Shift::POOLED_CAPACITY);
    }

    #[test]
    fn test_zero_duration_shift() {
        let job = fixed_job();
        let shift = Shift::new(&job, at(9, 0), at(9, 0), 1);
        assert_eq!(shift.duration_hours(), Decimal::ZERO);
    }

    #[test]
    fn test_slot_accounting() {
        let job = fixed_job();
        let mut shift = Shift::new(&job, at(9, 0), at(13, 0), 2);
        assert_eq!(shift.open_slots(), 2);
        assert!(!shift.is_full());

        let first = assignment(&shift, "ada", true);
        let second = assignment(&shift, "bo", false);
        shift.assignments.push(first);
        shift.assignments.push(second);

        assert_eq!(shift.taken(), 2);
        assert!(shift.is_full());
        assert!(shift.has_user(&UserId::from("ada")));
        assert!(!shift.has_user(&UserId::from("cy")));
        assert!(shift.has_preassigned());
    }

    #[test]
    fn test_shift_deserialization_defaults_to_empty_roster() {
        let json = format!(
            r#"{{
                "id": "{}",
                "job_id": "{}",
                "starts_at": "2026-03-07T09:00:00Z",
                "ends_at": "2026-03-07T13:00:00Z",
                "capacity": 3
            }}"#,
            ShiftId::new(),
            JobId::new()
        );
        let shift: Shift = serde_json::from_str(&json).unwrap();
        assert!(shift.assignments().is_empty());
        assert_eq!(shift.duration_hours(), Decimal::from(4));
    }
}
