//! Committed hours for one period, flattened for quota arithmetic.
//!
//! A [`Ledger`] is a snapshot of every committed assignment in a period with
//! the hours it is credited. The round scheduler and the topline both sum over
//! it; neither needs to know how shifts and jobs are stored.

use rust_decimal::Decimal;

use crate::models::{Job, JobId, Shift, SlotType, UserId};

/// One committed assignment and the hours it counts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The user holding the slot.
    pub user_id: UserId,
    /// The job the shift belongs to.
    pub job_id: JobId,
    /// The job's slot type.
    pub slot_type: SlotType,
    /// Hours credited for this assignment.
    pub hours: Decimal,
}

/// Committed hours for a period.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Creates a ledger from explicit entries.
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Adds every assignment of `shift` to the ledger.
    pub fn record_shift(&mut self, job: &Job, shift: &Shift) {
        let hours = shift.hours_for(job);
        self.entries
            .extend(shift.assignments().iter().map(|assignment| LedgerEntry {
                user_id: assignment.user_id.clone(),
                job_id: job.id,
                slot_type: job.slot_type,
                hours,
            }));
    }

    /// Returns all entries.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Sums fixed-slot hours held by any of `users`.
    pub fn fixed_slot_hours(&self, users: &[UserId]) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.slot_type == SlotType::FixedSlot && users.contains(&e.user_id))
            .map(|e| e.hours)
            .sum()
    }

    /// Sums hours of one job held by any of `users`.
    pub fn job_hours(&self, job_id: JobId, users: &[UserId]) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.job_id == job_id && users.contains(&e.user_id))
            .map(|e| e.hours)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, job_id: JobId, slot_type: SlotType, hours: i64) -> LedgerEntry {
        LedgerEntry {
            user_id: UserId::from(user),
            job_id,
            slot_type,
            hours: Decimal::from(hours),
        }
    }

    #[test]
    fn test_fixed_slot_hours_skip_full_community() {
        let fixed = JobId::new();
        let pooled = JobId::new();
        let ledger = Ledger::new(vec![
            entry("ada", fixed, SlotType::FixedSlot, 4),
            entry("ada", pooled, SlotType::FullCommunity, 2),
            entry("bo", fixed, SlotType::FixedSlot, 4),
        ]);

        assert_eq!(ledger.fixed_slot_hours(&[UserId::from("ada")]), Decimal::from(4));
        assert_eq!(
            ledger.fixed_slot_hours(&[UserId::from("ada"), UserId::from("bo")]),
            Decimal::from(8)
        );
    }

    #[test]
    fn test_job_hours_restricted_to_job() {
        let pooled = JobId::new();
        let other = JobId::new();
        let ledger = Ledger::new(vec![
            entry("ada", pooled, SlotType::FullCommunity, 2),
            entry("ada", pooled, SlotType::FullCommunity, 3),
            entry("ada", other, SlotType::FullCommunity, 7),
        ]);

        assert_eq!(ledger.job_hours(pooled, &[UserId::from("ada")]), Decimal::from(5));
        assert_eq!(ledger.job_hours(pooled, &[UserId::from("bo")]), Decimal::ZERO);
    }
}
