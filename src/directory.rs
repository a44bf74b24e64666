//! Household and share directory.
//!
//! Users, households and shares live outside the engine. The engine only asks
//! the [`Directory`] who shares a household with a user and what portion of
//! the quota each user carries for a period.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::models::{HouseholdId, PeriodId, Share, UserId};

/// Read-only view of household membership and share portions.
pub trait Directory: Send + Sync {
    /// Returns every member of the user's household, the user included.
    ///
    /// A user the directory does not know is treated as a household of one.
    fn household_members(&self, user_id: &UserId) -> Vec<UserId>;

    /// Returns the user's share portion for the period, zero when none is recorded.
    fn share_portion(&self, period_id: PeriodId, user_id: &UserId) -> Decimal;

    /// Sums the share portions of `users` for the period.
    fn total_share(&self, period_id: PeriodId, users: &[UserId]) -> Decimal {
        users
            .iter()
            .map(|user_id| self.share_portion(period_id, user_id))
            .sum()
    }
}

/// A [`Directory`] held in memory, used by tests and the HTTP adapter.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    households: RwLock<HashMap<UserId, HouseholdId>>,
    shares: RwLock<HashMap<(PeriodId, UserId), Decimal>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the user as a member of the household.
    pub fn add_member(&self, household_id: HouseholdId, user_id: UserId) {
        self.households.write().insert(user_id, household_id);
    }

    /// Records or replaces a share.
    pub fn set_share(&self, share: Share) {
        self.shares
            .write()
            .insert((share.period_id, share.user_id), share.portion);
    }
}

impl Directory for InMemoryDirectory {
    fn household_members(&self, user_id: &UserId) -> Vec<UserId> {
        let households = self.households.read();
        let Some(household_id) = households.get(user_id) else {
            return vec![user_id.clone()];
        };
        let mut members: Vec<UserId> = households
            .iter()
            .filter(|(_, h)| *h == household_id)
            .map(|(u, _)| u.clone())
            .collect();
        members.sort();
        members
    }

    fn share_portion(&self, period_id: PeriodId, user_id: &UserId) -> Decimal {
        self.shares
            .read()
            .get(&(period_id, user_id.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
