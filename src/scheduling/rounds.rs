//! Staggered admission rounds.
//!
//! When a staggered period opens, the hours of fixed-slot work a worker (or
//! household) may hold rise in steps. Round `k` starts `k - 1` round durations
//! after the auto-open time and allows `ceil(quota × k / R)` hours, where `R`
//! is the number of rounds. From round `R` on the limit is the whole quota.
//!
//! Every worker computes their own round from the shared clock; there is no
//! admission queue. `workers_per_round` only feeds messaging.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Period, Staggering};

/// Computes round limits for one worker's (or household's) quota target.
///
/// # Example
///
/// ```
/// use work_signup_engine::models::Staggering;
/// use work_signup_engine::scheduling::RoundScheduler;
/// use chrono::{Duration, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let opens_at = Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap();
/// let staggering = Staggering { workers_per_round: 3, round_duration_minutes: 5, max_rounds_per_worker: 3 };
/// let scheduler = RoundScheduler::new(Decimal::from(32), opens_at, &staggering);
///
/// assert_eq!(scheduler.limit_at(opens_at), Decimal::from(11));
/// assert_eq!(scheduler.limit_at(opens_at + Duration::minutes(5)), Decimal::from(22));
/// assert_eq!(scheduler.limit_at(opens_at + Duration::minutes(10)), Decimal::from(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScheduler {
    quota: Decimal,
    opens_at: DateTime<Utc>,
    round_duration: Duration,
    max_rounds: u32,
    workers_per_round: u32,
}

impl RoundScheduler {
    /// Creates a scheduler for `quota` target hours.
    pub fn new(quota: Decimal, opens_at: DateTime<Utc>, staggering: &Staggering) -> Self {
        Self {
            quota,
            opens_at,
            round_duration: Duration::minutes(i64::from(staggering.round_duration_minutes.max(1))),
            max_rounds: staggering.max_rounds_per_worker.max(1),
            workers_per_round: staggering.workers_per_round,
        }
    }

    /// Creates a scheduler for a staggered period, or `None` for free-for-all
    /// periods and periods without an auto-open time.
    pub fn for_period(period: &Period, quota: Decimal) -> Option<Self> {
        let staggering = period.staggering()?;
        let opens_at = period.auto_open_time?;
        Some(Self::new(quota, opens_at, staggering))
    }

    /// The quota target being staggered.
    pub fn quota(&self) -> Decimal {
        self.quota
    }

    /// When round one starts.
    pub fn opens_at(&self) -> DateTime<Utc> {
        self.opens_at
    }

    /// Number of rounds until the limit reaches the quota.
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Advisory round size, for messaging.
    pub fn workers_per_round(&self) -> u32 {
        self.workers_per_round
    }

    /// Returns the round in force at `now`, or `None` before round one starts.
    pub fn round_at(&self, now: DateTime<Utc>) -> Option<u32> {
        if now < self.opens_at {
            return None;
        }
        let elapsed = (now - self.opens_at).num_seconds();
        let completed = elapsed / self.round_duration.num_seconds();
        let round = u32::try_from(completed.saturating_add(1)).unwrap_or(u32::MAX);
        Some(round.min(self.max_rounds))
    }

    /// Returns the round used for gating. A period opened by hand before its
    /// auto-open time is gated as round one.
    pub fn effective_round(&self, now: DateTime<Utc>) -> u32 {
        self.round_at(now).unwrap_or(1)
    }

    /// Returns the hour limit for `round`, clamped to `1..=max_rounds`.
    pub fn limit(&self, round: u32) -> Decimal {
        let round = round.clamp(1, self.max_rounds);
        (self.quota * Decimal::from(round) / Decimal::from(self.max_rounds)).ceil()
    }

    /// Returns the hour limit in force at `now`.
    pub fn limit_at(&self, now: DateTime<Utc>) -> Decimal {
        self.limit(self.effective_round(now))
    }

    /// Returns when the next higher limit takes effect, or `None` in the final round.
    pub fn next_round_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let round = self.effective_round(now);
        if round >= self.max_rounds {
            return None;
        }
        Some(self.opens_at + self.round_duration * i32::try_from(round).ok()?)
    }

    /// Returns the limit of the next round, or `None` in the final round.
    pub fn next_limit(&self, now: DateTime<Utc>) -> Option<Decimal> {
        let round = self.effective_round(now);
        (round < self.max_rounds).then(|| self.limit(round + 1))
    }

    /// Fails with `RoundLimitExceeded` when adding `requested` hours to
    /// `assigned` would pass the limit in force at `now`.
    pub fn check(&self, now: DateTime<Utc>, assigned: Decimal, requested: Decimal) -> EngineResult<()> {
        let limit = self.limit_at(now);
        if assigned + requested > limit {
            return Err(EngineError::RoundLimitExceeded {
                limit,
                assigned,
                requested,
                next_limit: self.next_limit(now),
                next_increase_at: self.next_round_time(now),
            });
        }
        Ok(())
    }
}
