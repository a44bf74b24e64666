//! Per-worker signup status for staggered periods.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::DisplaySettings;
use crate::directory::Directory;
use crate::error::EngineResult;
use crate::models::{Period, PeriodPhase, UserId};
use crate::scheduling::{Ledger, RoundScheduler};

use super::{quota_scope, regular_target};

/// Where a worker (or their household) stands against the round limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupStatus {
    /// Limit in force now; `None` before round one starts.
    pub current_limit: Option<Decimal>,
    /// Fixed-slot hours already held.
    pub assigned_hours: Decimal,
    /// The regular-bucket target being staggered.
    pub quota: Decimal,
    /// Current round, `None` before round one starts.
    pub round: Option<u32>,
    /// Number of rounds.
    pub max_rounds: u32,
    /// Advisory round size.
    pub workers_per_round: u32,
    /// When the limit next rises.
    pub next_round_time: Option<DateTime<Utc>>,
    /// The limit after the next rise.
    pub next_limit: Option<Decimal>,
    /// Start of round one.
    pub opens_at: DateTime<Utc>,
    /// Human-readable summary.
    pub message: String,
}

/// Builds the status for `user_id`, or `None` for periods that are not
/// staggered or are still in draft.
pub(crate) fn signup_status(
    period: &Period,
    ledger: &Ledger,
    directory: &dyn Directory,
    user_id: &UserId,
    now: DateTime<Utc>,
    display: &DisplaySettings,
) -> EngineResult<Option<SignupStatus>> {
    if period.phase() == PeriodPhase::Draft {
        return Ok(None);
    }
    let users = quota_scope(period, user_id, directory);
    let target = regular_target(period, &users, directory)?;
    let Some(scheduler) = RoundScheduler::for_period(period, target) else {
        return Ok(None);
    };

    let assigned_hours = ledger.fixed_slot_hours(&users);
    let round = scheduler.round_at(now);
    let current_limit = match round {
        Some(round) => Some(scheduler.limit(round)),
        None if period.is_open() => Some(scheduler.limit(1)),
        None => None,
    };
    let next_round_time = scheduler.next_round_time(now);
    let next_limit = scheduler.next_limit(now);

    let mut message = format!(
        "You have signed up for {}/{} hours.",
        assigned_hours.normalize(),
        target.normalize()
    );
    match (current_limit, next_limit, next_round_time) {
        (None, _, _) => message.push_str(&format!(
            " You can start choosing jobs on {}.",
            scheduler.opens_at().format(&display.datetime_format)
        )),
        (Some(limit), Some(next), Some(at)) => message.push_str(&format!(
            " Your round limit is {} hours and will rise to {} at {}.",
            limit.normalize(),
            next.normalize(),
            at.format(&display.time_format)
        )),
        (Some(limit), _, _) => message.push_str(&format!(
            " Your round limit is {} hours.",
            limit.normalize()
        )),
    }

    Ok(Some(SignupStatus {
        current_limit,
        assigned_hours,
        quota: target,
        round,
        max_rounds: scheduler.max_rounds(),
        workers_per_round: scheduler.workers_per_round(),
        next_round_time,
        next_limit,
        opens_at: scheduler.opens_at(),
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::models::{JobId, QuotaType, Share, SlotType, Staggering};
    use crate::scheduling::LedgerEntry;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn opens_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::from(id)
    }

    fn staggered(phase: PeriodPhase) -> Period {
        let mut period = Period::new(
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
        });
        period.phase = phase;
        period
    }

    fn directory(period: &Period) -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        directory.set_share(Share::single_adult(period.id, user("ada")));
        directory
    }

    fn ledger_with(hours: i64) -> Ledger {
        Ledger::new(vec![LedgerEntry {
            user_id: user("ada"),
            job_id: JobId::new(),
            slot_type: SlotType::FixedSlot,
            hours: Decimal::from(hours),
        }])
    }

    fn status_at(period: &Period, ledger: &Ledger, now: DateTime<Utc>) -> Option<SignupStatus> {
        signup_status(
            period,
            ledger,
            &directory(period),
            &user("ada"),
            now,
            &DisplaySettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_before_open_message() {
        let period = staggered(PeriodPhase::Ready);
        let status = status_at(&period, &Ledger::default(), opens_at() - Duration::hours(1)).unwrap();

        assert_eq!(status.current_limit, None);
        assert_eq!(status.round, None);
        assert_eq!(
            status.message,
            "You have signed up for 0/32 hours. You can start choosing jobs on Fri Feb 20 12:00pm."
        );
    }

    #[test]
    fn test_round_one_message_names_next_rise() {
        let period = staggered(PeriodPhase::Open);
        let status = status_at(&period, &ledger_with(8), opens_at() + Duration::minutes(1)).unwrap();

        assert_eq!(status.current_limit, Some(Decimal::from(11)));
        assert_eq!(status.assigned_hours, Decimal::from(8));
        assert_eq!(status.next_limit, Some(Decimal::from(22)));
        assert_eq!(status.next_round_time, Some(opens_at() + Duration::minutes(5)));
        assert_eq!(
            status.message,
            "You have signed up for 8/32 hours. Your round limit is 11 hours and will rise to 22 at 12:05pm."
        );
    }

    #[test]
    fn test_final_round_message() {
        let period = staggered(PeriodPhase::Open);
        let status = status_at(&period, &ledger_with(20), opens_at() + Duration::minutes(12)).unwrap();

        assert_eq!(status.round, Some(3));
        assert_eq!(status.next_round_time, None);
        assert_eq!(
            status.message,
            "You have signed up for 20/32 hours. Your round limit is 32 hours."
        );
    }

    #[test]
    fn test_opened_early_reports_round_one_limit() {
        let period = staggered(PeriodPhase::Open);
        let status = status_at(&period, &Ledger::default(), opens_at() - Duration::minutes(30)).unwrap();
        assert_eq!(status.current_limit, Some(Decimal::from(11)));
        assert_eq!(status.round, None);
    }

    #[test]
    fn test_no_status_for_draft_or_free_for_all() {
        let draft = staggered(PeriodPhase::Draft);
        assert!(status_at(&draft, &Ledger::default(), opens_at()).is_none());

        let mut free = Period::new(
            "Spring",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
        .with_quota(QuotaType::ByPerson, Decimal::from(32));
        free.phase = PeriodPhase::Open;
        assert!(status_at(&free, &Ledger::default(), opens_at()).is_none());
    }
}
