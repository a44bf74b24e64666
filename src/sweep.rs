//! Background promotion of ready periods.
//!
//! Reads already promote the period they touch. The sweep covers periods
//! nobody is looking at, so events for auto-opened periods are not delayed
//! until the first visitor.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::WorkStore;

/// Periodically promotes every due period.
pub struct AutoOpenSweep {
    interval: Duration,
}

impl AutoOpenSweep {
    /// Creates a sweep running every `interval_seconds` (at least one second).
    pub fn new(interval_seconds: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Runs until the task is aborted.
    pub async fn run(&self, store: Arc<WorkStore>) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            let opened = store.promote_due_periods();
            if opened.is_empty() {
                debug!("Auto-open sweep found nothing due");
            } else {
                info!(count = opened.len(), "Auto-open sweep opened periods");
            }
        }
    }
}

/// Spawns the sweep on the current tokio runtime using the store's configured
/// interval. Abort the returned handle to stop it.
pub fn spawn_auto_open_sweep(store: Arc<WorkStore>) -> JoinHandle<()> {
    let sweep = AutoOpenSweep::new(store.config().auto_open.sweep_interval_seconds);
    tokio::spawn(async move { sweep.run(store).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::EngineConfig;
    use crate::directory::InMemoryDirectory;
    use crate::models::{Period, PeriodPhase};
    use crate::scheduling::TransitionAuthority;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};

    #[tokio::test]
    async fn test_sweep_opens_due_period() {
        let opens_at = Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(opens_at - ChronoDuration::minutes(1)));
        let store = Arc::new(WorkStore::new(
            clock.clone(),
            Arc::new(InMemoryDirectory::new()),
            EngineConfig::default(),
        ));
        let period = Period::new(
            "Spring",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
        .with_auto_open_time(opens_at);
        let period_id = store.add_period(period).unwrap();
        store
            .change_phase(period_id, PeriodPhase::Ready, TransitionAuthority::Coordinator)
            .unwrap();

        clock.set(opens_at);
        let handle = spawn_auto_open_sweep(store.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let events = store.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            crate::events::WorkEvent::PhaseChanged { automatic: true, .. }
        )));
    }
}
