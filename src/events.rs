//! Domain events emitted by committed changes.
//!
//! Each successful mutation appends the delta it made to the store's outbox
//! in the same critical section as the change itself. Collaborators such as
//! reminder delivery drain the outbox and react; the engine keeps no
//! subscriber registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, JobId, PeriodId, PeriodPhase};

/// A committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkEvent {
    /// A period moved to a new phase.
    PhaseChanged {
        /// The period.
        period_id: PeriodId,
        /// The phase it left.
        from: PeriodPhase,
        /// The phase it entered.
        to: PeriodPhase,
        /// True for time-triggered promotion.
        automatic: bool,
        /// When the change was committed.
        at: DateTime<Utc>,
    },
    /// A slot was taken.
    AssignmentCreated {
        /// The owning period.
        period_id: PeriodId,
        /// The shift's job.
        job_id: JobId,
        /// The new assignment.
        assignment: Assignment,
    },
    /// A slot was released.
    AssignmentRemoved {
        /// The owning period.
        period_id: PeriodId,
        /// The shift's job.
        job_id: JobId,
        /// The removed assignment.
        assignment: Assignment,
        /// When the removal was committed.
        at: DateTime<Utc>,
    },
    /// A period and everything it owned were deleted.
    PeriodRemoved {
        /// The removed period.
        period_id: PeriodId,
    },
}

impl WorkEvent {
    /// Returns the period the event concerns.
    pub fn period_id(&self) -> PeriodId {
        match self {
            WorkEvent::PhaseChanged { period_id, .. }
            | WorkEvent::AssignmentCreated { period_id, .. }
            | WorkEvent::AssignmentRemoved { period_id, .. }
            | WorkEvent::PeriodRemoved { period_id } => *period_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phase_changed_serialization() {
        let period_id = PeriodId::new();
        let event = WorkEvent::PhaseChanged {
            period_id,
            from: PeriodPhase::Ready,
            to: PeriodPhase::Open,
            automatic: true,
            at: Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_changed");
        assert_eq!(json["from"], "ready");
        assert_eq!(json["to"], "open");
        assert_eq!(event.period_id(), period_id);
    }
}
