//! Core data models for the work signup engine.
//!
//! Periods own jobs and shifts; shifts own assignments. Shares, users and
//! households are external records the engine only reads.

mod ids;
mod job;
mod period;
mod share;
mod shift;

pub use ids::{AssignmentId, HouseholdId, JobId, PeriodId, ShiftId, UserId};
pub use job::{Job, SlotType};
pub use period::{Period, PeriodPhase, PickType, QuotaType, Staggering};
pub use share::Share;
pub use shift::{Assignment, Shift};
