//! Pure scheduling logic for work periods.
//!
//! This module contains the phase state machine, the staggered round
//! scheduler, the half-hour quota rounding and the topline obligation
//! calculator. Nothing here locks or mutates shared state; callers pass in a
//! snapshot and get a value back.

mod hours;
mod ledger;
pub mod phase;
mod rounds;
mod topline;

pub use hours::round_next_half;
pub use ledger::{Ledger, LedgerEntry};
pub use phase::{TransitionAuthority, check_transition, promote_if_due, transition};
pub use rounds::RoundScheduler;
pub use topline::{Bucket, Obligation, Topline, ToplineSummary};
