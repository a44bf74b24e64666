//! Signup admission, roster listings and per-worker status.
//!
//! Everything here runs against a [`WorkState`](crate::store) borrowed from
//! the store while it holds the appropriate lock. The gate mutates; the
//! roster and status views only read.

mod gate;
mod roster;
mod status;

use rust_decimal::Decimal;

use crate::directory::Directory;
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, QuotaType, UserId};

pub use gate::{SignupGate, SignupMode, SignupRequest};
pub use roster::{RosterEntry, ShiftFilter, ShiftListing};
pub use status::SignupStatus;

pub(crate) use roster::list_shifts;
pub(crate) use status::signup_status;

/// Returns the users whose fixed-slot hours count against `user_id`'s quota.
pub(crate) fn quota_scope(period: &Period, user_id: &UserId, directory: &dyn Directory) -> Vec<UserId> {
    match period.quota_type {
        QuotaType::ByHousehold => directory.household_members(user_id),
        QuotaType::ByPerson | QuotaType::None => vec![user_id.clone()],
    }
}

/// Returns the regular-bucket target for `users`: the period quota scaled by
/// their combined share.
pub(crate) fn regular_target(
    period: &Period,
    users: &[UserId],
    directory: &dyn Directory,
) -> EngineResult<Decimal> {
    let share = directory.total_share(period.id, users);
    if share < Decimal::ZERO {
        return Err(EngineError::InvariantViolation {
            message: format!("negative share portion {share} in period {}", period.id),
        });
    }
    Ok(period.quota * share)
}
