//! Share model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PeriodId, UserId};

/// A user's fraction of their household's quota responsibility for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// The period the share applies to.
    pub period_id: PeriodId,
    /// The user carrying the share.
    pub user_id: UserId,
    /// Fraction of a full quota (1.0 for a household of one adult).
    pub portion: Decimal,
}

impl Share {
    /// Creates a share with an explicit portion.
    pub fn new(period_id: PeriodId, user_id: UserId, portion: Decimal) -> Self {
        Self {
            period_id,
            user_id,
            portion,
        }
    }

    /// Creates the default full share held by a household of one adult.
    pub fn single_adult(period_id: PeriodId, user_id: UserId) -> Self {
        Self::new(period_id, user_id, Decimal::ONE)
    }
}
