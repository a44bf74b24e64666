//! Period model and its configuration enums.
//!
//! A [`Period`] is the scheduling window that owns jobs and shifts. It carries
//! the quota configuration, the pick type (free-for-all or staggered) and the
//! lifecycle [`PeriodPhase`]. Phase changes go through
//! [`crate::scheduling::phase`], never through direct field writes.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PeriodId;
use crate::error::{EngineError, EngineResult};

/// Lifecycle state of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPhase {
    /// Configuration only; workers cannot sign up.
    Draft,
    /// Configuration locked, waiting for the auto-open time or a manual open.
    Ready,
    /// Signups permitted.
    Open,
    /// Signups frozen; results final.
    Published,
    /// Read-only history.
    Archived,
}

impl PeriodPhase {
    /// Returns the snake_case name used in messages and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodPhase::Draft => "draft",
            PeriodPhase::Ready => "ready",
            PeriodPhase::Open => "open",
            PeriodPhase::Published => "published",
            PeriodPhase::Archived => "archived",
        }
    }
}

impl fmt::Display for PeriodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a period's quota is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaType {
    /// No quota; nobody has an obligation.
    None,
    /// Each person owns their share of the quota.
    ByPerson,
    /// The household owns the sum of its members' shares.
    ByHousehold,
}

/// Settings that only exist for staggered periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staggering {
    /// Advisory number of workers expected to pick per round. Used for messaging only.
    pub workers_per_round: u32,
    /// Length of each round in minutes.
    pub round_duration_minutes: u32,
    /// Number of rounds until the round limit reaches the full quota.
    pub max_rounds_per_worker: u32,
}

/// How workers pick shifts once the period is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PickType {
    /// Anyone may claim any number of hours immediately.
    FreeForAll,
    /// Claimable fixed-slot hours rise in rounds after the auto-open time.
    Staggered(Staggering),
}

/// A scheduling window offering jobs and shifts for signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier for the period.
    pub id: PeriodId,
    /// Display name (e.g. "Spring 2026").
    pub name: String,
    /// First day covered by the period.
    pub starts_on: NaiveDate,
    /// Last day covered by the period (inclusive).
    pub ends_on: NaiveDate,
    pub(crate) phase: PeriodPhase,
    /// How the quota is tracked.
    pub quota_type: QuotaType,
    /// Target hours per full share.
    pub quota: Decimal,
    /// Free-for-all or staggered picking.
    pub pick_type: PickType,
    /// When a ready period opens automatically. Also the start of round one.
    pub auto_open_time: Option<DateTime<Utc>>,
}

impl Period {
    /// Creates a draft, free-for-all period with no quota.
    ///
    /// # Example
    ///
    /// ```
    /// use work_signup_engine::models::{Period, PeriodPhase, QuotaType};
    /// use chrono::NaiveDate;
    ///
    /// let period = Period::new(
    ///     "Spring",
    ///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
    /// );
    /// assert_eq!(period.phase(), PeriodPhase::Draft);
    /// assert_eq!(period.quota_type, QuotaType::None);
    /// ```
    pub fn new(name: impl Into<String>, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        Self {
            id: PeriodId::new(),
            name: name.into(),
            starts_on,
            ends_on,
            phase: PeriodPhase::Draft,
            quota_type: QuotaType::None,
            quota: Decimal::ZERO,
            pick_type: PickType::FreeForAll,
            auto_open_time: None,
        }
    }

    /// Sets the quota configuration.
    pub fn with_quota(mut self, quota_type: QuotaType, quota: Decimal) -> Self {
        self.quota_type = quota_type;
        self.quota = quota;
        self
    }

    /// Sets the time at which a ready period opens by itself.
    pub fn with_auto_open_time(mut self, at: DateTime<Utc>) -> Self {
        self.auto_open_time = Some(at);
        self
    }

    /// Switches the period to staggered picking.
    pub fn with_staggering(mut self, staggering: Staggering) -> Self {
        self.pick_type = PickType::Staggered(staggering);
        self
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> PeriodPhase {
        self.phase
    }

    /// Returns true while workers may sign up.
    pub fn is_open(&self) -> bool {
        self.phase == PeriodPhase::Open
    }

    /// Returns true while the period is still being configured.
    pub fn is_draft(&self) -> bool {
        self.phase == PeriodPhase::Draft
    }

    /// Returns the staggering settings for staggered periods.
    pub fn staggering(&self) -> Option<&Staggering> {
        match &self.pick_type {
            PickType::Staggered(staggering) => Some(staggering),
            PickType::FreeForAll => None,
        }
    }

    /// Returns true when shift picking is staggered.
    pub fn is_staggered(&self) -> bool {
        self.staggering().is_some()
    }

    /// Returns true when a ready period has reached its auto-open time.
    pub fn is_due_to_open(&self, now: DateTime<Utc>) -> bool {
        self.phase == PeriodPhase::Ready && self.auto_open_time.is_some_and(|at| now >= at)
    }

    /// Checks the configuration for internal consistency.
    ///
    /// Staggered periods need an auto-open time (the start of round one),
    /// positive round settings and a quota to stagger.
    pub fn validate(&self) -> EngineResult<()> {
        if self.ends_on < self.starts_on {
            return Err(invalid("ends_on", "must not be before starts_on"));
        }
        if self.quota < Decimal::ZERO {
            return Err(invalid("quota", "must not be negative"));
        }
        if let Some(staggering) = self.staggering() {
            if self.auto_open_time.is_none() {
                return Err(invalid("auto_open_time", "is required for staggered periods"));
            }
            if staggering.round_duration_minutes == 0 {
                return Err(invalid("round_duration_minutes", "must be positive"));
            }
            if staggering.max_rounds_per_worker == 0 {
                return Err(invalid("max_rounds_per_worker", "must be positive"));
            }
            if staggering.workers_per_round == 0 {
                return Err(invalid("workers_per_round", "must be positive"));
            }
            if self.quota_type == QuotaType::None {
                return Err(invalid("quota_type", "staggered periods need a quota"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidPeriod {
        field: field.to_string(),
        message: message.to_string(),
    }
}
