//! Configuration types for the work signup engine.
//!
//! These structures are deserialized from `engine.yaml`. Every field has a
//! default so a partial file (or none at all) yields a working configuration.

use chrono::Duration;
use serde::Deserialize;

/// Signup and cancellation rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignupSettings {
    /// Minutes before a shift starts after which workers may no longer cancel.
    /// Zero means cancellation is allowed until the shift starts.
    pub cancellation_cutoff_minutes: i64,
}

impl SignupSettings {
    /// Returns the cutoff as a duration.
    pub fn cancellation_cutoff(&self) -> Duration {
        Duration::minutes(self.cancellation_cutoff_minutes)
    }
}

impl Default for SignupSettings {
    fn default() -> Self {
        Self {
            cancellation_cutoff_minutes: 0,
        }
    }
}

/// Roster polling advertised to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Seconds between client roster polls.
    pub poll_interval_seconds: u64,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 5,
        }
    }
}

/// Background promotion of ready periods.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutoOpenSettings {
    /// Seconds between sweeps for periods due to open.
    pub sweep_interval_seconds: u64,
}

impl Default for AutoOpenSettings {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: 60,
        }
    }
}

/// Formats and labels used in user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// chrono format for a date and time without year.
    pub datetime_format: String,
    /// chrono format for a time of day.
    pub time_format: String,
    /// Title of the topline bucket that collects fixed-slot hours.
    pub regular_bucket_title: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            datetime_format: "%a %b %-d %-I:%M%P".to_string(),
            time_format: "%-I:%M%P".to_string(),
            regular_bucket_title: "Regular".to_string(),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Signup and cancellation rules.
    pub signup: SignupSettings,
    /// Roster polling.
    pub roster: RosterSettings,
    /// Auto-open sweep.
    pub auto_open: AutoOpenSettings,
    /// Message formats.
    pub display: DisplaySettings,
}
