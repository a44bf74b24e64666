//! Job model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{JobId, PeriodId};

/// How a job's work is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// A fixed number of equally sized slots; each counts `job.hours`.
    FixedSlot,
    /// Pooled community work; each shift counts its own duration.
    FullCommunity,
}

/// A unit of work within a period, offered through one or more shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for the job.
    pub id: JobId,
    /// The owning period.
    pub period_id: PeriodId,
    /// Short title shown in listings.
    pub title: String,
    /// Longer description, searched by the shift listing.
    #[serde(default)]
    pub description: String,
    /// Hours credited per fixed slot, or the per-share target for full-community jobs.
    pub hours: Decimal,
    /// Fixed-slot or full-community.
    pub slot_type: SlotType,
    /// Whether one user may hold several shifts of this job at once.
    #[serde(default)]
    pub multiple_shifts_allowed: bool,
}

impl Job {
    /// Creates a job that forbids holding more than one of its shifts.
    pub fn new(
        period_id: PeriodId,
        title: impl Into<String>,
        hours: Decimal,
        slot_type: SlotType,
    ) -> Self {
        Self {
            id: JobId::new(),
            period_id,
            title: title.into(),
            description: String::new(),
            hours,
            slot_type,
            multiple_shifts_allowed: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allows a user to hold several shifts of this job.
    pub fn allowing_multiple_shifts(mut self) -> Self {
        self.multiple_shifts_allowed = true;
        self
    }

    /// Returns true for fixed-slot jobs.
    pub fn is_fixed_slot(&self) -> bool {
        self.slot_type == SlotType::FixedSlot
    }

    /// Returns true for full-community jobs.
    pub fn is_full_community(&self) -> bool {
        self.slot_type == SlotType::FullCommunity
    }

    /// Case-insensitive match against title and description.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
