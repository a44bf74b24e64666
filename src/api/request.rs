//! Request types for the work signup API.
//!
//! Query strings and JSON bodies accepted by the endpoints, with conversions
//! into the engine's domain types.

use serde::{Deserialize, Serialize};

use crate::models::{JobId, PeriodPhase, UserId};
use crate::scheduling::TransitionAuthority;
use crate::signup::{ShiftFilter, SignupMode};

/// Query string for `GET /periods/:period_id/shifts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftQuery {
    /// The viewer, needed by `mine` and `my_household`.
    pub user_id: Option<UserId>,
    /// Only shifts of this job.
    pub job_id: Option<JobId>,
    /// Only shifts with a free slot.
    pub open_only: bool,
    /// Only the viewer's shifts.
    pub mine: bool,
    /// Only shifts held by the viewer's household.
    pub my_household: bool,
    /// Only shifts without draft-phase assignments.
    pub not_preassigned: bool,
    /// Free-text search over job title and description.
    pub q: Option<String>,
}

impl From<&ShiftQuery> for ShiftFilter {
    fn from(query: &ShiftQuery) -> Self {
        ShiftFilter {
            job_id: query.job_id,
            open_only: query.open_only,
            mine: query.mine,
            my_household: query.my_household,
            not_preassigned: query.not_preassigned,
            search: query.q.clone(),
        }
    }
}

/// Body of `POST /shifts/:shift_id/signups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupBody {
    /// The user taking the slot.
    pub user_id: UserId,
    /// Places the user administratively, skipping round limits.
    #[serde(default)]
    pub admin: bool,
}

impl SignupBody {
    /// Returns the signup path the body asks for.
    pub fn mode(&self) -> SignupMode {
        if self.admin {
            SignupMode::Admin
        } else {
            SignupMode::Worker
        }
    }
}

/// Query string for `DELETE /assignments/:assignment_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalQuery {
    /// Bypasses the phase check and the cancellation cutoff.
    pub admin_override: bool,
}

/// Body of `POST /periods/:period_id/phase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseChangeBody {
    /// The requested phase.
    pub phase: PeriodPhase,
    /// Requests admin authority, needed to reopen finished periods.
    #[serde(default)]
    pub admin: bool,
}

impl PhaseChangeBody {
    /// Returns the authority the body asks for.
    pub fn authority(&self) -> TransitionAuthority {
        if self.admin {
            TransitionAuthority::Admin
        } else {
            TransitionAuthority::Coordinator
        }
    }
}

/// Query string naming the user a per-user view is for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    /// The user.
    pub user_id: UserId,
}
