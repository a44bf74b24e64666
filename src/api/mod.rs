//! HTTP API module for the work signup engine.
//!
//! This module exposes shift listings, signups, removals, phase changes,
//! signup status and topline summaries as JSON endpoints over a shared
//! [`WorkStore`](crate::store::WorkStore).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PhaseChangeBody, RemovalQuery, ShiftQuery, SignupBody, UserQuery};
pub use response::{ApiError, RemovalResponse, ShiftListResponse};
pub use state::AppState;
