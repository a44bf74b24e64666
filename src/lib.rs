//! Work-shift signup engine for cooperative work periods.
//!
//! This crate lets a community run a work period: coordinators configure
//! jobs and shifts, the period moves through its lifecycle, and workers claim
//! slots under capacity, duplication and staggered round-limit rules. Quota
//! progress is summarized per worker and per household.

#![warn(missing_docs)]

pub mod api;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod models;
pub mod scheduling;
pub mod signup;
pub mod store;
pub mod sweep;

pub use error::{EngineError, EngineResult};
pub use store::WorkStore;
