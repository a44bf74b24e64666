//! Configuration loading for the work signup engine.
//!
//! Settings cover the cancellation cutoff, the advertised roster poll
//! interval, the auto-open sweep interval and message formats.
//!
//! # Example
//!
//! ```no_run
//! use work_signup_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Poll every {}s", config.config().roster.poll_interval_seconds);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AutoOpenSettings, DisplaySettings, EngineConfig, RosterSettings, SignupSettings};
