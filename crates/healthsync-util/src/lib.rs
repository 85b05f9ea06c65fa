//! Shared utilities for healthsync
//!
//! This crate provides:
//! - Cycle IDs for correlating the log events of one sync run
//! - Time utilities (mockable wall clock, calendar-day windows, rounding)
//! - Default paths for config and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
