//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, page sizes, retry strategy, message texts)
//! - CLI option types and parsing
//! - The library `Config` struct

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, FailOn, LogFormat, LogLevel, Opt, SlackSettings};
