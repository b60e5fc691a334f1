//! Utility functions.
//!
//! This module provides:
//! - String sanitization for values that end up in log lines

pub mod sanitize;

pub use sanitize::{sanitize_error_message, sanitize_for_log};
