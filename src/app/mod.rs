//! Run-level reporting helpers used by `run_scan`.

pub mod statistics;

// Re-export public API
pub use statistics::{
    print_error_statistics, print_finding_statistics, print_simple_summary,
};
