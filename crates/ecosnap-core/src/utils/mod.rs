//! Utility functions for display formatting.

pub mod format;

pub use format::{format_age_minutes, to_fixed, truncate_string};
