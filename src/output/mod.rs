//! Output formatting for run results.
//!
//! - [`terminal`] - Terminal output with colors

mod terminal;

pub use terminal::{format_field, print_summary};
