//! Terminal output utilities.
//!
//! Provides formatting helpers and the per-resource run summary.

use crate::ResourceResult;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Print one row per resource and return how many failed.
pub fn print_summary(results: &[ResourceResult]) -> usize {
    println!(
        r#" "resource",             "before", "added", "after", "merges",  "waste", "status""#
    );

    let mut failed = 0;
    for (resource, result) in results {
        match result {
            Ok(update) => {
                let status = if update.applied {
                    "applied".green()
                } else if update.added == 0 {
                    "unchanged".normal()
                } else {
                    "dry-run".yellow()
                };
                println!(
                    "{}, {}, {}, {}, {}, {}, {}",
                    format_field(&update.resource, 24),
                    format_field(update.before, 8),
                    format_field(update.added, 7),
                    format_field(update.after, 7),
                    format_field(update.merges, 8),
                    format_field(update.waste, 8),
                    status
                );
                for rule in &update.rules {
                    log::debug!("{}: {}", update.resource, rule);
                }
            }
            Err(e) => {
                failed += 1;
                println!("{}, {} {}", format_field(resource, 24), "failed".on_red(), e);
            }
        }
    }
    failed
}
