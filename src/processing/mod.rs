//! The aggregation engine.
//!
//! - [`merge`] - distance, nearest pair and the merge-once primitive
//! - [`reduce`] - loop merging until a rule cap is met
//! - [`coverage`] - address counting and waste

mod coverage;
mod merge;
mod reduce;

// Re-export public functions
pub use coverage::{covered_addresses, covers, waste};
pub use merge::{
    closest_pair, distance, merge_closest_pair, merge_closest_ranges, merge_ranges, parse_ranges,
};
pub use reduce::{reduce_to, Reduction};
