//! Nearest-pair CIDR merging.
//!
//! One call fuses the two ranges with the smallest [`distance`] into the
//! smallest aligned block covering both. The result may include addresses
//! neither input held; that waste is the price of fewer rules.

use crate::error::MergeError;
use crate::models::{common_prefix_len, AddressRange};
use itertools::Itertools;

/// Parse every entry, failing on the first malformed one.
pub fn parse_ranges<S: AsRef<str>>(entries: &[S]) -> Result<Vec<AddressRange>, MergeError> {
    entries.iter().map(|s| s.as_ref().parse()).collect()
}

/// `|a.start - b.start| + |a.end - b.end|`, in i64 so u32 spans can't wrap.
pub fn distance(a: &AddressRange, b: &AddressRange) -> i64 {
    (a.start as i64 - b.start as i64).abs() + (a.end as i64 - b.end as i64).abs()
}

/// Indices `(i, j)`, `i < j`, of the closest pair.
///
/// Pairs are scanned in ascending `(i, j)` order and only a strictly
/// smaller distance replaces the current best, so the first minimum wins.
pub fn closest_pair(ranges: &[AddressRange]) -> Result<(usize, usize), MergeError> {
    if ranges.len() < 2 {
        return Err(MergeError::InsufficientRanges(ranges.len()));
    }

    // min_by_key keeps the first of several equal minimums
    (0..ranges.len())
        .tuple_combinations()
        .min_by_key(|&(i, j)| distance(&ranges[i], &ranges[j]))
        .ok_or(MergeError::InsufficientRanges(ranges.len()))
}

/// Smallest aligned block containing both `a` and `b`.
pub fn merge_ranges(a: &AddressRange, b: &AddressRange) -> AddressRange {
    let lo = a.start.min(b.start);
    let hi = a.end.max(b.end);

    let prefix_len = common_prefix_len(lo, hi);
    // shifting by 32 is an overflow, a /0 mask is all zeros
    let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
    let start = lo & mask;

    AddressRange {
        start,
        end: start | !mask,
        prefix_len,
    }
}

/// Replace the closest pair of `ranges` with their merged block.
///
/// The remaining ranges keep their order; the merged block is appended.
pub fn merge_closest_ranges(ranges: &[AddressRange]) -> Result<Vec<AddressRange>, MergeError> {
    let (i, j) = closest_pair(ranges)?;
    let merged = merge_ranges(&ranges[i], &ranges[j]);
    log::debug!(
        "merge {} + {} => {} (distance {})",
        ranges[i],
        ranges[j],
        merged,
        distance(&ranges[i], &ranges[j])
    );

    let mut out: Vec<AddressRange> = ranges
        .iter()
        .enumerate()
        .filter(|&(k, _)| k != i && k != j)
        .map(|(_, r)| *r)
        .collect();
    out.push(merged);
    Ok(out)
}

/// Merge the closest pair of CIDR strings once.
///
/// Returns one entry fewer than given. Does not loop towards any target
/// count, see [`super::reduce_to`] for that.
///
/// # Errors
/// * [`MergeError::MalformedAddress`] - an entry is not an IPv4 CIDR
/// * [`MergeError::InsufficientRanges`] - fewer than 2 entries
///
/// # Examples
/// ```
/// use azure_net_limit::processing::merge_closest_pair;
/// let out = merge_closest_pair(&["192.168.0.0/27", "192.168.0.64/26"]).unwrap();
/// assert_eq!(out, vec!["192.168.0.0/25"]);
/// ```
pub fn merge_closest_pair<S: AsRef<str>>(entries: &[S]) -> Result<Vec<String>, MergeError> {
    let ranges = parse_ranges(entries)?;
    let merged = merge_closest_ranges(&ranges)?;
    Ok(merged.iter().map(AddressRange::to_string).collect())
}
