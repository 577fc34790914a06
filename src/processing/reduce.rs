//! Caller-driven reduction to a rule cap.

use super::merge::merge_closest_pair;
use crate::error::MergeError;

/// Outcome of [`reduce_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// The reduced CIDR list.
    pub cidrs: Vec<String>,
    /// Number of merge calls made.
    pub merges: usize,
}

/// Merge closest pairs until at most `target` entries remain.
///
/// Each round is one [`merge_closest_pair`] call and shrinks the list by
/// exactly one. Any error stops the loop and is returned as is, so a
/// `target` below 1 ends in [`MergeError::InsufficientRanges`].
/// A list already within `target` is returned untouched.
pub fn reduce_to<S: AsRef<str>>(entries: &[S], target: usize) -> Result<Reduction, MergeError> {
    let mut cidrs: Vec<String> = entries.iter().map(|s| s.as_ref().to_string()).collect();
    let mut merges = 0;

    while cidrs.len() > target {
        let next = merge_closest_pair(&cidrs)?;
        debug_assert_eq!(next.len() + 1, cidrs.len(), "merge must remove one entry");
        cidrs = next;
        merges += 1;
    }

    log::info!(
        "Reduced {} entries to {} with {} merges (target {})",
        entries.len(),
        cidrs.len(),
        merges,
        target
    );
    Ok(Reduction { cidrs, merges })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(count: usize) -> Vec<String> {
        // spread out so no two merges collapse into one block
        (0..count)
            .map(|i| format!("20.{}.{}.1/32", i / 200, (i % 200) + 1))
            .collect()
    }

    #[test]
    fn test_reduce_205_to_200() {
        let input = singles(205);
        let result = reduce_to(&input, 200).unwrap();
        assert_eq!(result.merges, 5);
        assert_eq!(result.cidrs.len(), 200);
    }

    #[test]
    fn test_reduce_already_within_target() {
        let input = vec!["1.2.3.4/32", "5.6.7.8/32"];
        let result = reduce_to(&input, 2).unwrap();
        assert_eq!(result.merges, 0);
        assert_eq!(result.cidrs, vec!["1.2.3.4/32", "5.6.7.8/32"]);
    }

    #[test]
    fn test_reduce_to_one() {
        let input = vec!["1.2.3.4/32", "1.2.3.6/32", "1.2.3.200/32"];
        let result = reduce_to(&input, 1).unwrap();
        assert_eq!(result.merges, 2);
        assert_eq!(result.cidrs, vec!["1.2.3.0/24"]);
    }

    #[test]
    fn test_reduce_to_zero_fails() {
        let input = vec!["1.2.3.4/32", "1.2.3.6/32"];
        assert_eq!(
            reduce_to(&input, 0),
            Err(MergeError::InsufficientRanges(1))
        );
    }

    #[test]
    fn test_reduce_stops_on_malformed() {
        let input = vec!["1.2.3.4/32", "bogus/32", "1.2.3.6/32"];
        assert_eq!(
            reduce_to(&input, 2),
            Err(MergeError::MalformedAddress("bogus/32".to_string()))
        );
    }
}
