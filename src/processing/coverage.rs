//! Address-space accounting for merged rule sets.

use crate::models::AddressRange;

/// Sorted, non-overlapping, non-adjacent spans covering `ranges`.
fn union_spans(ranges: &[AddressRange]) -> Vec<(u64, u64)> {
    let mut sorted: Vec<&AddressRange> = ranges.iter().collect();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut spans: Vec<(u64, u64)> = Vec::with_capacity(sorted.len());
    for r in sorted {
        let (start, end) = (r.start as u64, r.end as u64);
        if let Some(last) = spans.last_mut() {
            if start <= last.1 + 1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        spans.push((start, end));
    }
    spans
}

/// Number of distinct addresses covered by `ranges`.
pub fn covered_addresses(ranges: &[AddressRange]) -> u64 {
    union_spans(ranges)
        .iter()
        .map(|(start, end)| end - start + 1)
        .sum()
}

/// True if every address in `inner` is covered by some range of `outer`.
pub fn covers(outer: &[AddressRange], inner: &[AddressRange]) -> bool {
    let spans = union_spans(outer);
    inner.iter().all(|r| {
        spans
            .iter()
            .any(|&(start, end)| start <= r.start as u64 && r.end as u64 <= end)
    })
}

/// Addresses covered by `after` that `before` did not cover.
pub fn waste(before: &[AddressRange], after: &[AddressRange]) -> u64 {
    covered_addresses(after).saturating_sub(covered_addresses(before))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{merge_closest_ranges, parse_ranges};

    #[test]
    fn test_covered_addresses() {
        let ranges = parse_ranges(&["10.0.0.0/24", "10.0.0.128/25", "10.0.1.0/32"]).unwrap();
        assert_eq!(covered_addresses(&ranges), 257);
        assert_eq!(covered_addresses(&[]), 0);

        let all = parse_ranges(&["0.0.0.0/0", "1.2.3.4/32"]).unwrap();
        assert_eq!(covered_addresses(&all), 1u64 << 32);
    }

    #[test]
    fn test_covers_adjacent_blocks() {
        let outer = parse_ranges(&["10.0.0.0/25", "10.0.0.128/25"]).unwrap();
        let inner = parse_ranges(&["10.0.0.64/26", "10.0.0.120/29"]).unwrap();
        assert!(covers(&outer, &inner));
        let outside = parse_ranges(&["10.0.1.0/32"]).unwrap();
        assert!(!covers(&outer, &outside));
    }

    #[test]
    fn test_waste_of_merge() {
        let before = parse_ranges(&["192.168.0.0/27", "192.168.0.64/26"]).unwrap();
        let after = merge_closest_ranges(&before).unwrap();
        // /25 is 128 addresses, the inputs held 32 + 64
        assert_eq!(waste(&before, &after), 32);
        assert!(covers(&after, &before));
    }

    #[test]
    fn test_merge_never_drops_addresses() {
        let mut ranges = parse_ranges(&[
            "13.64.0.0/16",
            "13.65.3.0/24",
            "20.38.98.1/32",
            "20.38.98.77/32",
            "40.112.0.0/13",
            "52.239.148.64/26",
            "104.45.0.9/32",
        ])
        .unwrap();
        let original = ranges.clone();
        while ranges.len() > 1 {
            let next = merge_closest_ranges(&ranges).unwrap();
            assert_eq!(next.len(), ranges.len() - 1);
            assert!(covers(&next, &ranges));
            assert!(covers(&next, &original));
            ranges = next;
        }
    }
}
