//! Compact text encoding of integer sets.
//!
//! Weeks and periods are stored and exchanged as comma-separated tokens where
//! each token is either a single number (`5`) or an inclusive range (`7-9`):
//!
//! ```
//! use lessontable_core::intervals;
//!
//! assert_eq!(intervals::decode("1-3,5,7-9"), vec![1, 2, 3, 5, 7, 8, 9]);
//! assert_eq!(intervals::encode(&[1, 2, 3, 5, 7, 8, 9]), "1-3,5,7-9");
//! ```
//!
//! Decoding is lenient: a token that cannot be read is logged and skipped.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Largest week or period number. Courses and imports enforce the same
/// bound, so anything stored can be decoded again.
pub const MAX_VALUE: u32 = 999;

/// Parse one token (`"5"` or `"7-9"`) into an inclusive range.
///
/// Returns `None` for empty, non-numeric, zero, reversed or oversized tokens.
pub fn decode_token(token: &str) -> Option<RangeInclusive<u32>> {
    let token = token.trim();
    let (start, end) = match token.split_once('-') {
        Some((a, b)) => (a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?),
        None => {
            let n = token.parse::<u32>().ok()?;
            (n, n)
        }
    };
    if start == 0 || start > end || end > MAX_VALUE {
        return None;
    }
    Some(start..=end)
}

/// Decode text into a sorted, deduplicated list.
///
/// Invalid tokens are skipped with a warning; empty input yields an empty
/// list.
pub fn decode(text: &str) -> Vec<u32> {
    let mut values = BTreeSet::new();
    for token in text.split(',') {
        if token.trim().is_empty() {
            continue;
        }
        match decode_token(token) {
            Some(range) => values.extend(range),
            None => tracing::warn!(token, input = text, "skipping invalid interval token"),
        }
    }
    values.into_iter().collect()
}

/// Encode a sorted, deduplicated list as maximal runs.
pub fn encode(values: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut prev) = (first, first);
    for current in iter {
        if current != prev + 1 {
            parts.push(format_run(start, prev));
            start = current;
        }
        prev = current;
    }
    parts.push(format_run(start, prev));
    parts.join(",")
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// Plain comma join without range compression.
pub fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_mixed_ranges_and_singles() {
        assert_eq!(decode("1-3,5,7-9"), vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn decode_is_soft_on_garbage() {
        assert!(decode("").is_empty());
        assert!(decode("abc").is_empty());
        assert_eq!(decode("1,x,3"), vec![1, 3]);
        assert_eq!(decode("4-2,6"), vec![6]);
        assert_eq!(decode("0,2"), vec![2]);
    }

    #[test]
    fn decode_sorts_and_dedups() {
        assert_eq!(decode("9,1-3,2, 3 ,1"), vec![1, 2, 3, 9]);
        assert_eq!(decode(" 2 - 4 "), vec![2, 3, 4]);
    }

    #[test]
    fn encodes_runs() {
        assert_eq!(encode(&[1, 2, 3, 5, 7, 8, 9]), "1-3,5,7-9");
        assert_eq!(encode(&[4]), "4");
        assert_eq!(encode(&[]), "");
        assert_eq!(encode(&[1, 3, 5]), "1,3,5");
    }

    #[test]
    fn join_keeps_every_value() {
        assert_eq!(join(&[1, 2, 3]), "1,2,3");
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn token_rejects_malformed() {
        assert_eq!(decode_token("3"), Some(3..=3));
        assert_eq!(decode_token("1-16"), Some(1..=16));
        assert_eq!(decode_token("1-"), None);
        assert_eq!(decode_token("-3"), None);
        assert_eq!(decode_token("1-2-3"), None);
        assert_eq!(decode_token("1-4000000000"), None);
    }

    #[test]
    fn values_up_to_the_bound_survive() {
        assert_eq!(decode_token("998-999"), Some(998..=MAX_VALUE));
        assert_eq!(decode_token("1000"), None);
        assert_eq!(decode(&encode(&[5, 998, 999])), vec![5, 998, 999]);
    }

    proptest! {
        #[test]
        fn prop_encode_then_decode_is_identity(set in proptest::collection::btree_set(1u32..=MAX_VALUE, 0..40)) {
            let values: Vec<u32> = set.into_iter().collect();
            prop_assert_eq!(decode(&encode(&values)), values);
        }

        #[test]
        fn prop_encode_is_stable_after_decode(text in "[0-9]{1,2}(-[0-9]{1,2})?(,[0-9]{1,2}(-[0-9]{1,2})?){0,6}") {
            let once = encode(&decode(&text));
            prop_assert_eq!(encode(&decode(&once)), once);
        }
    }
}
