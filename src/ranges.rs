//! Closed codepoint intervals, the two merge policies, and the disjointness gate.

use crate::error::{Error, Result};

/// Closed interval `lo..=hi` of codepoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub lo: u32,
    pub hi: u32,
}

impl Range {
    #[inline]
    pub const fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// `true` when `next` starts inside or right after `self`.
    #[inline]
    const fn touches(&self, next: &Range) -> bool {
        next.lo <= self.hi.saturating_add(1)
    }
}

/// Interval tagged with a property value; only equal values may coalesce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValuedRange<V> {
    pub lo: u32,
    pub hi: u32,
    pub value: V,
}

impl<V> ValuedRange<V> {
    #[inline]
    pub const fn new(lo: u32, hi: u32, value: V) -> Self {
        Self { lo, hi, value }
    }

    #[inline]
    pub const fn range(&self) -> Range {
        Range::new(self.lo, self.hi)
    }
}

/// Coalesce overlapping or adjacent intervals into the minimal disjoint cover.
#[must_use]
pub fn merge_ranges(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort_unstable();
    let mut iter = ranges.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };
    let mut merged = Vec::new();
    for next in iter {
        if current.touches(&next) {
            current.hi = current.hi.max(next.hi);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

/// Like [`merge_ranges`] but a change of value always closes the interval.
///
/// Sorting on `(lo, hi, value)` keeps the output independent of input order.
#[must_use]
pub fn merge_valued_ranges<V: Ord>(mut ranges: Vec<ValuedRange<V>>) -> Vec<ValuedRange<V>> {
    ranges.sort_unstable();
    let mut iter = ranges.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };
    let mut merged = Vec::new();
    for next in iter {
        if next.value == current.value && current.range().touches(&next.range()) {
            current.hi = current.hi.max(next.hi);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

/// Fail with [`Error::Overlap`] unless `ranges` are pairwise disjoint.
///
/// # Errors
/// Reports the `lo` of the first entry that starts at or before the end of its
/// predecessor (in `(lo, hi)` order).
pub fn validate_ranges(table: &str, ranges: &[Range]) -> Result<()> {
    check_disjoint(table, ranges.to_vec())
}

/// [`validate_ranges`] for value-tagged entries; values are ignored.
///
/// # Errors
/// See [`validate_ranges`].
pub fn validate_valued_ranges<V>(table: &str, ranges: &[ValuedRange<V>]) -> Result<()> {
    check_disjoint(table, ranges.iter().map(ValuedRange::range).collect())
}

fn check_disjoint(table: &str, mut ranges: Vec<Range>) -> Result<()> {
    ranges.sort_unstable();
    let mut prev_hi: Option<u32> = None;
    for range in ranges {
        if prev_hi.is_some_and(|hi| range.lo <= hi) {
            return Err(Error::Overlap {
                table: table.to_string(),
                lo: range.lo,
            });
        }
        prev_hi = Some(range.hi);
    }
    Ok(())
}
