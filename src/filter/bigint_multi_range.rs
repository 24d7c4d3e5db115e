// Copyright 2025 Colsieve Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ordered integer range disjunction for Colsieve
//!

use std::any::Any;

use super::bigint_range::BigintRange;
use super::{null_or_false, Filter, FilterKind};
use crate::core::{Error, Result};

/// Disjunction of ordered, non-overlapping integer ranges
///
/// Represents predicates like `x BETWEEN 1 AND 5 OR x BETWEEN 10 AND 20`.
/// A parallel vector of range lower bounds supports binary search on the
/// point test.
#[derive(Debug, Clone)]
pub struct BigintMultiRange {
    /// Sub-ranges in ascending, non-overlapping order
    ranges: Vec<BigintRange>,
    /// Lower bound of each sub-range, for binary search
    lower_bounds: Vec<i64>,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BigintMultiRange {
    /// Create a new multi-range filter
    ///
    /// # Panics
    ///
    /// Panics if fewer than two ranges are given or the ranges overlap or
    /// are out of order.
    pub fn new(ranges: Vec<BigintRange>, null_allowed: bool) -> Self {
        assert!(!ranges.is_empty(), "ranges must not be empty");
        assert!(ranges.len() > 1, "should contain at least 2 ranges");

        let lower_bounds: Vec<i64> = ranges.iter().map(BigintRange::lower).collect();
        for i in 1..lower_bounds.len() {
            assert!(
                lower_bounds[i] >= ranges[i - 1].upper(),
                "bigint ranges must not overlap"
            );
        }

        Self {
            ranges,
            lower_bounds,
            null_allowed,
        }
    }

    /// Get the sub-ranges
    pub fn ranges(&self) -> &[BigintRange] {
        &self.ranges
    }
}

/// Canonical form for a list of merged integer ranges: empty collapses to
/// `IsNull`/`AlwaysFalse`, one survivor to a plain range.
pub(crate) fn combine_bigint_ranges(
    ranges: Vec<BigintRange>,
    null_allowed: bool,
) -> Box<dyn Filter> {
    if ranges.is_empty() {
        return null_or_false(null_allowed);
    }

    if ranges.len() == 1 {
        return Box::new(BigintRange::new(
            ranges[0].lower(),
            ranges[0].upper(),
            null_allowed,
        ));
    }

    Box::new(BigintMultiRange::new(ranges, null_allowed))
}

impl Filter for BigintMultiRange {
    fn kind(&self) -> FilterKind {
        FilterKind::BigintMultiRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn test_int64(&self, value: i64) -> bool {
        match self.lower_bounds.binary_search(&value) {
            // Exact hit on a lower bound.
            Ok(_) => true,
            // Below the first range.
            Err(0) => false,
            // Test against the range preceding the insertion point.
            Err(place) => self.ranges[place - 1].test_int64(value),
        }
    }

    fn test_int64_range(&self, min: i64, max: i64, has_null: bool) -> bool {
        if has_null && self.null_allowed {
            return true;
        }
        self.ranges
            .iter()
            .any(|range| range.test_int64_range(min, max, has_null))
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(BigintMultiRange::new(
            self.ranges.clone(),
            null_allowed.unwrap_or(self.null_allowed),
        ))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(Box::new(BigintMultiRange::new(
                self.ranges.clone(),
                false,
            ))),
            FilterKind::BigintRange
            | FilterKind::BigintValuesUsingBitmask
            | FilterKind::BigintValuesUsingHashTable => other.merge_with(self),
            FilterKind::BigintMultiRange => {
                let mut new_ranges = Vec::new();
                for range in &self.ranges {
                    let merged = range.merge_with(other)?;
                    match merged.kind() {
                        FilterKind::BigintRange => {
                            if let Some(merged_range) =
                                merged.as_any().downcast_ref::<BigintRange>()
                            {
                                new_ranges.push(merged_range.clone());
                            }
                        }
                        FilterKind::BigintMultiRange => {
                            // Flatten nested disjunctions produced by the
                            // child merge.
                            if let Some(merged_multi) =
                                merged.as_any().downcast_ref::<BigintMultiRange>()
                            {
                                new_ranges.extend(merged_multi.ranges.iter().cloned());
                            }
                        }
                        // Empty intersections collapse to AlwaysFalse or
                        // IsNull; null acceptance is carried by the result's
                        // own flag.
                        _ => {}
                    }
                }

                let both_null_allowed = self.null_allowed && other.test_null();
                Ok(combine_bigint_ranges(new_ranges, both_null_allowed))
            }
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BigintMultiRange {
        BigintMultiRange::new(
            vec![
                BigintRange::new(1, 5, false),
                BigintRange::new(10, 20, false),
                BigintRange::new(30, 30, false),
            ],
            false,
        )
    }

    #[test]
    fn test_point_lookup() {
        let filter = sample();
        assert!(filter.test_int64(1));
        assert!(filter.test_int64(3));
        assert!(filter.test_int64(5));
        assert!(filter.test_int64(10));
        assert!(filter.test_int64(20));
        assert!(filter.test_int64(30));

        assert!(!filter.test_int64(0));
        assert!(!filter.test_int64(6));
        assert!(!filter.test_int64(9));
        assert!(!filter.test_int64(21));
        assert!(!filter.test_int64(29));
        assert!(!filter.test_int64(31));
    }

    #[test]
    fn test_agrees_with_linear_scan() {
        let filter = sample();
        for value in -5..40 {
            let expected = filter.ranges().iter().any(|r| r.test_int64(value));
            assert_eq!(filter.test_int64(value), expected, "value {value}");
        }
    }

    #[test]
    #[should_panic(expected = "at least 2 ranges")]
    fn test_too_few_ranges_panic() {
        BigintMultiRange::new(vec![BigintRange::new(1, 5, false)], false);
    }

    #[test]
    #[should_panic(expected = "must not overlap")]
    fn test_overlapping_ranges_panic() {
        BigintMultiRange::new(
            vec![BigintRange::new(1, 10, false), BigintRange::new(5, 20, false)],
            false,
        );
    }

    #[test]
    fn test_range_pruning() {
        let filter = sample();
        assert!(filter.test_int64_range(4, 11, false));
        assert!(filter.test_int64_range(25, 35, false));
        assert!(!filter.test_int64_range(6, 9, false));
        assert!(!filter.test_int64_range(21, 29, false));
        assert!(!filter.test_int64_range(31, 100, false));
    }

    #[test]
    fn test_null_short_circuit() {
        let nullable = BigintMultiRange::new(
            vec![BigintRange::new(1, 5, true), BigintRange::new(10, 20, true)],
            true,
        );
        assert!(nullable.test_int64_range(100, 200, true));
        assert!(!nullable.test_int64_range(100, 200, false));
    }

    #[test]
    fn test_merge_with_range() {
        let filter = sample();
        let merged = filter.merge_with(&BigintRange::new(4, 12, false)).unwrap();
        assert_eq!(merged.kind(), FilterKind::BigintMultiRange);
        assert!(merged.test_int64(4));
        assert!(merged.test_int64(5));
        assert!(merged.test_int64(10));
        assert!(merged.test_int64(12));
        assert!(!merged.test_int64(3));
        assert!(!merged.test_int64(7));
        assert!(!merged.test_int64(13));
        assert!(!merged.test_int64(30));
    }

    #[test]
    fn test_merge_with_range_single_survivor() {
        let filter = sample();
        let merged = filter.merge_with(&BigintRange::new(11, 15, false)).unwrap();
        assert_eq!(merged.kind(), FilterKind::BigintRange);
        assert!(merged.test_int64(11));
        assert!(merged.test_int64(15));
        assert!(!merged.test_int64(10));
        assert!(!merged.test_int64(16));
    }

    #[test]
    fn test_merge_multi_ranges() {
        let a = sample();
        let b = BigintMultiRange::new(
            vec![BigintRange::new(3, 12, false), BigintRange::new(28, 40, false)],
            false,
        );
        let merged = a.merge_with(&b).unwrap();
        assert_eq!(merged.kind(), FilterKind::BigintMultiRange);
        for value in [3, 4, 5, 10, 11, 12, 30] {
            assert!(merged.test_int64(value), "value {value}");
        }
        for value in [1, 2, 6, 9, 13, 20, 28, 29, 31] {
            assert!(!merged.test_int64(value), "value {value}");
        }
    }

    #[test]
    fn test_merge_disjoint_multi_ranges() {
        let a = BigintMultiRange::new(
            vec![BigintRange::new(0, 5, true), BigintRange::new(10, 15, true)],
            true,
        );
        let b = BigintMultiRange::new(
            vec![BigintRange::new(6, 9, true), BigintRange::new(20, 25, true)],
            true,
        );
        let merged = a.merge_with(&b).unwrap();
        assert_eq!(merged.kind(), FilterKind::IsNull);

        let strict = b.clone_filter(Some(false));
        let merged = a.merge_with(strict.as_ref()).unwrap();
        assert_eq!(merged.kind(), FilterKind::AlwaysFalse);
    }

    #[test]
    fn test_merge_with_is_not_null() {
        let nullable = BigintMultiRange::new(
            vec![BigintRange::new(1, 5, true), BigintRange::new(10, 20, true)],
            true,
        );
        let merged = nullable
            .merge_with(&crate::filter::IsNotNull::new())
            .unwrap();
        assert_eq!(merged.kind(), FilterKind::BigintMultiRange);
        assert!(!merged.test_null());
        assert!(merged.test_int64(3));
    }
}
