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

//! Integer range filter for Colsieve
//!

use std::any::Any;

use super::bigint_multi_range::{combine_bigint_ranges, BigintMultiRange};
use super::{null_or_false, Filter, FilterKind};
use crate::core::{Error, Result};

/// Closed interval filter over 64-bit signed integers
///
/// Accepts values in `[lower, upper]`, both endpoints inclusive. Equality is
/// the degenerate case `lower == upper`.
#[derive(Debug, Clone)]
pub struct BigintRange {
    /// Inclusive lower bound
    lower: i64,
    /// Inclusive upper bound
    upper: i64,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BigintRange {
    /// Create a new integer range filter
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: i64, upper: i64, null_allowed: bool) -> Self {
        assert!(lower <= upper, "lower must not exceed upper");
        Self {
            lower,
            upper,
            null_allowed,
        }
    }

    /// Get the inclusive lower bound
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// Get the inclusive upper bound
    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Check whether the range holds exactly one value
    pub fn is_single_value(&self) -> bool {
        self.lower == self.upper
    }
}

impl Filter for BigintRange {
    fn kind(&self) -> FilterKind {
        FilterKind::BigintRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    fn test_int64_range(&self, min: i64, max: i64, has_null: bool) -> bool {
        if has_null && self.null_allowed {
            return true;
        }
        if min == max {
            return self.test_int64(min);
        }
        !(min > self.upper || max < self.lower)
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(BigintRange::new(
            self.lower,
            self.upper,
            null_allowed.unwrap_or(self.null_allowed),
        ))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(Box::new(BigintRange::new(self.lower, self.upper, false))),
            FilterKind::BigintRange => {
                let Some(other_range) = other.as_any().downcast_ref::<BigintRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let both_null_allowed = self.null_allowed && other.test_null();

                let lower = self.lower.max(other_range.lower);
                let upper = self.upper.min(other_range.upper);

                if lower <= upper {
                    return Ok(Box::new(BigintRange::new(lower, upper, both_null_allowed)));
                }
                Ok(null_or_false(both_null_allowed))
            }
            FilterKind::BigintValuesUsingBitmask | FilterKind::BigintValuesUsingHashTable => {
                // The set side enumerates its members against this range.
                other.merge_with(self)
            }
            FilterKind::BigintMultiRange => {
                let Some(other_multi) = other.as_any().downcast_ref::<BigintMultiRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let mut new_ranges = Vec::new();
                for range in other_multi.ranges() {
                    let merged = self.merge_with(range)?;
                    if merged.kind() == FilterKind::BigintRange {
                        if let Some(merged_range) = merged.as_any().downcast_ref::<BigintRange>() {
                            new_ranges.push(merged_range.clone());
                        }
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
