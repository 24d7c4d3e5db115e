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

//! Integer IN-set filters for Colsieve
//!
//! An integer IN-list is stored either as a dense bitmap keyed by offset
//! from the minimum, or as an open-addressed hash set when the value range
//! is too sparse for a bitmap. [`create_bigint_values`] picks the
//! representation; the merge algebra feeds intersections back through it so
//! results stay canonical.

use std::any::Any;

use super::bigint_multi_range::BigintMultiRange;
use super::bigint_range::BigintRange;
use super::{null_or_false, Filter, FilterKind};
use crate::core::{Error, Result};

/// Sentinel stored in empty hash table slots
const EMPTY_MARKER: i64 = i64::MIN;

/// Odd 64-bit mixing multiplier spreading values across table slots
const HASH_MULTIPLIER: u64 = 0xc6a4_a793_5bd1_e995;

#[inline]
fn hash_position(value: i64, capacity: usize) -> usize {
    (value as u64).wrapping_mul(HASH_MULTIPLIER) as usize & (capacity - 1)
}

/// Create the canonical filter for an integer IN-list
///
/// - empty list: `IsNull` or `AlwaysFalse` depending on `null_allowed`
/// - one value: a single-value [`BigintRange`]
/// - contiguous values: a [`BigintRange`] spanning them
/// - small or dense span: [`BigintValuesUsingBitmask`]
/// - otherwise: [`BigintValuesUsingHashTable`]
pub fn create_bigint_values(values: &[i64], null_allowed: bool) -> Box<dyn Filter> {
    if values.is_empty() {
        return null_or_false(null_allowed);
    }

    if values.len() == 1 {
        return Box::new(BigintRange::new(values[0], values[0], null_allowed));
    }

    let mut min = values[0];
    let mut max = values[0];
    for &value in &values[1..] {
        if value > max {
            max = value;
        } else if value < min {
            min = value;
        }
    }

    // A bitmap spanning more than four words per set bit wastes memory; keep
    // it anyway while the whole bitmap fits in 32 words.
    if let Some(range) = max.checked_sub(min) {
        if range == values.len() as i64 - 1 {
            return Box::new(BigintRange::new(min, max, null_allowed));
        }

        if range < 32 * 64 || range < values.len() as i64 * 4 * 64 {
            return Box::new(BigintValuesUsingBitmask::new(min, max, values, null_allowed));
        }
    }
    Box::new(BigintValuesUsingHashTable::new(
        min,
        max,
        values,
        null_allowed,
    ))
}

/// Integer IN-set backed by a dense bitmap
///
/// `bitmask[i]` is set iff `min + i` is a member.
#[derive(Debug, Clone)]
pub struct BigintValuesUsingBitmask {
    /// Smallest member
    min: i64,
    /// Largest member
    max: i64,
    /// Membership bitmap keyed by offset from `min`
    bitmask: Vec<bool>,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BigintValuesUsingBitmask {
    /// Create a new bitmap-backed IN-set
    ///
    /// # Panics
    ///
    /// Panics if `min >= max` or fewer than two values are given.
    pub fn new(min: i64, max: i64, values: &[i64], null_allowed: bool) -> Self {
        assert!(min < max, "min must be less than max");
        assert!(values.len() > 1, "values must contain at least 2 entries");

        let mut bitmask = vec![false; (max - min) as usize + 1];
        for &value in values {
            bitmask[(value - min) as usize] = true;
        }

        Self {
            min,
            max,
            bitmask,
            null_allowed,
        }
    }

    /// Get the smallest member
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Get the largest member
    pub fn max(&self) -> i64 {
        self.max
    }

    fn merge_in_range(&self, min: i64, max: i64, other: &dyn Filter) -> Box<dyn Filter> {
        let both_null_allowed = self.null_allowed && other.test_null();

        let mut values_to_keep = Vec::new();
        for value in min..=max {
            if self.bitmask[(value - self.min) as usize] && other.test_int64(value) {
                values_to_keep.push(value);
            }
        }
        create_bigint_values(&values_to_keep, both_null_allowed)
    }
}

impl Filter for BigintValuesUsingBitmask {
    fn kind(&self) -> FilterKind {
        FilterKind::BigintValuesUsingBitmask
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_int64(&self, value: i64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        self.bitmask[(value - self.min) as usize]
    }

    fn test_int64_range(&self, min: i64, max: i64, has_null: bool) -> bool {
        if has_null && self.null_allowed {
            return true;
        }
        if min == max {
            return self.test_int64(min);
        }
        !(min > self.max || max < self.min)
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        let mut copy = self.clone();
        copy.null_allowed = null_allowed.unwrap_or(self.null_allowed);
        Box::new(copy)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(self.clone_filter(Some(false))),
            FilterKind::BigintRange => {
                let Some(other_range) = other.as_any().downcast_ref::<BigintRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let min = self.min.max(other_range.lower());
                let max = self.max.min(other_range.upper());
                Ok(self.merge_in_range(min, max, other))
            }
            FilterKind::BigintValuesUsingHashTable => {
                let Some(other_values) = other
                    .as_any()
                    .downcast_ref::<BigintValuesUsingHashTable>()
                else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let min = self.min.max(other_values.min);
                let max = self.max.min(other_values.max);
                Ok(self.merge_in_range(min, max, other))
            }
            FilterKind::BigintValuesUsingBitmask => {
                let Some(other_values) =
                    other.as_any().downcast_ref::<BigintValuesUsingBitmask>()
                else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let min = self.min.max(other_values.min);
                let max = self.max.min(other_values.max);
                Ok(self.merge_in_range(min, max, other))
            }
            FilterKind::BigintMultiRange => {
                let Some(other_multi) = other.as_any().downcast_ref::<BigintMultiRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };

                let mut values_to_keep = Vec::new();
                for range in other_multi.ranges() {
                    let min = self.min.max(range.lower());
                    let max = self.max.min(range.upper());
                    for value in min..=max {
                        if self.bitmask[(value - self.min) as usize] && range.test_int64(value) {
                            values_to_keep.push(value);
                        }
                    }
                }

                let both_null_allowed = self.null_allowed && other.test_null();
                Ok(create_bigint_values(&values_to_keep, both_null_allowed))
            }
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Integer IN-set backed by an open-addressed hash table
///
/// Linear probing over a power-of-two table; empty slots hold
/// `i64::MIN`, and membership of the sentinel itself is tracked in a side
/// flag. Probing wraps modulo the capacity and never exceeds it.
#[derive(Debug, Clone)]
pub struct BigintValuesUsingHashTable {
    /// Smallest member
    min: i64,
    /// Largest member
    max: i64,
    /// Probe table; empty slots hold the sentinel
    table: Vec<i64>,
    /// Whether the sentinel value itself is a member
    contains_empty_marker: bool,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BigintValuesUsingHashTable {
    /// Create a new hash-table-backed IN-set
    ///
    /// # Panics
    ///
    /// Panics if `min >= max` or fewer than two values are given.
    pub fn new(min: i64, max: i64, values: &[i64], null_allowed: bool) -> Self {
        assert!(min < max, "min must be less than max");
        assert!(values.len() > 1, "values must contain at least 2 entries");

        // Power-of-two capacity with roughly 3x headroom over the value count.
        let capacity = 1usize << (values.len() * 3).ilog2();
        let mut table = vec![EMPTY_MARKER; capacity];
        let mut contains_empty_marker = false;

        for &value in values {
            if value == EMPTY_MARKER {
                contains_empty_marker = true;
                continue;
            }
            let mut position = hash_position(value, capacity);
            for _ in 0..capacity {
                if table[position] == EMPTY_MARKER {
                    table[position] = value;
                    break;
                }
                position = (position + 1) & (capacity - 1);
            }
        }

        Self {
            min,
            max,
            table,
            contains_empty_marker,
            null_allowed,
        }
    }

    /// Get the smallest member
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Get the largest member
    pub fn max(&self) -> i64 {
        self.max
    }

    fn merge_in_range(&self, min: i64, max: i64, other: &dyn Filter) -> Box<dyn Filter> {
        let both_null_allowed = self.null_allowed && other.test_null();

        if max < min {
            return null_or_false(both_null_allowed);
        }
        if max == min {
            if self.test_int64(min) && other.test_int64(min) {
                return Box::new(BigintRange::new(min, min, both_null_allowed));
            }
            return null_or_false(both_null_allowed);
        }

        let mut values_to_keep = Vec::with_capacity(self.table.len());
        if self.contains_empty_marker && other.test_int64(EMPTY_MARKER) {
            values_to_keep.push(EMPTY_MARKER);
        }
        for &entry in &self.table {
            if entry != EMPTY_MARKER && other.test_int64(entry) {
                values_to_keep.push(entry);
            }
        }
        create_bigint_values(&values_to_keep, both_null_allowed)
    }
}

impl Filter for BigintValuesUsingHashTable {
    fn kind(&self) -> FilterKind {
        FilterKind::BigintValuesUsingHashTable
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn test_int64(&self, value: i64) -> bool {
        if value == EMPTY_MARKER {
            return self.contains_empty_marker;
        }
        if value < self.min || value > self.max {
            return false;
        }
        let capacity = self.table.len();
        let mut position = hash_position(value, capacity);
        for _ in 0..capacity {
            let entry = self.table[position];
            if entry == EMPTY_MARKER {
                return false;
            }
            if entry == value {
                return true;
            }
            position = (position + 1) & (capacity - 1);
        }
        false
    }

    fn test_int64_range(&self, min: i64, max: i64, has_null: bool) -> bool {
        if has_null && self.null_allowed {
            return true;
        }
        if min == max {
            return self.test_int64(min);
        }
        !(min > self.max || max < self.min)
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        let mut copy = self.clone();
        copy.null_allowed = null_allowed.unwrap_or(self.null_allowed);
        Box::new(copy)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(self.clone_filter(Some(false))),
            FilterKind::BigintRange => {
                let Some(other_range) = other.as_any().downcast_ref::<BigintRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let min = self.min.max(other_range.lower());
                let max = self.max.min(other_range.upper());
                Ok(self.merge_in_range(min, max, other))
            }
            FilterKind::BigintValuesUsingHashTable => {
                let Some(other_values) = other
                    .as_any()
                    .downcast_ref::<BigintValuesUsingHashTable>()
                else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let min = self.min.max(other_values.min);
                let max = self.max.min(other_values.max);

                // Enumerate the smaller table against the larger one.
                if other_values.table.len() < self.table.len() {
                    return Ok(other_values.merge_in_range(min, max, self));
                }
                Ok(self.merge_in_range(min, max, other))
            }
            FilterKind::BigintValuesUsingBitmask => {
                // The bitmap side enumerates its window.
                other.merge_with(self)
            }
            FilterKind::BigintMultiRange => {
                let Some(other_multi) = other.as_any().downcast_ref::<BigintMultiRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };

                let mut values_to_keep = Vec::new();
                if self.contains_empty_marker && other.test_int64(EMPTY_MARKER) {
                    values_to_keep.push(EMPTY_MARKER);
                }
                for range in other_multi.ranges() {
                    let min = self.min.max(range.lower());
                    let max = self.max.min(range.upper());
                    if min <= max {
                        for &entry in &self.table {
                            if entry != EMPTY_MARKER && range.test_int64(entry) {
                                values_to_keep.push(entry);
                            }
                        }
                    }
                }

                let both_null_allowed = self.null_allowed && other.test_null();
                Ok(create_bigint_values(&values_to_keep, both_null_allowed))
            }
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
