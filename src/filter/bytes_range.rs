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

//! Byte string range filter for Colsieve
//!
//! Byte strings are ordered by unsigned lexicographic comparison with the
//! shorter string ranking lower on a tie, which is exactly `Ord` on `[u8]`.

use std::any::Any;
use std::cmp::Ordering;

use super::{Filter, FilterKind};
use crate::core::{Error, Result};

/// Interval filter over byte strings
///
/// Endpoints may independently be unbounded or exclusive. Equality against
/// a single value is detected at construction and served by a length check
/// plus one memory compare.
#[derive(Debug, Clone)]
pub struct BytesRange {
    /// Lower bound; ignored when `lower_unbounded`
    lower: Vec<u8>,
    /// Upper bound; ignored when `upper_unbounded`
    upper: Vec<u8>,
    /// No lower bound
    lower_unbounded: bool,
    /// No upper bound
    upper_unbounded: bool,
    /// Lower bound excluded from the interval
    lower_exclusive: bool,
    /// Upper bound excluded from the interval
    upper_exclusive: bool,
    /// Both bounds inclusive and equal: the interval is one value
    single_value: bool,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BytesRange {
    /// Create a new byte string range filter
    pub fn new(
        lower: impl Into<Vec<u8>>,
        lower_unbounded: bool,
        lower_exclusive: bool,
        upper: impl Into<Vec<u8>>,
        upper_unbounded: bool,
        upper_exclusive: bool,
        null_allowed: bool,
    ) -> Self {
        let lower = lower.into();
        let upper = upper.into();
        let single_value = !lower_unbounded
            && !upper_unbounded
            && !lower_exclusive
            && !upper_exclusive
            && lower == upper;

        Self {
            lower,
            upper,
            lower_unbounded,
            upper_unbounded,
            lower_exclusive,
            upper_exclusive,
            single_value,
            null_allowed,
        }
    }

    /// Create an equality filter for a single byte string
    pub fn equal_to(value: impl Into<Vec<u8>>, null_allowed: bool) -> Self {
        let value = value.into();
        Self::new(
            value.clone(),
            false,
            false,
            value,
            false,
            false,
            null_allowed,
        )
    }

    /// Check whether the interval holds exactly one value
    pub fn is_single_value(&self) -> bool {
        self.single_value
    }
}

impl Filter for BytesRange {
    fn kind(&self) -> FilterKind {
        FilterKind::BytesRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn test_bytes(&self, value: &[u8]) -> bool {
        if self.single_value {
            return value.len() == self.lower.len() && value == self.lower.as_slice();
        }
        if !self.lower_unbounded {
            match value.cmp(self.lower.as_slice()) {
                Ordering::Less => return false,
                Ordering::Equal if self.lower_exclusive => return false,
                _ => {}
            }
        }
        if !self.upper_unbounded {
            let compare = value.cmp(self.upper.as_slice());
            return compare == Ordering::Less
                || (!self.upper_exclusive && compare == Ordering::Equal);
        }
        true
    }

    fn test_length(&self, length: usize) -> bool {
        !self.single_value || length == self.lower.len()
    }

    fn test_bytes_range(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        has_null: bool,
    ) -> bool {
        if has_null && self.null_allowed {
            return true;
        }

        if let (Some(chunk_min), Some(chunk_max)) = (min, max) {
            if chunk_min == chunk_max {
                return self.test_bytes(chunk_min);
            }
        }

        if self.lower_unbounded {
            return min.is_some_and(|chunk_min| chunk_min < self.upper.as_slice());
        }

        if self.upper_unbounded {
            return max.is_some_and(|chunk_max| chunk_max > self.lower.as_slice());
        }

        if min.is_some_and(|chunk_min| chunk_min > self.upper.as_slice()) {
            return false;
        }
        if max.is_some_and(|chunk_max| chunk_max < self.lower.as_slice()) {
            return false;
        }
        true
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
            // Intersecting byte intervals is not part of the algebra yet.
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
