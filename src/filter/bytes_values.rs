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

//! Byte string IN-set filter for Colsieve
//!

use std::any::Any;

use rustc_hash::FxHashSet;

use super::{Filter, FilterKind};
use crate::core::{Error, Result};

/// Byte string IN-set
///
/// Membership goes through a pre-computed length set first, so values of a
/// length no member has are rejected without touching the value set. The
/// smallest and largest members are cached for statistics pruning.
#[derive(Debug, Clone)]
pub struct BytesValues {
    /// Member values
    values: FxHashSet<Vec<u8>>,
    /// Distinct member lengths
    lengths: FxHashSet<usize>,
    /// Smallest member
    lower: Vec<u8>,
    /// Largest member
    upper: Vec<u8>,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BytesValues {
    /// Create a new byte string IN-set
    ///
    /// # Panics
    ///
    /// Panics if no values are given.
    pub fn new(values: Vec<Vec<u8>>, null_allowed: bool) -> Self {
        assert!(!values.is_empty(), "values must not be empty");

        let mut lower = values[0].clone();
        let mut upper = values[0].clone();
        let mut lengths = FxHashSet::default();
        let mut set = FxHashSet::default();

        for value in values {
            if value < lower {
                lower = value.clone();
            }
            if value > upper {
                upper = value.clone();
            }
            lengths.insert(value.len());
            set.insert(value);
        }

        Self {
            values: set,
            lengths,
            lower,
            upper,
            null_allowed,
        }
    }
}

impl Filter for BytesValues {
    fn kind(&self) -> FilterKind {
        FilterKind::BytesValues
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_bytes(&self, value: &[u8]) -> bool {
        self.lengths.contains(&value.len()) && self.values.contains(value)
    }

    fn test_length(&self, length: usize) -> bool {
        self.lengths.contains(&length)
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
            // Intersecting byte IN-sets is not part of the algebra yet.
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

    fn sample() -> BytesValues {
        BytesValues::new(
            vec![b"apple".to_vec(), b"banana".to_vec(), b"fig".to_vec()],
            false,
        )
    }

    #[test]
    fn test_membership() {
        let filter = sample();
        assert!(filter.test_bytes(b"apple"));
        assert!(filter.test_bytes(b"banana"));
        assert!(filter.test_bytes(b"fig"));
        assert!(!filter.test_bytes(b"grape"));
        assert!(!filter.test_bytes(b""));
        assert!(!filter.test_null());
    }

    #[test]
    fn test_length_short_circuit() {
        let filter = sample();
        assert!(filter.test_length(3));
        assert!(filter.test_length(5));
        assert!(filter.test_length(6));
        assert!(!filter.test_length(4));
        assert!(!filter.test_length(0));
        // "mango" has a member length but is not a member.
        assert!(!filter.test_bytes(b"mango"));
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_values_panic() {
        BytesValues::new(vec![], false);
    }

    #[test]
    fn test_statistics_pruning() {
        let filter = sample();
        // Cached bounds are ["apple", "fig"].
        assert!(!filter.test_bytes_range(Some(b"grape"), Some(b"zebra"), false));
        assert!(!filter.test_bytes_range(Some(b"aa"), Some(b"ant"), false));
        assert!(filter.test_bytes_range(Some(b"ant"), Some(b"cherry"), false));
        assert!(filter.test_bytes_range(None, None, false));
        // Degenerate chunk delegates to the membership test.
        assert!(filter.test_bytes_range(Some(b"fig"), Some(b"fig"), false));
        assert!(!filter.test_bytes_range(Some(b"fog"), Some(b"fog"), false));
    }

    #[test]
    fn test_null_short_circuit() {
        let filter = BytesValues::new(vec![b"a".to_vec()], true);
        assert!(filter.test_bytes_range(Some(b"x"), Some(b"z"), true));
        assert!(!filter.test_bytes_range(Some(b"x"), Some(b"z"), false));
    }

    #[test]
    fn test_merge_terminals_only() {
        let filter = sample();

        let merged = filter.merge_with(&crate::filter::IsNotNull::new()).unwrap();
        assert_eq!(merged.kind(), FilterKind::BytesValues);
        assert!(merged.test_bytes(b"fig"));
        assert!(!merged.test_null());

        let err = filter.merge_with(&sample()).unwrap_err();
        assert_eq!(
            err,
            Error::unsupported_combination(FilterKind::BytesValues, FilterKind::BytesValues)
        );
    }
}
