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

//! Heterogeneous filter disjunction for Colsieve
//!
//! `MultiRange` is the OR container for the non-integer domains (floats and
//! byte strings); integer disjunctions use the ordered
//! `BigintMultiRange` instead.

use std::any::Any;

use super::{null_or_false, Filter, FilterKind};
use crate::core::{Error, Result};

/// Disjunction of filters over a non-integer domain
///
/// Every test is the OR over the children, except NaN: the container's own
/// `nan_allowed` flag decides NaN inputs without consulting children.
#[derive(Debug, Clone)]
pub struct MultiRange {
    /// Child filters
    filters: Vec<Box<dyn Filter>>,
    /// Whether NULL inputs pass
    null_allowed: bool,
    /// Whether NaN inputs pass
    nan_allowed: bool,
}

impl MultiRange {
    /// Create a new disjunction
    ///
    /// # Panics
    ///
    /// Panics if no child filters are given.
    pub fn new(filters: Vec<Box<dyn Filter>>, null_allowed: bool, nan_allowed: bool) -> Self {
        assert!(!filters.is_empty(), "filters must not be empty");
        Self {
            filters,
            null_allowed,
            nan_allowed,
        }
    }

    /// Get the child filters
    pub fn filters(&self) -> &[Box<dyn Filter>] {
        &self.filters
    }

    /// Whether NaN inputs pass
    pub fn nan_allowed(&self) -> bool {
        self.nan_allowed
    }
}

impl Filter for MultiRange {
    fn kind(&self) -> FilterKind {
        FilterKind::MultiRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    fn test_double(&self, value: f64) -> bool {
        if value.is_nan() {
            return self.nan_allowed;
        }
        self.filters.iter().any(|filter| filter.test_double(value))
    }

    fn test_float(&self, value: f32) -> bool {
        if value.is_nan() {
            return self.nan_allowed;
        }
        self.filters.iter().any(|filter| filter.test_float(value))
    }

    fn test_bytes(&self, value: &[u8]) -> bool {
        self.filters.iter().any(|filter| filter.test_bytes(value))
    }

    fn test_length(&self, length: usize) -> bool {
        self.filters.iter().any(|filter| filter.test_length(length))
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
        self.filters
            .iter()
            .any(|filter| filter.test_bytes_range(min, max, has_null))
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(MultiRange::new(
            self.filters.clone(),
            null_allowed.unwrap_or(self.null_allowed),
            self.nan_allowed,
        ))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(self.clone_filter(Some(false))),
            FilterKind::DoubleRange
            | FilterKind::FloatRange
            | FilterKind::BytesRange
            | FilterKind::BytesValues => {
                Err(Error::unsupported_combination(self.kind(), other.kind()))
            }
            FilterKind::MultiRange => {
                let Some(other_multi) = other.as_any().downcast_ref::<MultiRange>() else {
                    return Err(Error::unsupported_combination(self.kind(), other.kind()));
                };
                let both_null_allowed = self.null_allowed && other.test_null();
                let both_nan_allowed = self.nan_allowed && other_multi.nan_allowed;

                let mut merged = Vec::new();
                for filter in &self.filters {
                    for other_filter in other_multi.filters() {
                        let inner = filter.merge_with(other_filter.as_ref())?;
                        match inner.kind() {
                            FilterKind::AlwaysFalse | FilterKind::IsNull => {}
                            _ => merged.push(inner),
                        }
                    }
                }

                match merged.len() {
                    0 => Ok(null_or_false(both_null_allowed)),
                    1 => Ok(merged[0].clone_filter(Some(both_null_allowed))),
                    _ => Ok(Box::new(MultiRange::new(
                        merged,
                        both_null_allowed,
                        both_nan_allowed,
                    ))),
                }
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
    use crate::filter::{BytesRange, BytesValues, DoubleRange, IsNotNull};

    fn bytes_disjunction() -> MultiRange {
        MultiRange::new(
            vec![
                Box::new(BytesRange::new(
                    b"a".as_slice(),
                    false,
                    false,
                    b"c",
                    false,
                    false,
                    false,
                )),
                Box::new(BytesValues::new(vec![b"x".to_vec(), b"zz".to_vec()], false)),
            ],
            false,
            false,
        )
    }

    #[test]
    fn test_bytes_disjunction() {
        let filter = bytes_disjunction();
        assert!(filter.test_bytes(b"a"));
        assert!(filter.test_bytes(b"bb"));
        assert!(filter.test_bytes(b"x"));
        assert!(filter.test_bytes(b"zz"));
        assert!(!filter.test_bytes(b"d"));
        assert!(!filter.test_bytes(b"z"));
        assert!(filter.test_length(1));
        assert!(filter.test_length(2));
        assert!(!filter.test_null());
    }

    #[test]
    fn test_bytes_range_pruning() {
        let filter = bytes_disjunction();
        // Overlaps the second child only.
        assert!(filter.test_bytes_range(Some(b"w"), Some(b"y"), false));
        // Between the children.
        assert!(!filter.test_bytes_range(Some(b"d"), Some(b"e"), false));
    }

    #[test]
    fn test_double_disjunction_with_nan() {
        let filter = MultiRange::new(
            vec![
                Box::new(DoubleRange::new(
                    0.0, false, false, 1.0, false, false, false, false,
                )),
                Box::new(DoubleRange::new(
                    10.0, false, false, 20.0, false, false, true, false,
                )),
            ],
            false,
            false,
        );
        assert!(filter.test_double(0.5));
        assert!(filter.test_double(15.0));
        assert!(!filter.test_double(5.0));
        // The container flag overrides the NaN-accepting child.
        assert!(!filter.test_double(f64::NAN));

        let nan_ok = MultiRange::new(
            vec![Box::new(DoubleRange::new(
                0.0, false, false, 1.0, false, false, false, false,
            ))],
            false,
            true,
        );
        assert!(nan_ok.test_double(f64::NAN));
    }

    #[test]
    fn test_merge_with_terminals() {
        let filter = bytes_disjunction();

        let merged = filter.merge_with(&IsNotNull::new()).unwrap();
        assert_eq!(merged.kind(), FilterKind::MultiRange);
        assert!(merged.test_bytes(b"b"));
        assert!(!merged.test_null());

        let merged = filter
            .merge_with(&crate::filter::AlwaysTrue::new())
            .unwrap();
        assert_eq!(merged.kind(), FilterKind::MultiRange);

        let merged = filter.merge_with(&crate::filter::IsNull::new()).unwrap();
        assert_eq!(merged.kind(), FilterKind::AlwaysFalse);
    }

    #[test]
    fn test_merge_multi_ranges_propagates_unimplemented_children() {
        // Pairwise byte merges are not part of the algebra, so the
        // Cartesian product surfaces the unsupported combination.
        let a = bytes_disjunction();
        let b = bytes_disjunction();
        let err = a.merge_with(&b).unwrap_err();
        assert_eq!(
            err,
            Error::unsupported_combination(FilterKind::BytesRange, FilterKind::BytesRange)
        );
    }

    #[test]
    fn test_merge_with_plain_bytes_filter_is_unsupported() {
        let a = bytes_disjunction();
        let err = a
            .merge_with(&BytesRange::equal_to(b"q".to_vec(), false))
            .unwrap_err();
        assert_eq!(
            err,
            Error::unsupported_combination(FilterKind::MultiRange, FilterKind::BytesRange)
        );
    }
}
