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

//! Floating point range filters for Colsieve
//!
//! `DoubleRange` and `FloatRange` share one skeleton with per-endpoint
//! exclusivity and unbounded sides. NaN never satisfies an ordered
//! comparison; whether it passes at all is a separate `nan_allowed` flag.

use std::any::Any;
use std::fmt;

use super::{Filter, FilterKind};
use crate::core::{Error, Result};

mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating point scalar usable in range filters; implemented for `f32`
/// and `f64` only.
pub trait FloatingPointValue: Copy + PartialOrd + fmt::Debug + private::Sealed {
    /// Whether the value is NaN
    fn is_nan(self) -> bool;
}

impl FloatingPointValue for f64 {
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}

impl FloatingPointValue for f32 {
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

/// Interval filter over a floating point type
///
/// Endpoints may independently be unbounded or exclusive. Use the
/// [`DoubleRange`] and [`FloatRange`] aliases.
#[derive(Debug, Clone)]
pub struct FloatingPointRange<T> {
    /// Lower bound; ignored when `lower_unbounded`
    lower: T,
    /// Upper bound; ignored when `upper_unbounded`
    upper: T,
    /// No lower bound
    lower_unbounded: bool,
    /// No upper bound
    upper_unbounded: bool,
    /// Lower bound excluded from the interval
    lower_exclusive: bool,
    /// Upper bound excluded from the interval
    upper_exclusive: bool,
    /// Whether NaN inputs pass
    nan_allowed: bool,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

/// Range filter over 64-bit floats
pub type DoubleRange = FloatingPointRange<f64>;

/// Range filter over 32-bit floats
pub type FloatRange = FloatingPointRange<f32>;

impl<T: FloatingPointValue> FloatingPointRange<T> {
    /// Create a new floating point range filter
    ///
    /// # Panics
    ///
    /// Panics if a bounded endpoint is NaN, or if both endpoints are bounded
    /// and out of order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lower: T,
        lower_unbounded: bool,
        lower_exclusive: bool,
        upper: T,
        upper_unbounded: bool,
        upper_exclusive: bool,
        nan_allowed: bool,
        null_allowed: bool,
    ) -> Self {
        assert!(
            lower_unbounded || !lower.is_nan(),
            "lower bound must not be NaN"
        );
        assert!(
            upper_unbounded || !upper.is_nan(),
            "upper bound must not be NaN"
        );
        if !lower_unbounded && !upper_unbounded {
            assert!(lower <= upper, "lower must not exceed upper");
        }

        Self {
            lower,
            upper,
            lower_unbounded,
            upper_unbounded,
            lower_exclusive,
            upper_exclusive,
            nan_allowed,
            null_allowed,
        }
    }

    #[inline]
    fn test_value(&self, value: T) -> bool {
        if value.is_nan() {
            return self.nan_allowed;
        }
        if !self.lower_unbounded {
            if value < self.lower {
                return false;
            }
            if self.lower_exclusive && value == self.lower {
                return false;
            }
        }
        if !self.upper_unbounded {
            if value > self.upper {
                return false;
            }
            if self.upper_exclusive && value == self.upper {
                return false;
            }
        }
        true
    }

    fn clone_with(&self, null_allowed: Option<bool>) -> Self {
        let mut copy = self.clone();
        copy.null_allowed = null_allowed.unwrap_or(self.null_allowed);
        copy
    }
}

impl Filter for DoubleRange {
    fn kind(&self) -> FilterKind {
        FilterKind::DoubleRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_double(&self, value: f64) -> bool {
        self.test_value(value)
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(self.clone_with(null_allowed))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(self.clone_filter(Some(false))),
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Filter for FloatRange {
    fn kind(&self) -> FilterKind {
        FilterKind::FloatRange
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_float(&self, value: f32) -> bool {
        self.test_value(value)
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(self.clone_with(null_allowed))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(self.clone_filter(Some(false))),
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

    fn closed(lower: f64, upper: f64) -> DoubleRange {
        DoubleRange::new(lower, false, false, upper, false, false, false, false)
    }

    #[test]
    fn test_closed_interval() {
        let filter = closed(1.5, 3.5);
        assert!(filter.test_double(1.5));
        assert!(filter.test_double(2.0));
        assert!(filter.test_double(3.5));
        assert!(!filter.test_double(1.4999));
        assert!(!filter.test_double(3.5001));
    }

    #[test]
    fn test_exclusive_endpoints() {
        let filter = DoubleRange::new(1.0, false, true, 2.0, false, true, false, false);
        assert!(!filter.test_double(1.0));
        assert!(!filter.test_double(2.0));
        assert!(filter.test_double(1.5));
    }

    #[test]
    fn test_unbounded_sides() {
        let below = DoubleRange::new(0.0, true, false, 10.0, false, false, false, false);
        assert!(below.test_double(f64::MIN));
        assert!(below.test_double(10.0));
        assert!(!below.test_double(10.1));

        let above = DoubleRange::new(10.0, false, true, 0.0, true, false, false, false);
        assert!(!above.test_double(10.0));
        assert!(above.test_double(10.1));
        assert!(above.test_double(f64::MAX));
    }

    #[test]
    fn test_nan_handling() {
        let filter = closed(0.0, 100.0);
        assert!(!filter.test_double(f64::NAN));

        let with_nan = DoubleRange::new(0.0, false, false, 100.0, false, false, true, false);
        assert!(with_nan.test_double(f64::NAN));
        // NaN acceptance does not widen the ordered interval.
        assert!(!with_nan.test_double(200.0));
    }

    #[test]
    #[should_panic(expected = "must not be NaN")]
    fn test_nan_bound_panics() {
        closed(f64::NAN, 1.0);
    }

    #[test]
    fn test_float_range() {
        let filter = FloatRange::new(-1.0f32, false, false, 1.0f32, false, false, false, true);
        assert!(filter.test_float(0.0));
        assert!(filter.test_float(-1.0));
        assert!(!filter.test_float(1.5));
        assert!(!filter.test_float(f32::NAN));
        assert!(filter.test_null());
        // A float range answers only float queries.
        assert!(!filter.test_double(0.0));
    }

    #[test]
    fn test_merge_terminals_only() {
        let filter = closed(0.0, 1.0);

        let merged = filter.merge_with(&crate::filter::IsNotNull::new()).unwrap();
        assert_eq!(merged.kind(), FilterKind::DoubleRange);
        assert!(!merged.test_null());

        let merged = filter.merge_with(&crate::filter::AlwaysFalse::new()).unwrap();
        assert_eq!(merged.kind(), FilterKind::AlwaysFalse);

        let err = filter.merge_with(&closed(0.5, 2.0)).unwrap_err();
        assert_eq!(
            err,
            crate::core::Error::unsupported_combination(
                FilterKind::DoubleRange,
                FilterKind::DoubleRange
            )
        );
    }
}
