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

//! Filter system for Colsieve
//!
//! This module provides the closed family of scalar predicates used for
//! filtering and pruning columnar scans.
//!
//! # Filter Types
//!
//! - [`AlwaysTrue`], [`AlwaysFalse`] - Constant filters
//! - [`IsNull`], [`IsNotNull`] - Null checks
//! - [`BoolValue`] - Boolean equality
//! - [`BigintRange`] - Closed integer interval
//! - [`BigintValuesUsingBitmask`], [`BigintValuesUsingHashTable`] - Integer
//!   IN-sets; [`create_bigint_values`] picks the representation
//! - [`DoubleRange`], [`FloatRange`] - Floating point intervals
//! - [`BytesRange`], [`BytesValues`] - Byte string interval and IN-set
//! - [`BigintMultiRange`] - Ordered disjunction of integer ranges
//! - [`MultiRange`] - Heterogeneous disjunction for non-integer domains

pub mod bigint_multi_range;
pub mod bigint_range;
pub mod bigint_values;
pub mod bytes_range;
pub mod bytes_values;
pub mod float_range;
pub mod multi_range;
pub mod scalar;

use std::any::Any;
use std::fmt;

use crate::core::Result;

// Re-export filter types
pub use bigint_multi_range::BigintMultiRange;
pub use bigint_range::BigintRange;
pub use bigint_values::{
    create_bigint_values, BigintValuesUsingBitmask, BigintValuesUsingHashTable,
};
pub use bytes_range::BytesRange;
pub use bytes_values::BytesValues;
pub use float_range::{DoubleRange, FloatRange, FloatingPointRange, FloatingPointValue};
pub use multi_range::MultiRange;
pub use scalar::{AlwaysFalse, AlwaysTrue, BoolValue, IsNotNull, IsNull};

/// Tag identifying a concrete filter variant
///
/// The set is closed: `merge_with` is defined by exhaustive case analysis
/// over these tags, so adding a variant is a breaking change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    AlwaysFalse,
    AlwaysTrue,
    IsNull,
    IsNotNull,
    BoolValue,
    BigintRange,
    BigintValuesUsingHashTable,
    BigintValuesUsingBitmask,
    DoubleRange,
    FloatRange,
    BytesRange,
    BytesValues,
    BigintMultiRange,
    MultiRange,
}

impl FilterKind {
    /// Returns the variant name used in debug output
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::AlwaysFalse => "AlwaysFalse",
            FilterKind::AlwaysTrue => "AlwaysTrue",
            FilterKind::IsNull => "IsNull",
            FilterKind::IsNotNull => "IsNotNull",
            FilterKind::BoolValue => "BoolValue",
            FilterKind::BigintRange => "BigintRange",
            FilterKind::BigintValuesUsingHashTable => "BigintValuesUsingHashTable",
            FilterKind::BigintValuesUsingBitmask => "BigintValuesUsingBitmask",
            FilterKind::DoubleRange => "DoubleRange",
            FilterKind::FloatRange => "FloatRange",
            FilterKind::BytesRange => "BytesRange",
            FilterKind::BytesValues => "BytesValues",
            FilterKind::BigintMultiRange => "BigintMultiRange",
            FilterKind::MultiRange => "MultiRange",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filter trait for scalar predicates over columnar data
///
/// A filter answers three questions: does a single value pass, may any value
/// in a chunk described by min/max statistics pass, and what is the canonical
/// form of this filter ANDed with another.
///
/// Per-value tests default to denying membership; concrete variants override
/// only the tests relevant to their domain. The same holds for the pruning
/// tests: a filter only answers pruning queries for domains it applies to.
///
/// Filters are immutable after construction, so shared references may be
/// tested, cloned, and merged from multiple threads without synchronisation.
pub trait Filter: fmt::Debug + Send + Sync {
    /// The variant tag, used by `merge_with` to dispatch
    fn kind(&self) -> FilterKind;

    /// Whether this filter is a pure function of its input
    ///
    /// Every variant in this crate is deterministic; `merge_with` refuses
    /// to combine filters that report otherwise.
    fn is_deterministic(&self) -> bool {
        true
    }

    /// Does a NULL input satisfy this filter?
    fn test_null(&self) -> bool;

    /// Test a boolean value
    fn test_bool(&self, _value: bool) -> bool {
        false
    }

    /// Test a 64-bit signed integer value
    fn test_int64(&self, _value: i64) -> bool {
        false
    }

    /// Test a 64-bit float value
    fn test_double(&self, _value: f64) -> bool {
        false
    }

    /// Test a 32-bit float value
    fn test_float(&self, _value: f32) -> bool {
        false
    }

    /// Test a byte string value
    fn test_bytes(&self, _value: &[u8]) -> bool {
        false
    }

    /// Length-only short-circuit for byte string filters
    ///
    /// Returns false only if no value of the given length can pass, e.g.
    /// equality against a fixed-length literal.
    fn test_length(&self, _length: usize) -> bool {
        false
    }

    /// Pruning test over integer chunk statistics
    ///
    /// Returns true if the filter may match at least one value in a chunk
    /// whose values span `[min, max]`, with `has_null` indicating the chunk
    /// contains NULLs. A true result with no actual match is permitted; a
    /// false result must guarantee no value in the chunk passes.
    fn test_int64_range(&self, _min: i64, _max: i64, _has_null: bool) -> bool {
        false
    }

    /// Pruning test over byte string chunk statistics
    ///
    /// `min`/`max` are absent when the corresponding statistic is unknown.
    /// Same conservative contract as [`Filter::test_int64_range`].
    fn test_bytes_range(
        &self,
        _min: Option<&[u8]>,
        _max: Option<&[u8]>,
        _has_null: bool,
    ) -> bool {
        false
    }

    /// Deep copy, optionally overriding the null-acceptance flag
    ///
    /// The merge algebra rewrites null acceptance on combination, e.g.
    /// `IsNotNull AND x` clones `x` with nulls disallowed.
    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter>;

    /// Conjunction: a canonical filter equivalent to `self AND other`
    ///
    /// Neither input is mutated. Fails only for combinations outside the
    /// declared algebra (e.g. bytes-on-bytes) and for nondeterministic
    /// inputs; both are programmer errors, not user-level failures.
    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>>;

    /// Debug form: `Filter(<Kind>, <determinism>, <null acceptance>)`
    fn describe(&self) -> String {
        format!(
            "Filter({}, {}, {})",
            self.kind(),
            if self.is_deterministic() {
                "deterministic"
            } else {
                "nondeterministic"
            },
            if self.test_null() {
                "null allowed"
            } else {
                "null not allowed"
            }
        )
    }

    /// Get a reference to the filter as Any for downcasting
    ///
    /// Merge implementations match on `kind()` and then downcast to reach
    /// the payload of the other side.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.clone_filter(None)
    }
}

/// Canonical form of an empty value set: IsNull keeps null acceptance,
/// AlwaysFalse rejects everything.
pub(crate) fn null_or_false(null_allowed: bool) -> Box<dyn Filter> {
    if null_allowed {
        Box::new(IsNull::new())
    } else {
        Box::new(AlwaysFalse::new())
    }
}
