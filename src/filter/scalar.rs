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

//! Scalar leaf filters for Colsieve
//!
//! The constant filters and null checks are the terminals of the merge
//! algebra: every other variant redirects merges with these kinds here, so
//! each absorption rule lives in exactly one place.

use std::any::Any;

use super::{null_or_false, Filter, FilterKind};
use crate::core::{Error, Result};

/// Filter that accepts every input, including NULL
#[derive(Debug, Clone, Default)]
pub struct AlwaysTrue;

impl AlwaysTrue {
    /// Create a new AlwaysTrue filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for AlwaysTrue {
    fn kind(&self) -> FilterKind {
        FilterKind::AlwaysTrue
    }

    fn test_null(&self) -> bool {
        true
    }

    fn test_bool(&self, _value: bool) -> bool {
        true
    }

    fn test_int64(&self, _value: i64) -> bool {
        true
    }

    fn test_double(&self, _value: f64) -> bool {
        true
    }

    fn test_float(&self, _value: f32) -> bool {
        true
    }

    fn test_bytes(&self, _value: &[u8]) -> bool {
        true
    }

    fn test_length(&self, _length: usize) -> bool {
        true
    }

    fn test_int64_range(&self, _min: i64, _max: i64, _has_null: bool) -> bool {
        true
    }

    fn test_bytes_range(
        &self,
        _min: Option<&[u8]>,
        _max: Option<&[u8]>,
        _has_null: bool,
    ) -> bool {
        true
    }

    fn clone_filter(&self, _null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(AlwaysTrue)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        if !other.is_deterministic() {
            return Err(Error::NondeterministicMerge);
        }
        Ok(other.clone_filter(None))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Filter that rejects every input, including NULL
#[derive(Debug, Clone, Default)]
pub struct AlwaysFalse;

impl AlwaysFalse {
    /// Create a new AlwaysFalse filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for AlwaysFalse {
    fn kind(&self) -> FilterKind {
        FilterKind::AlwaysFalse
    }

    fn test_null(&self) -> bool {
        false
    }

    fn clone_filter(&self, _null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(AlwaysFalse)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        if !other.is_deterministic() {
            return Err(Error::NondeterministicMerge);
        }
        Ok(Box::new(AlwaysFalse))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Filter that accepts only NULL inputs
#[derive(Debug, Clone, Default)]
pub struct IsNull;

impl IsNull {
    /// Create a new IsNull filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for IsNull {
    fn kind(&self) -> FilterKind {
        FilterKind::IsNull
    }

    fn test_null(&self) -> bool {
        true
    }

    fn test_int64_range(&self, _min: i64, _max: i64, has_null: bool) -> bool {
        has_null
    }

    fn test_bytes_range(
        &self,
        _min: Option<&[u8]>,
        _max: Option<&[u8]>,
        has_null: bool,
    ) -> bool {
        has_null
    }

    fn clone_filter(&self, _null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(IsNull)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        if !other.is_deterministic() {
            return Err(Error::NondeterministicMerge);
        }
        if other.test_null() {
            return Ok(Box::new(IsNull));
        }
        Ok(Box::new(AlwaysFalse))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Filter that accepts every non-NULL input
#[derive(Debug, Clone, Default)]
pub struct IsNotNull;

impl IsNotNull {
    /// Create a new IsNotNull filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for IsNotNull {
    fn kind(&self) -> FilterKind {
        FilterKind::IsNotNull
    }

    fn test_null(&self) -> bool {
        false
    }

    fn test_bool(&self, _value: bool) -> bool {
        true
    }

    fn test_int64(&self, _value: i64) -> bool {
        true
    }

    fn test_double(&self, _value: f64) -> bool {
        true
    }

    fn test_float(&self, _value: f32) -> bool {
        true
    }

    fn test_bytes(&self, _value: &[u8]) -> bool {
        true
    }

    fn test_length(&self, _length: usize) -> bool {
        true
    }

    fn test_int64_range(&self, _min: i64, _max: i64, _has_null: bool) -> bool {
        true
    }

    fn test_bytes_range(
        &self,
        _min: Option<&[u8]>,
        _max: Option<&[u8]>,
        _has_null: bool,
    ) -> bool {
        true
    }

    fn clone_filter(&self, _null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(IsNotNull)
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::IsNotNull => Ok(Box::new(IsNotNull)),
            FilterKind::AlwaysFalse | FilterKind::IsNull => Ok(Box::new(AlwaysFalse)),
            _ => other.merge_with(self),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Filter matching a single boolean value
#[derive(Debug, Clone)]
pub struct BoolValue {
    /// The accepted value
    value: bool,
    /// Whether NULL inputs pass
    null_allowed: bool,
}

impl BoolValue {
    /// Create a new boolean equality filter
    pub fn new(value: bool, null_allowed: bool) -> Self {
        Self {
            value,
            null_allowed,
        }
    }
}

impl Filter for BoolValue {
    fn kind(&self) -> FilterKind {
        FilterKind::BoolValue
    }

    fn test_null(&self) -> bool {
        self.null_allowed
    }

    #[inline]
    fn test_bool(&self, value: bool) -> bool {
        value == self.value
    }

    fn clone_filter(&self, null_allowed: Option<bool>) -> Box<dyn Filter> {
        Box::new(BoolValue::new(
            self.value,
            null_allowed.unwrap_or(self.null_allowed),
        ))
    }

    fn merge_with(&self, other: &dyn Filter) -> Result<Box<dyn Filter>> {
        match other.kind() {
            FilterKind::AlwaysTrue | FilterKind::AlwaysFalse | FilterKind::IsNull => {
                other.merge_with(self)
            }
            FilterKind::IsNotNull => Ok(Box::new(BoolValue::new(self.value, false))),
            FilterKind::BoolValue => {
                let both_null_allowed = self.null_allowed && other.test_null();
                if other.test_bool(self.value) {
                    return Ok(Box::new(BoolValue::new(self.value, both_null_allowed)));
                }
                Ok(null_or_false(both_null_allowed))
            }
            _ => Err(Error::unsupported_combination(self.kind(), other.kind())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
