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

//! Error types for Colsieve
//!
//! Every error is raised at construction or merge time; the per-value and
//! pruning test paths are infallible.

use thiserror::Error;

use crate::filter::FilterKind;

/// Result type alias for Colsieve operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for filter construction and merging
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Merging the two filter kinds is not part of the supported algebra
    #[error("unsupported filter combination: {left} AND {right}")]
    UnsupportedCombination {
        left: FilterKind,
        right: FilterKind,
    },

    /// Only deterministic filters can be merged
    #[error("cannot merge nondeterministic filters")]
    NondeterministicMerge,
}

impl Error {
    /// Create a new UnsupportedCombination error
    pub fn unsupported_combination(left: FilterKind, right: FilterKind) -> Self {
        Error::UnsupportedCombination { left, right }
    }
}
