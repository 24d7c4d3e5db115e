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

//! # Colsieve - scalar filter predicates for columnar scans
//!
//! Colsieve provides the closed family of filter predicates a columnar
//! reader pushes down into its scan: per-value tests invoked while decoding
//! pages, pruning tests over column chunk min/max statistics that skip whole
//! chunks, and a conjunction algebra that rewrites the AND of two filters
//! into the canonical smallest member of the family.
//!
//! ## Key Features
//!
//! - **Closed variant set** - boolean, integer, float, and byte string
//!   predicates behind one [`Filter`] trait
//! - **Adaptive IN-sets** - [`create_bigint_values`] picks a contiguous
//!   range, a dense bitmap, or an open-addressed hash set by value shape
//! - **Chunk pruning** - conservative range tests over statistics; never a
//!   false negative against data actually in the chunk
//! - **Conjunction algebra** - [`Filter::merge_with`] canonicalises
//!   pairwise intersections, including disjunctive containers
//! - **Thread-safe by construction** - filters are immutable and
//!   `Send + Sync`; share them freely across scan threads
//!
//! ## Quick Start
//!
//! ```rust
//! use colsieve::{create_bigint_values, BigintRange, Filter, FilterKind};
//!
//! // IN (1, 2, 3, 4, 5) collapses to the contiguous range [1, 5].
//! let values = create_bigint_values(&[1, 2, 3, 4, 5], false);
//! assert_eq!(values.kind(), FilterKind::BigintRange);
//! assert!(values.test_int64(3));
//! assert!(!values.test_int64(6));
//!
//! // A planner pushing two predicates onto one column merges them.
//! let pushed = BigintRange::new(0, 10, true)
//!     .merge_with(&BigintRange::new(5, 20, false))
//!     .unwrap();
//! assert!(pushed.test_int64(7));
//! assert!(!pushed.test_int64(3));
//! assert!(!pushed.test_null());
//!
//! // Chunk statistics [50, 200] cannot contain a match for [5, 10].
//! assert!(!pushed.test_int64_range(50, 200, false));
//! ```

pub mod core;
pub mod filter;

pub use crate::core::{Error, Result};
pub use crate::filter::{
    create_bigint_values, AlwaysFalse, AlwaysTrue, BigintMultiRange, BigintRange,
    BigintValuesUsingBitmask, BigintValuesUsingHashTable, BoolValue, BytesRange, BytesValues,
    DoubleRange, Filter, FilterKind, FloatRange, FloatingPointRange, FloatingPointValue,
    IsNotNull, IsNull, MultiRange,
};
