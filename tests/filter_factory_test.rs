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

//! Filter Factory Tests
//!
//! End-to-end checks of `create_bigint_values` representation selection and
//! the uniform filter surface a scan layer sees.

use colsieve::{
    create_bigint_values, BigintMultiRange, BigintRange, Filter, FilterKind, IsNotNull,
};

#[test]
fn test_contiguous_list_becomes_range() {
    let filter = create_bigint_values(&[1, 2, 3, 4, 5], false);
    assert_eq!(filter.kind(), FilterKind::BigintRange);
    assert!(filter.test_int64(1));
    assert!(filter.test_int64(3));
    assert!(filter.test_int64(5));
    assert!(!filter.test_int64(0));
    assert!(!filter.test_int64(6));
    assert!(!filter.test_null());
}

#[test]
fn test_dense_list_becomes_bitmask() {
    let filter = create_bigint_values(&[1, 100], false);
    assert_eq!(filter.kind(), FilterKind::BigintValuesUsingBitmask);
    assert!(!filter.test_int64(50));
    assert!(filter.test_int64(100));
    assert!(filter.test_int64_range(50, 200, false));
    assert!(!filter.test_int64_range(200, 300, false));
}

#[test]
fn test_sparse_list_becomes_hash_table() {
    let filter = create_bigint_values(&[1, 1_000_000_000, 2_000_000_000], false);
    assert_eq!(filter.kind(), FilterKind::BigintValuesUsingHashTable);
    assert!(filter.test_int64(1_000_000_000));
    assert!(!filter.test_int64(2));
}

#[test]
fn test_selection_is_by_shape_not_count() {
    // Same count, different spread: the representation follows the span.
    let packed: Vec<i64> = (0..64).map(|i| i * 2).collect();
    assert_eq!(
        create_bigint_values(&packed, false).kind(),
        FilterKind::BigintValuesUsingBitmask
    );

    let spread: Vec<i64> = (0..64).map(|i| i * 1_000_000).collect();
    assert_eq!(
        create_bigint_values(&spread, false).kind(),
        FilterKind::BigintValuesUsingHashTable
    );
}

#[test]
fn test_factory_and_merge_round_trip() {
    // Narrowing a hash set far enough flips its representation back down
    // the ladder: hash table -> bitmask -> range -> terminal.
    let sparse = create_bigint_values(&[0, 5000, 5003, 1 << 45], true);
    assert_eq!(sparse.kind(), FilterKind::BigintValuesUsingHashTable);

    let narrowed = sparse
        .merge_with(&BigintRange::new(4000, 6000, true))
        .expect("merges");
    assert_eq!(narrowed.kind(), FilterKind::BigintValuesUsingBitmask);

    let narrowed = narrowed
        .merge_with(&BigintRange::new(5003, 6000, true))
        .expect("merges");
    assert_eq!(narrowed.kind(), FilterKind::BigintRange);

    let narrowed = narrowed
        .merge_with(&BigintRange::new(6000, 7000, false))
        .expect("merges");
    assert_eq!(narrowed.kind(), FilterKind::AlwaysFalse);
}

#[test]
fn test_describe_forms() {
    assert_eq!(
        create_bigint_values(&[], true).describe(),
        "Filter(IsNull, deterministic, null allowed)"
    );
    assert_eq!(
        create_bigint_values(&[7], false).describe(),
        "Filter(BigintRange, deterministic, null not allowed)"
    );
    assert_eq!(
        IsNotNull::new().describe(),
        "Filter(IsNotNull, deterministic, null not allowed)"
    );
}

#[test]
fn test_filters_are_shareable_across_threads() {
    let filter = create_bigint_values(&[2, 5, 9, 4096], false);
    let multi = BigintMultiRange::new(
        vec![BigintRange::new(0, 10, false), BigintRange::new(100, 200, false)],
        false,
    );

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for value in 0..5000 {
                    let expected = [2, 5, 9, 4096].contains(&value);
                    assert_eq!(filter.test_int64(value), expected);
                }
                let merged = filter.merge_with(&multi).expect("merges");
                assert!(merged.test_int64(2));
                assert!(!merged.test_int64(4096));
            });
        }
    });
}
