//! Numeric range filters through the full write pipeline.

use super::{NUMERIC, fixture, put_i32};
use crate::{FilterInfo, SearchOutcome};

#[test]
fn range_filter_matches_only_docs_in_bounds() {
    let (index, store, _dir) = fixture();
    put_i32(&store, &index, 5, 100);
    put_i32(&store, &index, 7, 200);
    put_i32(&store, &index, 9, 150);
    index.quiesce();

    let outcome = index.search(&[FilterInfo::range(
        NUMERIC,
        120i32.to_le_bytes(),
        180i32.to_le_bytes(),
    )]);
    let SearchOutcome::Matched(result) = &outcome else {
        panic!("range [120, 180] should match, got {outcome:?}");
    };
    assert!(result.matches(9), "doc 9 holds key 150");
    assert!(!result.matches(5), "doc 5 holds key 100");
    assert!(!result.matches(7), "doc 7 holds key 200");
    assert!(result.doc_count() >= 1);
}

#[test]
fn range_filter_handles_negative_bounds() {
    let (index, store, _dir) = fixture();
    put_i32(&store, &index, 1, -500);
    put_i32(&store, &index, 2, -10);
    put_i32(&store, &index, 3, 25);
    index.quiesce();

    let outcome = index.search(&[FilterInfo::range(
        NUMERIC,
        (-100i32).to_le_bytes(),
        30i32.to_le_bytes(),
    )]);
    assert!(!outcome.matches(1));
    assert!(outcome.matches(2) && outcome.matches(3));
}

#[test]
fn out_of_range_filter_is_empty() {
    let (index, store, _dir) = fixture();
    put_i32(&store, &index, 1, 10);
    index.quiesce();

    let outcome = index.search(&[FilterInfo::range(
        NUMERIC,
        900i32.to_le_bytes(),
        999i32.to_le_bytes(),
    )]);
    assert!(matches!(outcome, SearchOutcome::Empty), "got {outcome:?}");
}

#[test]
fn delete_unmatches_doc() {
    let (index, store, _dir) = fixture();
    put_i32(&store, &index, 1, 10);
    put_i32(&store, &index, 2, 12);
    index.quiesce();

    index.delete(1, NUMERIC).unwrap();
    index.quiesce();

    let filter = FilterInfo::range(NUMERIC, 0i32.to_le_bytes(), 100i32.to_le_bytes());
    let outcome = index.search(&[filter]);
    assert!(!outcome.matches(1), "doc 1 was deleted");
    assert!(outcome.matches(2));
}

#[test]
fn writes_without_index_are_accepted_and_ignored() {
    let (index, store, _dir) = fixture();
    store.put(42, 99, 7i32.to_le_bytes());
    index.add(42, 99).unwrap();
    index.quiesce();

    // Filtering on the unindexed field leaves the query unconstrained.
    let outcome = index.search(&[FilterInfo::range(
        99,
        0i32.to_le_bytes(),
        10i32.to_le_bytes(),
    )]);
    assert!(matches!(outcome, SearchOutcome::Unconstrained));
    assert!(outcome.matches(42) && outcome.matches(7));
}

#[test]
fn memory_usage_tracks_posting_buffers() {
    let (index, store, _dir) = fixture();
    for doc in 0..10 {
        put_i32(&store, &index, doc, (doc as i32) % 3);
    }
    index.quiesce();

    let usage = index.memory_usage();
    assert_eq!(usage.posting_sets, 3, "three distinct keys");
    assert!(usage.dense_bytes > 0);
    assert_eq!(usage.sparse_bytes, 0, "small fresh sets stay dense");
}
