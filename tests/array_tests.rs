//! Integration tests for the growable array
//!
//! Covers the capacity policy and the index contract of every operation

use ledit::error::EditError;
use ledit::GrowableArray;

#[test]
fn test_zero_initial_capacity_is_rejected() {
    let result = GrowableArray::<u8>::with_capacity(0);
    assert!(matches!(result, Err(EditError::InvalidInput(_))));
}

#[test]
fn test_growth_doubles_capacity() {
    let mut array = GrowableArray::with_capacity(2).unwrap();
    array.append(1).unwrap();
    array.append(2).unwrap();
    assert_eq!(array.capacity(), 2);

    array.append(3).unwrap();
    assert_eq!(array.capacity(), 4);

    array.append(4).unwrap();
    array.append(5).unwrap();
    assert_eq!(array.capacity(), 8);
    assert_eq!(array.as_slice(), &[1, 2, 3, 4, 5]);
}

#[test]
fn test_shrink_moves_capacity_to_midpoint() {
    let mut array = GrowableArray::with_capacity(8).unwrap();
    for value in 0..5 {
        array.append(value).unwrap();
    }
    assert_eq!(array.capacity(), 8);

    // len 4 <= 8 / 2: shrink to 8 - (8 - 4) / 2 = 6
    array.remove(0).unwrap();
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 6);

    // len 3 <= 6 / 2: shrink to 6 - (6 - 3) / 2 = 5
    array.remove(0).unwrap();
    assert_eq!(array.capacity(), 5);
}

#[test]
fn test_alternating_insert_remove_at_boundary_is_stable() {
    let mut array = GrowableArray::with_capacity(4).unwrap();
    for value in 0..4 {
        array.append(value).unwrap();
    }
    array.remove(3).unwrap();
    let settled = array.capacity();

    for _ in 0..10 {
        array.append(9).unwrap();
        array.remove(3).unwrap();
        assert_eq!(array.capacity(), settled);
    }
}

#[test]
fn test_growth_shrink_round_trip_keeps_invariants() {
    let mut array = GrowableArray::new();
    let n = 200;

    for value in 0..n {
        array.append(value).unwrap();
        assert!(array.len() <= array.capacity());
    }
    for index in 0..array.len() {
        assert_eq!(*array.get(index).unwrap(), index);
    }

    for removed in 0..n {
        array.remove(0).unwrap();
        assert!(array.len() <= array.capacity());
        assert!(array.capacity() >= 1);
        // never more than twice the room needed once shrinking has caught up
        if array.len() > 0 {
            assert!(array.capacity() <= (array.len() * 4).max(4));
        }
        for index in 0..array.len() {
            assert_eq!(*array.get(index).unwrap(), removed + 1 + index);
        }
    }
    assert!(array.is_empty());
}

#[test]
fn test_insert_then_remove_restores_sequence() {
    let original: Vec<char> = "abcdef".chars().collect();
    for index in 0..=original.len() {
        let mut array = GrowableArray::try_from_iter(original.iter().copied()).unwrap();
        array.insert(index, 'X').unwrap();
        assert_eq!(array.len(), original.len() + 1);
        assert_eq!(*array.get(index).unwrap(), 'X');

        assert_eq!(array.remove(index).unwrap(), 'X');
        assert_eq!(array.as_slice(), original.as_slice());
    }
}

#[test]
fn test_out_of_range_indices_are_index_errors() {
    let mut array = GrowableArray::try_from_iter([1, 2, 3]).unwrap();

    assert!(matches!(array.get(3), Err(EditError::Index { index: 3, len: 3 })));
    assert!(matches!(array.set(5, 0), Err(EditError::Index { .. })));
    assert!(matches!(array.swap(0, 3), Err(EditError::Index { .. })));
    assert!(matches!(array.insert(4, 0), Err(EditError::Index { .. })));
    assert!(matches!(array.remove(3), Err(EditError::Index { .. })));

    // nothing changed
    assert_eq!(array.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_set_and_swap() {
    let mut array = GrowableArray::try_from_iter(["a", "b", "c"]).unwrap();
    assert_eq!(array.set(1, "B").unwrap(), "b");
    array.swap(0, 2).unwrap();
    assert_eq!(array.as_slice(), &["c", "B", "a"]);
}

#[test]
fn test_reserve_grows_by_doubling() {
    let mut array: GrowableArray<u32> = GrowableArray::with_capacity(3).unwrap();
    array.reserve(10).unwrap();
    assert_eq!(array.capacity(), 12);

    let before = array.capacity();
    array.reserve(5).unwrap();
    assert_eq!(array.capacity(), before);
}

#[test]
fn test_split_off_and_append_all() {
    let mut array = GrowableArray::try_from_iter(1..=6).unwrap();
    let tail = array.split_off(4).unwrap();
    assert_eq!(array.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(tail.as_slice(), &[5, 6]);

    array.append_all(tail).unwrap();
    assert_eq!(array.as_slice(), &[1, 2, 3, 4, 5, 6]);

    assert!(array.split_off(7).is_err());
}

#[test]
fn test_clear_and_truncate() {
    let mut array = GrowableArray::try_from_iter(0..16).unwrap();
    array.truncate(10);
    assert_eq!(array.len(), 10);
    array.truncate(20);
    assert_eq!(array.len(), 10);

    array.clear();
    assert!(array.is_empty());
    assert!(array.capacity() >= 1);
    assert_eq!(array.first(), None);
}
