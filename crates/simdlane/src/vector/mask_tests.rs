#![allow(clippy::cast_precision_loss)]
//! Tests for `Mask` construction, queries and logic.

use super::{Mask, SimdVec};

#[test]
fn test_none_and_all() {
    let n = SimdVec::<u32>::lanes();
    assert!(Mask::<u32>::none().all_false());
    assert!(Mask::<u32>::all().all_true());
    assert_eq!(Mask::<u32>::all().count_true(), n);
    assert_eq!(Mask::<u32>::none().find_first_true(), None);
}

#[test]
fn test_count_true_for_every_prefix() {
    for k in 0..=SimdVec::<u8>::lanes() {
        assert_eq!(Mask::<u8>::first_n(k).count_true(), k, "u8 prefix {k}");
    }
    for k in 0..=SimdVec::<f64>::lanes() {
        let mask = Mask::<f64>::first_n(k);
        assert_eq!(mask.count_true(), k, "f64 prefix {k}");
        assert_eq!(mask.find_first_true(), (k > 0).then_some(0));
    }
}

#[test]
fn test_first_n_clamps_to_lane_count() {
    let n = SimdVec::<i16>::lanes();
    assert_eq!(Mask::<i16>::first_n(n + 10), Mask::all());
}

#[test]
fn test_find_first_true_reports_lane_index() {
    let n = SimdVec::<i32>::lanes();
    for first in 0..n {
        let mask = Mask::<i32>::from_fn(|i| i >= first);
        assert_eq!(mask.find_first_true(), Some(first));
        assert_eq!(mask.count_true(), n - first);
    }
}

#[test]
fn test_comparison_produces_mask() {
    let v = SimdVec::<f32>::iota();
    let mask = v.simd_ge(SimdVec::broadcast(1.0));
    assert!(!mask.test(0));
    assert!(mask.test(1));
    assert!(!mask.to_bools()[0]);
    assert_eq!(mask.count_true(), SimdVec::<f32>::lanes() - 1);
}

#[test]
fn test_mask_logic() {
    let even = Mask::<u16>::from_fn(|i| i % 2 == 0);
    let low = Mask::<u16>::first_n(2);
    let n = SimdVec::<u16>::lanes();

    assert_eq!((even & low).to_bools()[..2], [true, false]);
    assert_eq!((even | low).count_true(), n / 2 + 1);
    assert_eq!((even ^ even), Mask::none());
    assert_eq!(!even, Mask::from_fn(|i| i % 2 == 1));
    assert_eq!(!Mask::<u16>::none(), Mask::all());
}

#[test]
#[should_panic(expected = "out of range")]
fn test_test_panics_past_last_lane() {
    let _ = Mask::<u64>::all().test(SimdVec::<u64>::lanes());
}

#[test]
fn test_debug_lists_bools() {
    let text = format!("{:?}", Mask::<i64>::first_n(1));
    assert!(text.starts_with("Mask([true, false"));
}
