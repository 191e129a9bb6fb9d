#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::float_cmp
)]
//! Tests for arithmetic, comparisons, reductions and shifts on `SimdVec`.

use super::SimdVec;
use crate::simd_native::detect_and_bind;

#[test]
fn test_add_scenario() {
    let n = SimdVec::<f32>::lanes();
    let a = SimdVec::from_fn(|i| (i % 4 + 1) as f32);
    let b = SimdVec::from_fn(|i| ((i % 4 + 1) * 10) as f32);
    let sum = a + b;
    for i in 0..n {
        assert_eq!(sum.lane(i), ((i % 4 + 1) * 11) as f32);
    }
}

#[test]
fn test_integer_arithmetic_wraps() {
    let max = SimdVec::broadcast(i32::MAX);
    let one = SimdVec::broadcast(1i32);
    assert!((max + one).as_slice().iter().all(|&x| x == i32::MIN));
    assert!((SimdVec::broadcast(0u8) - SimdVec::broadcast(1u8)).as_slice().iter().all(|&x| x == 255));
    assert!((SimdVec::broadcast(16i8) * SimdVec::broadcast(16i8)).as_slice().iter().all(|&x| x == 0));
    assert!((SimdVec::broadcast(300u16) * SimdVec::broadcast(300u16))
        .as_slice()
        .iter()
        .all(|&x| x == 300u16.wrapping_mul(300)));
}

#[test]
fn test_i64_multiply_and_negate() {
    let a = SimdVec::<i64>::from_fn(|i| i as i64 - 2);
    let b = SimdVec::broadcast(-3i64);
    let product = a * b;
    for i in 0..SimdVec::<i64>::lanes() {
        assert_eq!(product.lane(i), (i as i64 - 2) * -3);
    }
    assert_eq!((-a).lane(0), 2);
    assert_eq!(SimdVec::broadcast(i64::MIN).abs().lane(0), i64::MIN);
}

#[test]
fn test_assign_operators() {
    let mut v = SimdVec::broadcast(2.0f64);
    v += SimdVec::broadcast(1.0);
    v *= SimdVec::broadcast(4.0);
    v -= SimdVec::broadcast(2.0);
    v /= SimdVec::broadcast(5.0);
    assert!(v.as_slice().iter().all(|&x| x == 2.0));
}

#[test]
fn test_float_min_max_with_nan_return_other_operand() {
    let nan = SimdVec::broadcast(f32::NAN);
    let three = SimdVec::broadcast(3.0f32);
    assert!(nan.min(three).as_slice().iter().all(|&x| x == 3.0));
    assert!(three.min(nan).as_slice().iter().all(|&x| x == 3.0));
    assert!(nan.max(three).as_slice().iter().all(|&x| x == 3.0));
    assert!(three.max(nan).as_slice().iter().all(|&x| x == 3.0));

    let nan64 = SimdVec::broadcast(f64::NAN);
    assert!(nan64.max(SimdVec::broadcast(-1.0)).as_slice().iter().all(|&x| x == -1.0));
}

#[test]
fn test_integer_min_max() {
    let a = SimdVec::<u64>::iota();
    let b = SimdVec::broadcast(1u64);
    assert_eq!(a.min(b).lane(0), 0);
    assert_eq!(a.max(b).lane(0), 1);
    let s = SimdVec::broadcast(-5i8);
    assert!(s.min(SimdVec::broadcast(3)).as_slice().iter().all(|&x| x == -5));
}

#[test]
fn test_comparisons_with_nan() {
    let nan = SimdVec::broadcast(f64::NAN);
    let one = SimdVec::broadcast(1.0f64);
    assert!(nan.simd_eq(nan).all_false());
    assert!(nan.simd_lt(one).all_false());
    assert!(nan.simd_ge(one).all_false());
    assert!(nan.simd_ne(nan).all_true());
    assert!(one.simd_ne(nan).all_true());
}

#[test]
fn test_unsigned_comparisons_use_unsigned_order() {
    let big = SimdVec::broadcast(0x8000_0000u32);
    let small = SimdVec::broadcast(1u32);
    assert!(big.simd_gt(small).all_true());
    assert!(small.simd_lt(big).all_true());
    assert!(big.simd_le(big).all_true());
    let b8 = SimdVec::broadcast(200u8);
    assert!(b8.simd_gt(SimdVec::broadcast(100u8)).all_true());
}

#[test]
fn test_reductions() {
    let n = SimdVec::<f32>::lanes();
    let v = SimdVec::<f32>::iota();
    assert_eq!(v.reduce_sum(), (n * (n - 1) / 2) as f32);
    assert_eq!(v.reduce_min(), 0.0);
    assert_eq!(v.reduce_max(), (n - 1) as f32);

    let ints = SimdVec::<i16>::from_fn(|i| if i == 1 { -7 } else { i as i16 });
    assert_eq!(ints.reduce_min(), -7);
    assert_eq!(ints.reduce_max(), (SimdVec::<i16>::lanes() - 1) as i16);

    let wrap = SimdVec::broadcast(u8::MAX);
    assert_eq!(wrap.reduce_sum(), u8::MAX.wrapping_mul(SimdVec::<u8>::lanes() as u8));
}

#[test]
fn test_sqrt_abs_neg() {
    let v = SimdVec::broadcast(-9.0f32);
    assert!(v.abs().sqrt().as_slice().iter().all(|&x| x == 3.0));
    assert!((-v).as_slice().iter().all(|&x| x == 9.0));
    assert!((-SimdVec::broadcast(0.0f64)).as_slice().iter().all(|x| x.is_sign_negative()));
    assert!(SimdVec::broadcast(-1.0f32).sqrt().as_slice().iter().all(|x| x.is_nan()));
}

#[test]
fn test_mul_add_family() {
    let a = SimdVec::broadcast(3.0f64);
    let b = SimdVec::broadcast(4.0f64);
    let c = SimdVec::broadcast(5.0f64);
    assert!(a.mul_add(b, c).as_slice().iter().all(|&x| x == 17.0));
    assert!(a.mul_sub(b, c).as_slice().iter().all(|&x| x == 7.0));
    assert!(a.neg_mul_add(b, c).as_slice().iter().all(|&x| x == -7.0));
}

#[test]
fn test_mul_add_fusion_matches_registry_flag() {
    // (1 + e)(1 - e) - 1 is -e^2 when fused and 0 when rounded twice.
    let e = f32::powi(2.0, -13);
    let a = SimdVec::broadcast(1.0 + e);
    let b = SimdVec::broadcast(1.0 - e);
    let c = SimdVec::broadcast(-1.0f32);
    let expected = if detect_and_bind().fused_mul_add::<f32>() { -e * e } else { 0.0 };
    assert!(a.mul_add(b, c).as_slice().iter().all(|&x| x == expected));
}

#[test]
fn test_shifts() {
    let v = SimdVec::broadcast(-16i32);
    assert!((v << 2).as_slice().iter().all(|&x| x == -64));
    assert!((v >> 2).as_slice().iter().all(|&x| x == -4));
    assert!(v.shift_right(40).as_slice().iter().all(|&x| x == -1));
    assert!(v.shift_left(32).as_slice().iter().all(|&x| x == 0));

    let u = SimdVec::broadcast(0x80u8);
    assert!((u >> 7).as_slice().iter().all(|&x| x == 1));
    assert!((u >> 8).as_slice().iter().all(|&x| x == 0));
    assert!((u << 1).as_slice().iter().all(|&x| x == 0));

    let w = SimdVec::broadcast(i64::MIN);
    assert!((w >> 63).as_slice().iter().all(|&x| x == -1));
    let h = SimdVec::broadcast(0x8001u16);
    assert!((h >> 15).as_slice().iter().all(|&x| x == 1));
    assert!((h << 15).as_slice().iter().all(|&x| x == 0x8000));
}
