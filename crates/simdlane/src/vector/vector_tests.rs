#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::float_cmp
)]
//! Tests for `SimdVec` construction, memory access and bitwise operations.

use super::{Mask, SimdVec, MAX_VECTOR_BYTES};
use crate::error::SimdError;
use crate::simd_native::detect_and_bind;

#[test]
fn test_lane_counts_share_one_register_width() {
    let bytes = detect_and_bind().vector_bytes();
    assert!(bytes <= MAX_VECTOR_BYTES);
    assert_eq!(SimdVec::<u8>::lanes(), bytes);
    assert_eq!(SimdVec::<i16>::lanes(), bytes / 2);
    assert_eq!(SimdVec::<crate::f16>::lanes(), bytes / 2);
    assert_eq!(SimdVec::<f32>::lanes(), bytes / 4);
    assert_eq!(SimdVec::<i64>::lanes(), bytes / 8);
    assert!(SimdVec::<f64>::lanes() >= 2);
}

#[test]
fn test_zero_broadcast_and_default() {
    assert!(SimdVec::<u32>::zero().as_slice().iter().all(|&x| x == 0));
    assert_eq!(SimdVec::<f64>::default(), SimdVec::zero());
    assert!(SimdVec::broadcast(-3i8).as_slice().iter().all(|&x| x == -3));
}

#[test]
fn test_iota_and_from_fn() {
    let n = SimdVec::<u16>::lanes();
    assert_eq!(SimdVec::<u16>::iota().to_vec(), (0..n as u16).collect::<Vec<_>>());
    let squares = SimdVec::<i64>::from_fn(|i| (i * i) as i64);
    assert_eq!(squares.lane(1), 1);
    let last = SimdVec::<i64>::lanes() - 1;
    assert_eq!(squares.lane(last), (last * last) as i64);
}

#[test]
fn test_load_and_store_round_trip() {
    let n = SimdVec::<f32>::lanes();
    let src: Vec<f32> = (0..n + 3).map(|i| i as f32 * 1.5).collect();

    let v = SimdVec::load(&src).expect("long enough");
    assert_eq!(v.as_slice(), &src[..n]);

    let mut dst = vec![-1.0f32; n + 2];
    v.store(&mut dst).expect("long enough");
    assert_eq!(&dst[..n], &src[..n]);
    assert_eq!(&dst[n..], &[-1.0, -1.0]);
}

#[test]
fn test_load_rejects_short_slice() {
    let n = SimdVec::<i32>::lanes();
    let src = vec![1i32; n - 1];
    assert_eq!(
        SimdVec::load(&src),
        Err(SimdError::InsufficientLength {
            needed: n,
            available: n - 1
        })
    );
}

#[test]
fn test_store_rejects_short_slice() {
    let mut dst = [0u64; 1];
    assert!(matches!(
        SimdVec::broadcast(1u64).store(&mut dst),
        Err(SimdError::InsufficientLength { available: 1, .. })
    ));
}

#[test]
fn test_unaligned_access_at_odd_offset() {
    let n = SimdVec::<u32>::lanes();
    let src: Vec<u32> = (0..=n as u32).collect();

    // SAFETY: `src[1..]` holds exactly `n` elements.
    let v = unsafe { SimdVec::<u32>::load_unaligned(src.as_ptr().add(1)) };
    assert_eq!(v.to_vec(), src[1..].to_vec());

    let mut dst = vec![0u32; n + 1];
    // SAFETY: `dst[1..]` has room for `n` elements.
    unsafe { v.store_unaligned(dst.as_mut_ptr().add(1)) };
    assert_eq!(dst[0], 0);
    assert_eq!(&dst[1..], &src[1..]);
}

#[test]
fn test_bit_cast_keeps_bytes() {
    let v = SimdVec::broadcast(1.0f32);
    let bits = v.bit_cast::<u32>();
    assert!(bits.as_slice().iter().all(|&b| b == 0x3F80_0000));
    let halves = v.bit_cast::<u16>();
    assert_eq!(halves.as_slice().len(), 2 * SimdVec::<f32>::lanes());
    assert_eq!(bits.bit_cast::<f32>(), v);
}

#[test]
fn test_bitwise_operators() {
    let a = SimdVec::broadcast(0b1100u8);
    let b = SimdVec::broadcast(0b1010u8);

    assert!((a & b).as_slice().iter().all(|&x| x == 0b1000));
    assert!((a | b).as_slice().iter().all(|&x| x == 0b1110));
    assert!((a ^ b).as_slice().iter().all(|&x| x == 0b0110));
    assert!((!a).as_slice().iter().all(|&x| x == !0b1100u8));
    assert!(a.and_not(b).as_slice().iter().all(|&x| x == 0b0010));

    let mut c = a;
    c &= b;
    c |= SimdVec::broadcast(1);
    c ^= SimdVec::broadcast(0b1001);
    assert!(c.as_slice().iter().all(|&x| x == 0));
}

#[test]
fn test_float_bitwise_clears_sign() {
    let v = SimdVec::broadcast(-2.5f64);
    let sign = SimdVec::broadcast(-0.0f64);
    assert!(sign.and_not(v).as_slice().iter().all(|&x| x == 2.5));
}

#[test]
fn test_merge_selects_per_lane() {
    let n = SimdVec::<i16>::lanes();
    let a = SimdVec::<i16>::iota();
    let b = SimdVec::broadcast(-1i16);
    let even = Mask::from_fn(|i| i % 2 == 0);

    let merged = SimdVec::merge(a, b, even);
    for i in 0..n {
        let expected = if i % 2 == 0 { i as i16 } else { -1 };
        assert_eq!(merged.lane(i), expected);
    }
    assert_eq!(SimdVec::merge(a, b, Mask::all()), a);
    assert_eq!(SimdVec::merge(a, b, Mask::none()), b);
}

#[test]
fn test_debug_lists_lanes() {
    let text = format!("{:?}", SimdVec::<u64>::broadcast(7));
    assert!(text.starts_with("SimdVec([7, 7"));
}

#[test]
fn test_vectors_cross_threads() {
    let v = SimdVec::<f32>::iota();
    let sum = std::thread::spawn(move || (v + v).reduce_sum())
        .join()
        .expect("thread");
    let n = SimdVec::<f32>::lanes() as f32;
    assert_eq!(sum, n * (n - 1.0));
}
