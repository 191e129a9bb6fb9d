#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
//! Tests for promoted and packed narrow-float vectors.

use half::{bf16, f16};

use super::{demote_slice, promote_slice, NarrowFloat, NarrowVector, PackedVec, PromotedVec};
use crate::error::SimdError;
use crate::vector::{Mask, SimdVec};

fn f16s(values: impl IntoIterator<Item = f32>) -> Vec<f16> {
    values.into_iter().map(f16::from_f32).collect()
}

fn stored<N: NarrowFloat, V: NarrowVector<N>>(v: V) -> Vec<N> {
    let mut out = vec![N::default(); V::lanes()];
    v.store(&mut out).expect("buffer holds one vector");
    out
}

#[test]
fn test_one_plus_two_is_three_in_both_storages() {
    let one = f16::from_f32(1.0);
    let two = f16::from_f32(2.0);

    let promoted = PromotedVec::broadcast(one) + PromotedVec::broadcast(two);
    let packed = PackedVec::broadcast(one) + PackedVec::broadcast(two);

    assert!(stored(promoted).iter().all(|h| h.to_bits() == 0x4200));
    assert!(stored(packed).iter().all(|h| h.to_bits() == 0x4200));
}

#[test]
fn test_lane_count_matches_f32() {
    assert_eq!(PromotedVec::<f16>::lanes(), SimdVec::<f32>::lanes());
    assert_eq!(PackedVec::<bf16>::lanes(), SimdVec::<f32>::lanes());
}

#[test]
fn test_load_store_round_trip() {
    let n = PromotedVec::<f16>::lanes();
    let src = f16s((0..n).map(|i| i as f32 * 0.5 - 1.0));

    assert_eq!(stored(PromotedVec::load(&src).expect("load")), src);
    assert_eq!(stored(PackedVec::load(&src).expect("load")), src);
}

#[test]
fn test_load_rejects_short_buffer() {
    let n = PromotedVec::<f16>::lanes();
    let src = f16s((0..n - 1).map(|i| i as f32));

    let err = PromotedVec::<f16>::load(&src).unwrap_err();
    assert_eq!(
        err,
        SimdError::InsufficientLength {
            needed: n,
            available: n - 1
        }
    );
    assert!(PackedVec::<f16>::load(&src).is_err());
}

#[test]
fn test_store_rejects_short_buffer() {
    let v = PackedVec::broadcast(f16::ONE);
    let mut out = vec![f16::ZERO; 1];
    assert!(matches!(
        v.store(&mut out),
        Err(SimdError::InsufficientLength { .. })
    ));
}

#[test]
fn test_packed_rounds_after_every_operation() {
    // 1 + 2^-11 is a tie in f16 and rounds back to 1.0 when packed.
    let one = f16::ONE;
    let tiny = f16::from_f32(f32::powi(2.0, -11));

    let promoted =
        (PromotedVec::broadcast(one) + PromotedVec::broadcast(tiny)) - PromotedVec::broadcast(one);
    let packed =
        (PackedVec::broadcast(one) + PackedVec::broadcast(tiny)) - PackedVec::broadcast(one);

    assert!(stored(promoted).iter().all(|h| *h == tiny));
    assert!(stored(packed).iter().all(|h| *h == f16::ZERO));
}

#[test]
fn test_packed_keeps_upper_half_zero() {
    let v = PackedVec::broadcast(bf16::from_f32(3.0)) * PackedVec::broadcast(bf16::from_f32(2.0));
    let bits = v.as_packed();
    let n = PackedVec::<bf16>::lanes();

    assert!(bits.as_slice()[..n].iter().all(|b| b.to_f32() == 6.0));
    assert!(bits.as_slice()[n..].iter().all(|b| b.to_bits() == 0));
}

#[test]
fn test_from_f32_rounds_each_lane() {
    let lanes = SimdVec::<f32>::from_fn(|i| 1.0 + i as f32 / 3.0);
    let expected: Vec<f16> = lanes.as_slice().iter().map(|&x| f16::from_f32(x)).collect();

    assert_eq!(stored(PromotedVec::<f16>::from_f32(lanes)), expected);
    assert_eq!(stored(PackedVec::<f16>::from_f32(lanes)), expected);
    assert_eq!(
        PromotedVec::<f16>::from_f32(lanes).to_f32(),
        PackedVec::<f16>::from_f32(lanes).to_f32()
    );
}

#[test]
fn test_min_max_with_nan_return_other_operand() {
    let nan = PromotedVec::broadcast(f16::NAN);
    let two = PromotedVec::broadcast(f16::from_f32(2.0));

    assert!(stored(nan.min(two)).iter().all(|h| h.to_f32() == 2.0));
    assert!(stored(two.max(nan)).iter().all(|h| h.to_f32() == 2.0));
}

#[test]
fn test_unary_operations() {
    let v = PackedVec::broadcast(bf16::from_f32(-16.0));

    assert!(stored(v.abs()).iter().all(|b| b.to_f32() == 16.0));
    assert!(stored(v.abs().sqrt()).iter().all(|b| b.to_f32() == 4.0));
    assert!(stored(-v).iter().all(|b| b.to_f32() == 16.0));
    assert!(stored(v / PackedVec::broadcast(bf16::from_f32(4.0)))
        .iter()
        .all(|b| b.to_f32() == -4.0));
}

#[test]
fn test_mul_add_and_mul_sub() {
    let a = PromotedVec::broadcast(f16::from_f32(3.0));
    let b = PromotedVec::broadcast(f16::from_f32(4.0));
    let c = PromotedVec::broadcast(f16::from_f32(5.0));

    assert!(stored(a.mul_add(b, c)).iter().all(|h| h.to_f32() == 17.0));
    assert!(stored(a.mul_sub(b, c)).iter().all(|h| h.to_f32() == 7.0));

    let a = PackedVec::broadcast(f16::from_f32(3.0));
    let b = PackedVec::broadcast(f16::from_f32(4.0));
    let c = PackedVec::broadcast(f16::from_f32(5.0));
    assert!(stored(a.mul_sub(b, c)).iter().all(|h| h.to_f32() == 7.0));
}

#[test]
fn test_comparisons_and_merge() {
    let n = PromotedVec::<f16>::lanes();
    let ramp = f16s((0..n).map(|i| i as f32));
    let a = PromotedVec::load(&ramp).expect("load");
    let pivot = PromotedVec::broadcast(f16::from_f32(2.0));

    let lt = a.simd_lt(pivot);
    assert_eq!(lt, Mask::<f32>::first_n(2));
    assert_eq!(a.simd_le(pivot).count_true(), 3);
    assert_eq!(a.simd_eq(pivot).find_first_true(), Some(2));
    assert_eq!(a.simd_ne(pivot).count_true(), n - 1);
    assert_eq!(a.simd_gt(pivot).count_true(), n - 3);
    assert_eq!(a.simd_ge(pivot).count_true(), n - 2);

    let merged = PromotedVec::merge(a, pivot, lt);
    let out = stored(merged);
    assert_eq!(out[0].to_f32(), 0.0);
    assert_eq!(out[1].to_f32(), 1.0);
    assert!(out[2..].iter().all(|h| h.to_f32() == 2.0));
}

#[test]
fn test_reductions_round_once() {
    let n = PromotedVec::<bf16>::lanes();
    let src: Vec<bf16> = (0..n).map(|i| bf16::from_f32(i as f32 + 1.0)).collect();
    let v = PackedVec::load(&src).expect("load");

    let sum: f32 = (1..=n).map(|i| i as f32).sum();
    assert_eq!(v.reduce_sum(), bf16::from_f32(sum));
    assert_eq!(v.reduce_min().to_f32(), 1.0);
    assert_eq!(v.reduce_max().to_f32(), n as f32);
}

#[test]
fn test_zero_is_positive_zero() {
    assert!(stored(PromotedVec::<f16>::zero()).iter().all(|h| h.to_bits() == 0));
    assert!(stored(PackedVec::<bf16>::zero()).iter().all(|b| b.to_bits() == 0));
}

#[test]
fn test_promote_and_demote_slices_cover_the_tail() {
    let len = 3 * SimdVec::<f32>::lanes() + 3;
    let wide: Vec<f32> = (0..len).map(|i| i as f32 * 0.37 - 5.0).collect();

    let mut narrow = vec![f16::ZERO; len];
    demote_slice(&wide, &mut narrow).expect("same length");
    let expected: Vec<f16> = wide.iter().map(|&x| f16::from_f32(x)).collect();
    assert_eq!(narrow, expected);

    let mut back = vec![0.0f32; len];
    promote_slice(&narrow, &mut back).expect("same length");
    let expected: Vec<f32> = narrow.iter().map(|h| h.to_f32()).collect();
    assert_eq!(back, expected);
}

#[test]
fn test_slice_conversions_reject_length_mismatch() {
    let mut out = vec![bf16::ZERO; 3];
    assert_eq!(
        demote_slice(&[1.0f32; 4], &mut out),
        Err(SimdError::LengthMismatch { left: 4, right: 3 })
    );
    let mut wide = vec![0.0f32; 2];
    assert!(promote_slice(&out, &mut wide).is_err());
}
