#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
//! Tests for the portable scalar kernels.

use super::scalar;

#[test]
fn test_integer_arithmetic_wraps() {
    let a = [i8::MAX, i8::MIN, 100, -1];
    let b = [1i8, -1, 100, 1];
    let mut out = [0i8; 4];

    // SAFETY: all buffers hold 4 lanes.
    unsafe { scalar::add(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(out, [i8::MIN, i8::MAX, -56, 0]);

    // SAFETY: as above.
    unsafe { scalar::mul(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(out, [i8::MAX, i8::MIN, 16, -1]);
}

#[test]
fn test_float_min_max_ignore_nan() {
    let a = [f32::NAN, 1.0, -0.5, f32::NAN];
    let b = [2.0f32, f32::NAN, 3.0, f32::NAN];
    let mut out = [0.0f32; 4];

    // SAFETY: all buffers hold 4 lanes.
    unsafe { scalar::min(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(&out[..3], &[2.0, 1.0, -0.5]);
    assert!(out[3].is_nan());

    // SAFETY: as above.
    unsafe { scalar::max(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(&out[..3], &[2.0, 1.0, 3.0]);
}

#[test]
fn test_compare_writes_full_lane_masks() {
    let a = [1u16, 5, 7, 9];
    let b = [1u16, 6, 7, 8];
    let mut mask = [0u8; 8];

    // SAFETY: `mask` holds 4 lanes of 2 bytes.
    unsafe { scalar::lt(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 4) };
    assert_eq!(mask, [0, 0, 0xFF, 0xFF, 0, 0, 0, 0]);

    // SAFETY: as above.
    unsafe { scalar::eq(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 4) };
    assert_eq!(mask, [0xFF, 0xFF, 0, 0, 0xFF, 0xFF, 0, 0]);
}

#[test]
fn test_nan_comparisons_only_ne_is_true() {
    let a = [f64::NAN, 1.0];
    let b = [f64::NAN, f64::NAN];
    let mut mask = [0u8; 16];

    // SAFETY: `mask` holds 2 lanes of 8 bytes.
    unsafe { scalar::ne(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 2) };
    assert!(mask.iter().all(|&m| m == 0xFF));

    for kernel in [
        scalar::eq::<f64>,
        scalar::lt::<f64>,
        scalar::le::<f64>,
        scalar::gt::<f64>,
        scalar::ge::<f64>,
    ] {
        // SAFETY: as above.
        unsafe { kernel(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 2) };
        assert!(mask.iter().all(|&m| m == 0));
    }
}

#[test]
fn test_shift_amounts_past_width() {
    let a = [-8i16, 8, i16::MIN, 1];
    let mut out = [0i16; 4];

    // SAFETY: both buffers hold 4 lanes.
    unsafe { scalar::shl(a.as_ptr(), out.as_mut_ptr(), 4, 16) };
    assert_eq!(out, [0; 4]);

    // SAFETY: as above.
    unsafe { scalar::shr(a.as_ptr(), out.as_mut_ptr(), 4, 40) };
    assert_eq!(out, [-1, 0, -1, 0]);

    let u = [0x8000u16, 1, 0xFFFF, 4];
    let mut uout = [0u16; 4];
    // SAFETY: as above.
    unsafe { scalar::shr(u.as_ptr(), uout.as_mut_ptr(), 4, 15) };
    assert_eq!(uout, [1, 0, 1, 0]);
    // SAFETY: as above.
    unsafe { scalar::shr(u.as_ptr(), uout.as_mut_ptr(), 4, 16) };
    assert_eq!(uout, [0; 4]);
}

#[test]
fn test_signed_shift_right_saturates_amount_for_every_width() {
    let a8 = [-100i8, 100];
    let mut o8 = [0i8; 2];
    // SAFETY: both buffers hold 2 lanes.
    unsafe { scalar::shr(a8.as_ptr(), o8.as_mut_ptr(), 2, u32::MAX) };
    assert_eq!(o8, [-1, 0]);

    let a32 = [i32::MIN, i32::MAX];
    let mut o32 = [0i32; 2];
    // SAFETY: as above.
    unsafe { scalar::shr(a32.as_ptr(), o32.as_mut_ptr(), 2, 31) };
    assert_eq!(o32, [-1, 0]);

    let a64 = [-5i64, 5];
    let mut o64 = [0i64; 2];
    // SAFETY: as above.
    unsafe { scalar::shr(a64.as_ptr(), o64.as_mut_ptr(), 2, 64) };
    assert_eq!(o64, [-1, 0]);
    // SAFETY: as above.
    unsafe { scalar::shr(a64.as_ptr(), o64.as_mut_ptr(), 2, 1) };
    assert_eq!(o64, [-3, 2]);
}

#[test]
fn test_reduce_sum_keeps_negative_zero() {
    let zeros = [-0.0f32; 4];
    // SAFETY: `zeros` holds 4 lanes.
    let sum = unsafe { scalar::reduce_sum(zeros.as_ptr(), 4) };
    assert_eq!(sum.to_bits(), (-0.0f32).to_bits());

    let mixed = [-0.0f64, 0.0];
    // SAFETY: `mixed` holds 2 lanes.
    let sum = unsafe { scalar::reduce_sum(mixed.as_ptr(), 2) };
    assert_eq!(sum.to_bits(), 0.0f64.to_bits());
}

#[test]
fn test_abs_of_min_wraps() {
    let a = [i32::MIN, -3, 0, 7];
    let mut out = [0i32; 4];
    // SAFETY: both buffers hold 4 lanes.
    unsafe { scalar::abs(a.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(out, [i32::MIN, 3, 0, 7]);
}

#[test]
fn test_mul_add_rounds_twice() {
    // (1 + e)(1 - e) = 1 - e^2; with e = 2^-13 the product rounds to 1.0.
    let e = f32::powi(2.0, -13);
    let a = [1.0 + e; 4];
    let b = [1.0 - e; 4];
    let c = [-1.0f32; 4];
    let mut out = [0.0f32; 4];

    // SAFETY: all buffers hold 4 lanes.
    unsafe { scalar::mul_add(a.as_ptr(), b.as_ptr(), c.as_ptr(), out.as_mut_ptr(), 4) };
    assert!(out.iter().all(|&x| x == 0.0));
}

#[test]
fn test_neg_mul_add_and_mul_sub() {
    let a = [2.0f64, 3.0];
    let b = [4.0f64, 5.0];
    let c = [1.0f64, 1.0];
    let mut out = [0.0f64; 2];

    // SAFETY: all buffers hold 2 lanes.
    unsafe { scalar::neg_mul_add(a.as_ptr(), b.as_ptr(), c.as_ptr(), out.as_mut_ptr(), 2) };
    assert_eq!(out, [-7.0, -14.0]);
    // SAFETY: as above.
    unsafe { scalar::mul_sub(a.as_ptr(), b.as_ptr(), c.as_ptr(), out.as_mut_ptr(), 2) };
    assert_eq!(out, [7.0, 14.0]);
}

#[test]
fn test_interleave_tolerates_aliasing_output() {
    let mut a = [0u32, 1, 2, 3];
    let b = [10u32, 11, 12, 13];

    // SAFETY: all pointers cover 4 lanes; `a` is both input and output.
    unsafe { scalar::interleave_upper(a.as_ptr(), b.as_ptr(), a.as_mut_ptr(), 4) };
    assert_eq!(a, [2, 12, 3, 13]);

    let mut r = [1u8, 2, 3];
    // SAFETY: in-place reverse of 3 lanes.
    unsafe { scalar::reverse(r.as_ptr(), r.as_mut_ptr(), 3) };
    assert_eq!(r, [3, 2, 1]);
}

#[test]
fn test_mask_queries() {
    let mask = [0u8, 0, 0xFF, 0xFF, 0, 0, 0xFF, 0xFF];
    // SAFETY: `mask` holds 8 bytes.
    unsafe {
        assert_eq!(scalar::count_set_bytes(mask.as_ptr(), 8), 4);
        assert_eq!(scalar::first_set_byte(mask.as_ptr(), 8), 2);
        assert_eq!(scalar::first_set_byte([0u8; 8].as_ptr(), 8), 8);
    }
}

#[test]
fn test_and_not_complements_first_operand() {
    let a = [0b1100u8; 4];
    let b = [0b1010u8; 4];
    let mut out = [0u8; 4];
    // SAFETY: all buffers hold 4 bytes.
    unsafe { scalar::and_not_bytes(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 4) };
    assert_eq!(out, [0b0010; 4]);
}

#[test]
fn test_saturating_and_truncating_narrowing() {
    let wide = [32767i32, 32768, -32769, 0x1_2345];
    let mut sat = [0i16; 4];
    let mut trunc = [0i16; 4];

    // SAFETY: source and destination hold 4 lanes.
    unsafe {
        scalar::demote_sat_i32_i16(wide.as_ptr(), sat.as_mut_ptr(), 4);
        scalar::demote_trunc_i32_i16(wide.as_ptr(), trunc.as_mut_ptr(), 4);
    }
    assert_eq!(sat, [32767, 32767, -32768, 32767]);
    assert_eq!(trunc, [32767, -32768, 32767, 0x2345]);

    let signed = [-5i16, 300, 255, 0];
    let mut bytes = [0u8; 4];
    // SAFETY: as above.
    unsafe { scalar::demote_sat_i16_u8(signed.as_ptr(), bytes.as_mut_ptr(), 4) };
    assert_eq!(bytes, [0, 255, 255, 0]);
}

#[test]
fn test_float_to_int_truncates_and_saturates() {
    let src = [1.9f32, -1.9, f32::NAN, 3.0e9, -3.0e9, f32::INFINITY];
    let mut out = [7i32; 6];
    // SAFETY: both buffers hold 6 lanes.
    unsafe { scalar::f32_to_i32(src.as_ptr(), out.as_mut_ptr(), 6) };
    assert_eq!(out, [1, -1, 0, i32::MAX, i32::MIN, i32::MAX]);
}

#[test]
fn test_gather_and_scatter_by_index() {
    let base = [10.0f64, 20.0, 30.0, 40.0];
    let idx = [3i64, 0];
    let mut out = [0.0f64; 2];

    // SAFETY: indices are within `base`.
    unsafe { scalar::gather(base.as_ptr(), idx.as_ptr(), out.as_mut_ptr(), 2) };
    assert_eq!(out, [40.0, 10.0]);

    let mut target = [0u32; 4];
    let values = [1u32, 2, 3];
    let dup = [1i32, 1, 2];
    // SAFETY: indices are within `target`.
    unsafe { scalar::scatter(values.as_ptr(), dup.as_ptr(), target.as_mut_ptr(), 3) };
    assert_eq!(target, [0, 2, 3, 0]);
}
