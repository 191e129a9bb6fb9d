#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
//! Tests for demotion, promotion and same-width conversion.

use half::{bf16, f16};

use super::SimdVec;
use crate::narrow::bits::{f32_to_bf16_bits, f32_to_f16_bits};

fn i32_vec(values: &[i32]) -> SimdVec<i32> {
    SimdVec::from_fn(|i| values[i % values.len()])
}

#[test]
fn test_demote_i32_to_i16_saturating_scenario() {
    let wide = i32_vec(&[32767, 32768, -32769]);
    let narrow = wide.demote_saturating::<i16>();
    for i in 0..SimdVec::<i32>::lanes() {
        let expected = [32767i16, 32767, -32768][i % 3];
        assert_eq!(narrow.lane(i), expected, "lane {i}");
    }
}

#[test]
fn test_demotion_zeroes_upper_half() {
    let n = SimdVec::<i32>::lanes();
    let narrow = SimdVec::broadcast(-1i32).demote_truncating::<i16>();
    assert!(narrow.as_slice()[..n].iter().all(|&x| x == -1));
    assert!(narrow.as_slice()[n..].iter().all(|&x| x == 0));
}

#[test]
fn test_demote_truncating_keeps_low_bits() {
    let wide = i32_vec(&[0x0001_2345, -32769, 65535]);
    let narrow = wide.demote_truncating::<i16>();
    assert_eq!(narrow.lane(0), 0x2345);
    assert_eq!(narrow.lane(1), 32767);
    assert_eq!(narrow.lane(2), -1);
}

#[test]
fn test_demote_to_unsigned_clamps_negatives() {
    let wide = i32_vec(&[-5, 70000, 1234]);
    let narrow = wide.demote_saturating::<u16>();
    assert_eq!(narrow.lane(0), 0);
    assert_eq!(narrow.lane(1), u16::MAX);
    assert_eq!(narrow.lane(2), 1234);

    let bytes = SimdVec::<i16>::from_fn(|i| [-1i16, 256, 77][i % 3]).demote_saturating::<u8>();
    assert_eq!(&bytes.as_slice()[..3], &[0, 255, 77]);

    let unsigned = SimdVec::broadcast(u32::MAX).demote_saturating::<u16>();
    assert_eq!(unsigned.lane(0), u16::MAX);
    let unsigned = SimdVec::broadcast(0x1_0002u32).demote_truncating::<u16>();
    assert_eq!(unsigned.lane(0), 2);
}

#[test]
fn test_demote_64_bit_lanes() {
    let wide = SimdVec::<i64>::from_fn(|i| if i % 2 == 0 { i64::MAX } else { -3 });
    let narrow = wide.demote_saturating::<i32>();
    assert_eq!(narrow.lane(0), i32::MAX);
    assert_eq!(narrow.lane(1), -3);

    let wide = SimdVec::broadcast(u64::MAX);
    assert_eq!(wide.demote_saturating::<u32>().lane(0), u32::MAX);
    assert_eq!(wide.demote_truncating::<u32>().lane(0), u32::MAX);
}

#[test]
fn test_ordered_demote2_fills_both_halves_in_order() {
    let n = SimdVec::<i16>::lanes();
    let lo = SimdVec::<i16>::iota();
    let hi = SimdVec::<i16>::from_fn(|i| 1000 + i as i16);

    let packed = lo.ordered_demote2_saturating::<i8>(hi);
    for i in 0..n {
        assert_eq!(packed.lane(i), i as i8);
        assert_eq!(packed.lane(n + i), i8::MAX);
    }

    let packed = lo.ordered_demote2_truncating::<u8>(hi);
    assert_eq!(packed.lane(n), (1000i16 as u16 & 0xFF) as u8);
}

#[test]
fn test_demote_float_rounds_to_nearest_even() {
    let n = SimdVec::<f32>::lanes();
    let values: Vec<f32> = (0..n)
        .map(|i| 1.0 + i as f32 * f32::powi(2.0, -12) + f32::powi(2.0, -20))
        .collect();
    let v = SimdVec::load(&values).expect("one vector");

    let halves = v.demote_float::<f16>();
    let brains = v.demote_float::<bf16>();
    for (i, &x) in values.iter().enumerate() {
        assert_eq!(halves.lane(i).to_bits(), f32_to_f16_bits(x), "f16 lane {i}");
        assert_eq!(brains.lane(i).to_bits(), f32_to_bf16_bits(x), "bf16 lane {i}");
    }
}

#[test]
fn test_demote_float_special_values() {
    let specials = [f32::INFINITY, -0.0, 1.0e9, f32::NAN];
    let v = SimdVec::<f32>::from_fn(|i| specials[i % 4]);

    let h = v.demote_float::<f16>();
    assert_eq!(h.lane(0).to_bits(), 0x7C00);
    assert_eq!(h.lane(1).to_bits(), 0x8000);
    assert_eq!(h.lane(2).to_bits(), 0x7C00);
    assert!(h.lane(3).is_nan());

    let b = v.demote_float::<bf16>();
    assert_eq!(b.lane(1).to_bits(), 0x8000);
    assert!(b.lane(3).is_nan());
}

#[test]
fn test_ordered_demote2_float() {
    let n = SimdVec::<f64>::lanes();
    let lo = SimdVec::broadcast(0.1f64);
    let hi = SimdVec::broadcast(f64::MAX);
    let out = lo.ordered_demote2_float::<f32>(hi);
    assert_eq!(out.lane(0), 0.1f32);
    assert_eq!(out.lane(n), f32::INFINITY);
}

#[test]
fn test_promote_lower_and_upper() {
    let n = SimdVec::<i32>::lanes();
    let narrow = SimdVec::<i16>::from_fn(|i| i as i16 - 3);

    let lower = narrow.promote_lower::<i32>();
    let upper = narrow.promote_upper::<i32>();
    for i in 0..n {
        assert_eq!(lower.lane(i), i as i32 - 3);
        assert_eq!(upper.lane(i), (n + i) as i32 - 3);
    }

    let bytes = SimdVec::broadcast(200u8).promote_lower::<u16>();
    assert!(bytes.as_slice().iter().all(|&x| x == 200));
    let signed = SimdVec::broadcast(-100i8).promote_upper::<i16>();
    assert!(signed.as_slice().iter().all(|&x| x == -100));
    let big = SimdVec::broadcast(u32::MAX).promote_lower::<u64>();
    assert!(big.as_slice().iter().all(|&x| x == u64::from(u32::MAX)));
}

#[test]
fn test_promote_floats_exactly() {
    let f = SimdVec::broadcast(0.1f32).promote_upper::<f64>();
    assert!(f.as_slice().iter().all(|&x| x == f64::from(0.1f32)));

    let h = SimdVec::<f16>::from_fn(|i| f16::from_bits(i as u16 + 1)).promote_lower::<f32>();
    assert_eq!(h.lane(0), f32::powi(2.0, -24));

    let b = SimdVec::broadcast(bf16::from_bits(0x3FC0)).promote_upper::<f32>();
    assert!(b.as_slice().iter().all(|&x| x == 1.5));
}

#[test]
fn test_convert_int_float() {
    let ints = SimdVec::<i32>::from_fn(|i| i as i32 * -7);
    let floats = ints.convert::<f32>();
    assert_eq!(floats.lane(1), -7.0);

    let specials = [2.9f32, -2.9, f32::NAN, 1.0e10];
    let v = SimdVec::<f32>::from_fn(|i| specials[i % 4]);
    let back = v.convert::<i32>();
    assert_eq!(&back.as_slice()[..4], &[2, -2, 0, i32::MAX]);

    let d = SimdVec::<f64>::from_fn(|i| [-1.5f64, f64::NEG_INFINITY][i % 2]);
    let l = d.convert::<i64>();
    assert_eq!(&l.as_slice()[..2], &[-1, i64::MIN]);
    assert_eq!(SimdVec::broadcast(-3i64).convert::<f64>().lane(0), -3.0);
}
