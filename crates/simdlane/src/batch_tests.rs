#![allow(clippy::cast_precision_loss, clippy::float_cmp)]
//! Tests for slice-level operations across every supported level.

use crate::error::SimdError;
use crate::simd_native::{KernelRegistry, SimdLevel};

fn registries() -> Vec<KernelRegistry> {
    KernelRegistry::supported_levels()
        .into_iter()
        .map(|level| KernelRegistry::for_level(level).expect("supported level"))
        .collect()
}

const LENGTHS: [usize; 7] = [0, 1, 3, 16, 63, 64, 131];

#[test]
fn test_add_slices_matches_scalar_for_every_length() {
    for reg in registries() {
        for len in LENGTHS {
            let a: Vec<i32> = (0..len).map(|i| i as i32 * 7 - 100).collect();
            let b: Vec<i32> = (0..len).map(|i| i32::MAX - i as i32).collect();
            let mut out = vec![0i32; len];

            reg.add_slices(&a, &b, &mut out).expect("same length");
            let expected: Vec<i32> = a.iter().zip(&b).map(|(x, y)| x.wrapping_add(*y)).collect();
            assert_eq!(out, expected, "{} len {len}", reg.level());
        }
    }
}

#[test]
fn test_sub_mul_min_max_slices_u8() {
    for reg in registries() {
        let len = 100;
        let a: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        let b: Vec<u8> = (0..len).map(|i| (i * 11 % 256) as u8).collect();
        let mut out = vec![0u8; len];

        reg.sub_slices(&a, &b, &mut out).expect("same length");
        assert!(out.iter().zip(a.iter().zip(&b)).all(|(o, (x, y))| *o == x.wrapping_sub(*y)));

        reg.mul_slices(&a, &b, &mut out).expect("same length");
        assert!(out.iter().zip(a.iter().zip(&b)).all(|(o, (x, y))| *o == x.wrapping_mul(*y)));

        reg.min_slices(&a, &b, &mut out).expect("same length");
        assert!(out.iter().zip(a.iter().zip(&b)).all(|(o, (x, y))| *o == *x.min(y)));

        reg.max_slices(&a, &b, &mut out).expect("same length");
        assert!(out.iter().zip(a.iter().zip(&b)).all(|(o, (x, y))| *o == *x.max(y)));
    }
}

#[test]
fn test_mul_add_slices_exact_inputs() {
    for reg in registries() {
        let len = 37;
        let a: Vec<f64> = (0..len).map(|i| i as f64).collect();
        let b = vec![2.0f64; len];
        let c = vec![1.0f64; len];
        let mut out = vec![0.0f64; len];

        reg.mul_add_slices(&a, &b, &c, &mut out).expect("same length");
        assert!(out.iter().enumerate().all(|(i, &x)| x == 2.0 * i as f64 + 1.0));
    }
}

#[test]
fn test_reduce_sum_handles_empty_and_tail() {
    for reg in registries() {
        assert_eq!(reg.reduce_sum::<f32>(&[]), 0.0);
        let values: Vec<u32> = (1..=77).collect();
        assert_eq!(reg.reduce_sum(&values), 77 * 78 / 2);
        let wrapping = vec![u32::MAX; 5];
        assert_eq!(reg.reduce_sum(&wrapping), u32::MAX.wrapping_mul(5));
    }
}

#[test]
fn test_reduce_sum_of_negative_zeros_is_negative_zero() {
    for reg in registries() {
        for len in LENGTHS.into_iter().filter(|&len| len > 0) {
            let zeros = vec![-0.0f32; len];
            let sum = reg.reduce_sum(&zeros);
            assert!(
                sum == 0.0 && sum.is_sign_negative(),
                "{} len {len}: {sum}",
                reg.level()
            );
        }
        assert!(reg.reduce_sum::<f64>(&[]).is_sign_positive());
    }
}

#[test]
fn test_dot_matches_reference() {
    for reg in registries() {
        for len in LENGTHS {
            let a: Vec<f32> = (0..len).map(|i| (i % 9) as f32).collect();
            let b: Vec<f32> = (0..len).map(|i| (i % 4) as f32 - 1.5).collect();
            let expected: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();

            let got = reg.dot(&a, &b).expect("same length");
            assert_eq!(got, expected, "{} len {len}", reg.level());
        }
    }
}

#[test]
fn test_length_mismatch_is_reported() {
    let reg = KernelRegistry::scalar();
    let mut out = [0.0f32; 3];
    assert_eq!(
        reg.add_slices(&[1.0f32; 3], &[1.0; 4], &mut out),
        Err(SimdError::LengthMismatch { left: 3, right: 4 })
    );
    assert_eq!(
        reg.mul_add_slices(&[1.0f32; 3], &[1.0; 3], &[1.0; 3], &mut [0.0; 2]),
        Err(SimdError::LengthMismatch { left: 3, right: 2 })
    );
    assert!(reg.dot(&[1.0f64; 2], &[1.0; 1]).is_err());
}

#[test]
fn test_scalar_level_is_always_tested() {
    assert!(registries().iter().any(|reg| reg.level() == SimdLevel::Scalar));
}
