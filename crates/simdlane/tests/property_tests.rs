//! Property-based equivalence tests for slice operations and conversions.
//!
//! Every supported dispatch level is compared against a plain scalar
//! reference over randomized inputs and register-boundary lengths.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

use half::{bf16, f16};
use proptest::{
    collection::vec,
    prelude::{any, prop_assert, prop_assert_eq, prop_oneof, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdlane::narrow::{self, bits};
use simdlane::{KernelRegistry, SimdVec};

const LANE_PROP_CASES: u32 = 256;
const LANE_PROP_MAX_SHRINK_ITERS: u32 = 2048;

fn register_length_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0_usize),
        Just(1_usize),
        Just(3_usize),
        Just(4_usize),
        Just(7_usize),
        Just(8_usize),
        Just(15_usize),
        Just(16_usize),
        Just(17_usize),
        Just(31_usize),
        Just(32_usize),
        Just(33_usize),
        Just(63_usize),
        Just(64_usize),
        Just(65_usize),
        Just(129_usize),
        0_usize..=600,
    ]
}

fn int_pair_strategy() -> impl Strategy<Value = (Vec<i16>, Vec<i16>)> {
    register_length_strategy().prop_flat_map(|len| (vec(any::<i16>(), len), vec(any::<i16>(), len)))
}

fn float_pair_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    register_length_strategy().prop_flat_map(|len| {
        let a = vec(-100.0_f32..100.0_f32, len);
        let b = vec(-100.0_f32..100.0_f32, len);
        (a, b)
    })
}

fn lane_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: LANE_PROP_CASES,
        max_shrink_iters: LANE_PROP_MAX_SHRINK_ITERS,
        // Integration tests have no nearby lib.rs, so name the persistence
        // root explicitly.
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "lane-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn registries() -> Vec<KernelRegistry> {
    KernelRegistry::supported_levels()
        .into_iter()
        .filter_map(|level| KernelRegistry::for_level(level).ok())
        .collect()
}

/// Error bound for an f32 dot product in any summation order: each of the
/// `len` additions rounds by at most `EPSILON` relative to the running
/// magnitude, which never exceeds `sum(|a[i] * b[i]|)`.
fn dot_within_reassociation_bound(actual: f32, a: &[f32], b: &[f32]) -> (bool, f64, f64) {
    let reference: f64 = a.iter().zip(b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let magnitude: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (f64::from(x) * f64::from(y)).abs())
        .sum();
    let allowed = (a.len() as f64 + 1.0) * f64::from(f32::EPSILON) * magnitude + 1.0e-6;
    let delta = (f64::from(actual) - reference).abs();
    (delta <= allowed, reference, allowed)
}

fn same_f32(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

proptest! {
    #![proptest_config(lane_proptest_config())]

    #[test]
    fn test_integer_slice_ops_match_wrapping_scalar((a, b) in int_pair_strategy()) {
        for reg in registries() {
            let mut out = vec![0i16; a.len()];

            reg.add_slices(&a, &b, &mut out).unwrap();
            let expected: Vec<i16> = a.iter().zip(&b).map(|(x, y)| x.wrapping_add(*y)).collect();
            prop_assert_eq!(&out, &expected, "add at {}", reg.level());

            reg.mul_slices(&a, &b, &mut out).unwrap();
            let expected: Vec<i16> = a.iter().zip(&b).map(|(x, y)| x.wrapping_mul(*y)).collect();
            prop_assert_eq!(&out, &expected, "mul at {}", reg.level());

            reg.max_slices(&a, &b, &mut out).unwrap();
            let expected: Vec<i16> = a.iter().zip(&b).map(|(x, y)| *x.max(y)).collect();
            prop_assert_eq!(&out, &expected, "max at {}", reg.level());

            let sum = reg.reduce_sum(&a);
            let expected = a.iter().fold(0i16, |acc, x| acc.wrapping_add(*x));
            prop_assert_eq!(sum, expected, "reduce_sum at {}", reg.level());
        }
    }

    #[test]
    fn test_float_slice_ops_match_scalar((a, b) in float_pair_strategy()) {
        for reg in registries() {
            let mut out = vec![0.0f32; a.len()];

            reg.sub_slices(&a, &b, &mut out).unwrap();
            for (i, got) in out.iter().enumerate() {
                prop_assert_eq!(*got, a[i] - b[i]);
            }

            reg.min_slices(&a, &b, &mut out).unwrap();
            for (i, got) in out.iter().enumerate() {
                prop_assert_eq!(*got, a[i].min(b[i]));
            }

            let dot = reg.dot(&a, &b).unwrap();
            let (ok, reference, allowed) = dot_within_reassociation_bound(dot, &a, &b);
            prop_assert!(
                ok,
                "dot mismatch at {} len={} simd={} reference={} allowed={}",
                reg.level(),
                a.len(),
                dot,
                reference,
                allowed
            );
        }
    }

    #[test]
    fn test_f16_rounding_matches_half(x in any::<u32>()) {
        let value = f32::from_bits(x);
        let ours = bits::f32_to_f16_bits(value);
        let reference = f16::from_f32(value);
        if value.is_nan() {
            prop_assert!(f16::from_bits(ours).is_nan());
        } else {
            prop_assert_eq!(ours, reference.to_bits(), "f16 rounding of {:#010x}", x);
        }
        prop_assert!(same_f32(bits::f16_bits_to_f32(ours), f16::from_bits(ours).to_f32()));
    }

    #[test]
    fn test_bf16_rounding_matches_half(x in any::<u32>()) {
        let value = f32::from_bits(x);
        let ours = bits::f32_to_bf16_bits(value);
        if value.is_nan() {
            prop_assert!(bf16::from_bits(ours).is_nan());
        } else {
            prop_assert_eq!(ours, bf16::from_f32(value).to_bits(), "bf16 rounding of {:#010x}", x);
        }
        prop_assert_eq!(bits::bf16_bits_to_f32(ours).to_bits(), u32::from(ours) << 16);
    }

    #[test]
    fn test_narrow_slices_round_trip(values in vec(any::<u16>(), 0..300)) {
        let halves: Vec<f16> = values
            .iter()
            .map(|&b| f16::from_bits(b))
            .filter(|h| !h.is_nan())
            .collect();
        let mut wide = vec![0.0f32; halves.len()];
        narrow::promote_slice(&halves, &mut wide).unwrap();
        let mut back = vec![f16::ZERO; halves.len()];
        narrow::demote_slice(&wide, &mut back).unwrap();
        for (orig, round) in halves.iter().zip(&back) {
            prop_assert_eq!(orig.to_bits(), round.to_bits());
        }
    }

    #[test]
    fn test_promote_then_demote_is_identity(values in vec(any::<i16>(), 64)) {
        let n = SimdVec::<i16>::lanes();
        let v = SimdVec::<i16>::load(&values[..n]).unwrap();
        let lo = v.promote_lower::<i32>();
        let hi = v.promote_upper::<i32>();
        let back = lo.ordered_demote2_saturating::<i16>(hi);
        prop_assert_eq!(back.as_slice(), v.as_slice());
        let back = lo.ordered_demote2_truncating::<i16>(hi);
        prop_assert_eq!(back.as_slice(), v.as_slice());
    }

    #[test]
    fn test_saturating_demote_clamps(values in vec(any::<i32>(), 16)) {
        let n = SimdVec::<i32>::lanes();
        let v = SimdVec::<i32>::load(&values[..n]).unwrap();
        let narrowed = v.demote_saturating::<i16>();
        for (i, &x) in values[..n].iter().enumerate() {
            let clamped = x.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
            prop_assert_eq!(narrowed.lane(i), clamped);
            prop_assert_eq!(v.demote_truncating::<i16>().lane(i), x as i16);
        }
        for &lane in &narrowed.as_slice()[n..] {
            prop_assert_eq!(lane, 0);
        }
    }

    #[test]
    fn test_bf16_dot_matches_widened_scalar(
        (a, b) in register_length_strategy().prop_flat_map(|len| {
            (vec(-8.0_f32..8.0_f32, len), vec(-8.0_f32..8.0_f32, len))
        })
    ) {
        let a: Vec<bf16> = a.into_iter().map(bf16::from_f32).collect();
        let b: Vec<bf16> = b.into_iter().map(bf16::from_f32).collect();
        let got = narrow::dot::dot(&a, &b).unwrap();
        let wide_a: Vec<f32> = a.iter().map(|x| x.to_f32()).collect();
        let wide_b: Vec<f32> = b.iter().map(|x| x.to_f32()).collect();
        let (ok, reference, allowed) = dot_within_reassociation_bound(got, &wide_a, &wide_b);
        prop_assert!(
            ok,
            "bf16 dot mismatch len={} simd={} reference={} allowed={}",
            a.len(),
            got,
            reference,
            allowed
        );
    }
}

#[test]
fn test_dot_with_cancellation_stays_within_bound() {
    let mut rng = StdRng::seed_from_u64(47);
    for len in [47usize, 48, 129, 600] {
        for _ in 0..64 {
            let a: Vec<f32> = (0..len).map(|_| rng.gen_range(-100.0f32..100.0)).collect();
            let mut b: Vec<f32> = (0..len).map(|_| rng.gen_range(-100.0f32..100.0)).collect();
            // Force heavy cancellation: the second half negates the first.
            let half = len / 2;
            for i in 0..half {
                b[half + i] = -b[i] * a[i] / a[half + i].max(1.0);
            }
            for reg in registries() {
                let dot = reg.dot(&a, &b).unwrap();
                let (ok, reference, allowed) = dot_within_reassociation_bound(dot, &a, &b);
                assert!(
                    ok,
                    "{} len={len} simd={dot} reference={reference} allowed={allowed}",
                    reg.level()
                );
            }
        }
    }
}
