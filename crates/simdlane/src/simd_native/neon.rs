//! ARM NEON kernel implementations for aarch64.
//!
//! 128-bit kernels for every lane type. NEON has no 64-bit integer multiply
//! and no gather, so those entries keep their scalar kernels.
//!
//! Comparison intrinsics already return full-lane masks (`uint*x*_t`), which
//! are stored unchanged.

// SAFETY: Numeric casts in this file are intentional and safe:
// - shift counts are clamped to 64 before the signed conversion,
// - the set-byte count of one register is at most 16.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::wildcard_imports)]

use std::arch::aarch64::*;
use std::mem::size_of;

use super::dispatch::KernelRegistry;
use super::lane_loop::{
    binary_kernel, byte_binary_kernel, compare_kernel, reduce_kernel, ternary_kernel,
    unary_kernel,
};

const BYTES: usize = 16;

// =============================================================================
// Register helpers
// =============================================================================

#[inline]
#[target_feature(enable = "neon")]
unsafe fn not_u64(v: uint64x2_t) -> uint64x2_t {
    vreinterpretq_u64_u32(vmvnq_u32(vreinterpretq_u32_u64(v)))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn min_s64(a: int64x2_t, b: int64x2_t) -> int64x2_t {
    vbslq_s64(vcltq_s64(a, b), a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn max_s64(a: int64x2_t, b: int64x2_t) -> int64x2_t {
    vbslq_s64(vcgtq_s64(a, b), a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn min_u64(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
    vbslq_u64(vcltq_u64(a, b), a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn max_u64(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
    vbslq_u64(vcgtq_u64(a, b), a, b)
}

/// `a * b - c`, rounded once.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn fmsub_f32(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
    vfmaq_f32(vnegq_f32(c), a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn fmadd_f32(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
    vfmaq_f32(c, a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn fnmadd_f32(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
    vfmsq_f32(c, a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn fmsub_f64(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
    vfmaq_f64(vnegq_f64(c), a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn fmadd_f64(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
    vfmaq_f64(c, a, b)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn fnmadd_f64(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
    vfmsq_f64(c, a, b)
}

// =============================================================================
// Comparison predicates
// =============================================================================

/// `ne` predicates: NEON only has `ceq`, so negate it.
macro_rules! ne_predicate {
    ($name:ident, $vt:ty, $mt:ty, $ceq:path, $not:path) => {
        #[inline]
        #[target_feature(enable = "neon")]
        unsafe fn $name(a: $vt, b: $vt) -> $mt {
            $not($ceq(a, b))
        }
    };
}

ne_predicate!(vcneq_s8, int8x16_t, uint8x16_t, vceqq_s8, vmvnq_u8);
ne_predicate!(vcneq_u8, uint8x16_t, uint8x16_t, vceqq_u8, vmvnq_u8);
ne_predicate!(vcneq_s16, int16x8_t, uint16x8_t, vceqq_s16, vmvnq_u16);
ne_predicate!(vcneq_u16, uint16x8_t, uint16x8_t, vceqq_u16, vmvnq_u16);
ne_predicate!(vcneq_s32, int32x4_t, uint32x4_t, vceqq_s32, vmvnq_u32);
ne_predicate!(vcneq_u32, uint32x4_t, uint32x4_t, vceqq_u32, vmvnq_u32);
ne_predicate!(vcneq_s64, int64x2_t, uint64x2_t, vceqq_s64, not_u64);
ne_predicate!(vcneq_u64, uint64x2_t, uint64x2_t, vceqq_u64, not_u64);
ne_predicate!(vcneq_f32, float32x4_t, uint32x4_t, vceqq_f32, vmvnq_u32);
ne_predicate!(vcneq_f64, float64x2_t, uint64x2_t, vceqq_f64, not_u64);

// =============================================================================
// Elementwise kernels
// =============================================================================

/// Add/sub/min/max and the six comparisons for one lane type.
macro_rules! lane_kernels {
    ($t:ty, $load:path, $store:path, $mstore:path,
     [$add:ident, $sub:ident, $min:ident, $max:ident],
     [$eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident],
     ops: [$vadd:path, $vsub:path, $vmin:path, $vmax:path],
     preds: [$peq:path, $pne:path, $plt:path, $ple:path, $pgt:path, $pge:path]) => {
        binary_kernel!("neon", 16, $add, $t, $load, $store, $vadd);
        binary_kernel!("neon", 16, $sub, $t, $load, $store, $vsub);
        binary_kernel!("neon", 16, $min, $t, $load, $store, $vmin);
        binary_kernel!("neon", 16, $max, $t, $load, $store, $vmax);
        compare_kernel!("neon", 16, $eq, $t, $load, $mstore, $peq);
        compare_kernel!("neon", 16, $ne, $t, $load, $mstore, $pne);
        compare_kernel!("neon", 16, $lt, $t, $load, $mstore, $plt);
        compare_kernel!("neon", 16, $le, $t, $load, $mstore, $ple);
        compare_kernel!("neon", 16, $gt, $t, $load, $mstore, $pgt);
        compare_kernel!("neon", 16, $ge, $t, $load, $mstore, $pge);
    };
}

lane_kernels!(i8, vld1q_s8, vst1q_s8, vst1q_u8,
    [add_i8, sub_i8, min_i8, max_i8], [eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8],
    ops: [vaddq_s8, vsubq_s8, vminq_s8, vmaxq_s8],
    preds: [vceqq_s8, vcneq_s8, vcltq_s8, vcleq_s8, vcgtq_s8, vcgeq_s8]);
lane_kernels!(u8, vld1q_u8, vst1q_u8, vst1q_u8,
    [add_u8, sub_u8, min_u8, max_u8], [eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8],
    ops: [vaddq_u8, vsubq_u8, vminq_u8, vmaxq_u8],
    preds: [vceqq_u8, vcneq_u8, vcltq_u8, vcleq_u8, vcgtq_u8, vcgeq_u8]);
lane_kernels!(i16, vld1q_s16, vst1q_s16, vst1q_u16,
    [add_i16, sub_i16, min_i16, max_i16], [eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16],
    ops: [vaddq_s16, vsubq_s16, vminq_s16, vmaxq_s16],
    preds: [vceqq_s16, vcneq_s16, vcltq_s16, vcleq_s16, vcgtq_s16, vcgeq_s16]);
lane_kernels!(u16, vld1q_u16, vst1q_u16, vst1q_u16,
    [add_u16, sub_u16, min_u16, max_u16], [eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16],
    ops: [vaddq_u16, vsubq_u16, vminq_u16, vmaxq_u16],
    preds: [vceqq_u16, vcneq_u16, vcltq_u16, vcleq_u16, vcgtq_u16, vcgeq_u16]);
lane_kernels!(i32, vld1q_s32, vst1q_s32, vst1q_u32,
    [add_i32, sub_i32, min_i32, max_i32], [eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32],
    ops: [vaddq_s32, vsubq_s32, vminq_s32, vmaxq_s32],
    preds: [vceqq_s32, vcneq_s32, vcltq_s32, vcleq_s32, vcgtq_s32, vcgeq_s32]);
lane_kernels!(u32, vld1q_u32, vst1q_u32, vst1q_u32,
    [add_u32, sub_u32, min_u32, max_u32], [eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32],
    ops: [vaddq_u32, vsubq_u32, vminq_u32, vmaxq_u32],
    preds: [vceqq_u32, vcneq_u32, vcltq_u32, vcleq_u32, vcgtq_u32, vcgeq_u32]);
lane_kernels!(i64, vld1q_s64, vst1q_s64, vst1q_u64,
    [add_i64, sub_i64, min_i64, max_i64], [eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64],
    ops: [vaddq_s64, vsubq_s64, min_s64, max_s64],
    preds: [vceqq_s64, vcneq_s64, vcltq_s64, vcleq_s64, vcgtq_s64, vcgeq_s64]);
lane_kernels!(u64, vld1q_u64, vst1q_u64, vst1q_u64,
    [add_u64, sub_u64, min_u64, max_u64], [eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64],
    ops: [vaddq_u64, vsubq_u64, min_u64, max_u64],
    preds: [vceqq_u64, vcneq_u64, vcltq_u64, vcleq_u64, vcgtq_u64, vcgeq_u64]);
// `minnm`/`maxnm` return the non-NaN operand.
lane_kernels!(f32, vld1q_f32, vst1q_f32, vst1q_u32,
    [add_f32, sub_f32, min_f32, max_f32], [eq_f32, ne_f32, lt_f32, le_f32, gt_f32, ge_f32],
    ops: [vaddq_f32, vsubq_f32, vminnmq_f32, vmaxnmq_f32],
    preds: [vceqq_f32, vcneq_f32, vcltq_f32, vcleq_f32, vcgtq_f32, vcgeq_f32]);
lane_kernels!(f64, vld1q_f64, vst1q_f64, vst1q_u64,
    [add_f64, sub_f64, min_f64, max_f64], [eq_f64, ne_f64, lt_f64, le_f64, gt_f64, ge_f64],
    ops: [vaddq_f64, vsubq_f64, vminnmq_f64, vmaxnmq_f64],
    preds: [vceqq_f64, vcneq_f64, vcltq_f64, vcleq_f64, vcgtq_f64, vcgeq_f64]);

binary_kernel!("neon", 16, mul_i8, i8, vld1q_s8, vst1q_s8, vmulq_s8);
binary_kernel!("neon", 16, mul_u8, u8, vld1q_u8, vst1q_u8, vmulq_u8);
binary_kernel!("neon", 16, mul_i16, i16, vld1q_s16, vst1q_s16, vmulq_s16);
binary_kernel!("neon", 16, mul_u16, u16, vld1q_u16, vst1q_u16, vmulq_u16);
binary_kernel!("neon", 16, mul_i32, i32, vld1q_s32, vst1q_s32, vmulq_s32);
binary_kernel!("neon", 16, mul_u32, u32, vld1q_u32, vst1q_u32, vmulq_u32);
binary_kernel!("neon", 16, mul_f32, f32, vld1q_f32, vst1q_f32, vmulq_f32);
binary_kernel!("neon", 16, mul_f64, f64, vld1q_f64, vst1q_f64, vmulq_f64);

// Float-only operations.
binary_kernel!("neon", 16, div_f32, f32, vld1q_f32, vst1q_f32, vdivq_f32);
binary_kernel!("neon", 16, div_f64, f64, vld1q_f64, vst1q_f64, vdivq_f64);
unary_kernel!("neon", 16, sqrt_f32, f32, vld1q_f32, vst1q_f32, vsqrtq_f32);
unary_kernel!("neon", 16, sqrt_f64, f64, vld1q_f64, vst1q_f64, vsqrtq_f64);
ternary_kernel!("neon", 16, mul_add_f32, f32, vld1q_f32, vst1q_f32, fmadd_f32);
ternary_kernel!("neon", 16, mul_sub_f32, f32, vld1q_f32, vst1q_f32, fmsub_f32);
ternary_kernel!("neon", 16, neg_mul_add_f32, f32, vld1q_f32, vst1q_f32, fnmadd_f32);
ternary_kernel!("neon", 16, mul_add_f64, f64, vld1q_f64, vst1q_f64, fmadd_f64);
ternary_kernel!("neon", 16, mul_sub_f64, f64, vld1q_f64, vst1q_f64, fmsub_f64);
ternary_kernel!("neon", 16, neg_mul_add_f64, f64, vld1q_f64, vst1q_f64, fnmadd_f64);

// Negation and abs; integer abs of MIN wraps to MIN.
unary_kernel!("neon", 16, neg_i8, i8, vld1q_s8, vst1q_s8, vnegq_s8);
unary_kernel!("neon", 16, neg_i16, i16, vld1q_s16, vst1q_s16, vnegq_s16);
unary_kernel!("neon", 16, neg_i32, i32, vld1q_s32, vst1q_s32, vnegq_s32);
unary_kernel!("neon", 16, neg_i64, i64, vld1q_s64, vst1q_s64, vnegq_s64);
unary_kernel!("neon", 16, neg_f32, f32, vld1q_f32, vst1q_f32, vnegq_f32);
unary_kernel!("neon", 16, neg_f64, f64, vld1q_f64, vst1q_f64, vnegq_f64);
unary_kernel!("neon", 16, abs_i8, i8, vld1q_s8, vst1q_s8, vabsq_s8);
unary_kernel!("neon", 16, abs_i16, i16, vld1q_s16, vst1q_s16, vabsq_s16);
unary_kernel!("neon", 16, abs_i32, i32, vld1q_s32, vst1q_s32, vabsq_s32);
unary_kernel!("neon", 16, abs_i64, i64, vld1q_s64, vst1q_s64, vabsq_s64);
unary_kernel!("neon", 16, abs_f32, f32, vld1q_f32, vst1q_f32, vabsq_f32);
unary_kernel!("neon", 16, abs_f64, f64, vld1q_f64, vst1q_f64, vabsq_f64);

// =============================================================================
// Reductions
// =============================================================================

reduce_kernel!("neon", 16, reduce_sum_f32, f32, vld1q_f32, vaddq_f32, vaddvq_f32);
reduce_kernel!("neon", 16, reduce_sum_f64, f64, vld1q_f64, vaddq_f64, vaddvq_f64);
reduce_kernel!("neon", 16, reduce_sum_i32, i32, vld1q_s32, vaddq_s32, vaddvq_s32);
reduce_kernel!("neon", 16, reduce_sum_u32, u32, vld1q_u32, vaddq_u32, vaddvq_u32);
reduce_kernel!("neon", 16, reduce_sum_i64, i64, vld1q_s64, vaddq_s64, vaddvq_s64);
reduce_kernel!("neon", 16, reduce_sum_u64, u64, vld1q_u64, vaddq_u64, vaddvq_u64);
reduce_kernel!("neon", 16, reduce_min_f32, f32, vld1q_f32, vminnmq_f32, vminnmvq_f32);
reduce_kernel!("neon", 16, reduce_max_f32, f32, vld1q_f32, vmaxnmq_f32, vmaxnmvq_f32);
reduce_kernel!("neon", 16, reduce_min_f64, f64, vld1q_f64, vminnmq_f64, vminnmvq_f64);
reduce_kernel!("neon", 16, reduce_max_f64, f64, vld1q_f64, vmaxnmq_f64, vmaxnmvq_f64);
reduce_kernel!("neon", 16, reduce_min_i32, i32, vld1q_s32, vminq_s32, vminvq_s32);
reduce_kernel!("neon", 16, reduce_max_i32, i32, vld1q_s32, vmaxq_s32, vmaxvq_s32);
reduce_kernel!("neon", 16, reduce_min_u32, u32, vld1q_u32, vminq_u32, vminvq_u32);
reduce_kernel!("neon", 16, reduce_max_u32, u32, vld1q_u32, vmaxq_u32, vmaxvq_u32);

// =============================================================================
// Shifts
// =============================================================================

/// `vshl` shifts left by a signed per-lane count; a negative count shifts
/// right (arithmetic for signed lanes, logical for unsigned).
macro_rules! shift_kernel {
    ($name:ident, $t:ty, $load:path, $store:path, $shl:path, $dup:path, $ct:ty, $dir:expr) => {
        #[target_feature(enable = "neon")]
        pub(crate) unsafe fn $name(a: *const $t, out: *mut $t, lanes: usize, amount: u32) {
            const STEP: usize = BYTES / size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let count = $dup($dir * amount.min(64) as $ct);
            let mut i = 0;
            while i < lanes {
                $store(out.add(i), $shl($load(a.add(i)), count));
                i += STEP;
            }
        }
    };
}

shift_kernel!(shl_i8, i8, vld1q_s8, vst1q_s8, vshlq_s8, vdupq_n_s8, i8, 1);
shift_kernel!(shl_u8, u8, vld1q_u8, vst1q_u8, vshlq_u8, vdupq_n_s8, i8, 1);
shift_kernel!(shl_i16, i16, vld1q_s16, vst1q_s16, vshlq_s16, vdupq_n_s16, i16, 1);
shift_kernel!(shl_u16, u16, vld1q_u16, vst1q_u16, vshlq_u16, vdupq_n_s16, i16, 1);
shift_kernel!(shl_i32, i32, vld1q_s32, vst1q_s32, vshlq_s32, vdupq_n_s32, i32, 1);
shift_kernel!(shl_u32, u32, vld1q_u32, vst1q_u32, vshlq_u32, vdupq_n_s32, i32, 1);
shift_kernel!(shl_i64, i64, vld1q_s64, vst1q_s64, vshlq_s64, vdupq_n_s64, i64, 1);
shift_kernel!(shl_u64, u64, vld1q_u64, vst1q_u64, vshlq_u64, vdupq_n_s64, i64, 1);
shift_kernel!(shr_i8, i8, vld1q_s8, vst1q_s8, vshlq_s8, vdupq_n_s8, i8, -1);
shift_kernel!(shr_u8, u8, vld1q_u8, vst1q_u8, vshlq_u8, vdupq_n_s8, i8, -1);
shift_kernel!(shr_i16, i16, vld1q_s16, vst1q_s16, vshlq_s16, vdupq_n_s16, i16, -1);
shift_kernel!(shr_u16, u16, vld1q_u16, vst1q_u16, vshlq_u16, vdupq_n_s16, i16, -1);
shift_kernel!(shr_i32, i32, vld1q_s32, vst1q_s32, vshlq_s32, vdupq_n_s32, i32, -1);
shift_kernel!(shr_u32, u32, vld1q_u32, vst1q_u32, vshlq_u32, vdupq_n_s32, i32, -1);
shift_kernel!(shr_i64, i64, vld1q_s64, vst1q_s64, vshlq_s64, vdupq_n_s64, i64, -1);
shift_kernel!(shr_u64, u64, vld1q_u64, vst1q_u64, vshlq_u64, vdupq_n_s64, i64, -1);

// =============================================================================
// Shuffles (exactly one register)
// =============================================================================

#[inline]
#[target_feature(enable = "neon")]
unsafe fn rev_u8(v: uint8x16_t) -> uint8x16_t {
    let r = vrev64q_u8(v);
    vextq_u8::<8>(r, r)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn rev_u16(v: uint16x8_t) -> uint16x8_t {
    let r = vrev64q_u16(v);
    vextq_u16::<4>(r, r)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn rev_u32(v: uint32x4_t) -> uint32x4_t {
    let r = vrev64q_u32(v);
    vextq_u32::<2>(r, r)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn rev_u64(v: uint64x2_t) -> uint64x2_t {
    vextq_u64::<1>(v, v)
}

/// Width-generic shuffle kernels: the lane type only fixes the pointer type.
macro_rules! shuffle_kernels {
    ($reverse:ident, $lower:ident, $upper:ident,
     $load:path, $store:path, $rev:path, $zip1:path, $zip2:path) => {
        #[target_feature(enable = "neon")]
        pub(crate) unsafe fn $reverse<T>(a: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            $store(out.cast(), $rev($load(a.cast())));
        }

        #[target_feature(enable = "neon")]
        pub(crate) unsafe fn $lower<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            $store(out.cast(), $zip1($load(a.cast()), $load(b.cast())));
        }

        #[target_feature(enable = "neon")]
        pub(crate) unsafe fn $upper<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            $store(out.cast(), $zip2($load(a.cast()), $load(b.cast())));
        }
    };
}

shuffle_kernels!(reverse_8, interleave_lower_8, interleave_upper_8,
    vld1q_u8, vst1q_u8, rev_u8, vzip1q_u8, vzip2q_u8);
shuffle_kernels!(reverse_16, interleave_lower_16, interleave_upper_16,
    vld1q_u16, vst1q_u16, rev_u16, vzip1q_u16, vzip2q_u16);
shuffle_kernels!(reverse_32, interleave_lower_32, interleave_upper_32,
    vld1q_u32, vst1q_u32, rev_u32, vzip1q_u32, vzip2q_u32);
shuffle_kernels!(reverse_64, interleave_lower_64, interleave_upper_64,
    vld1q_u64, vst1q_u64, rev_u64, vzip1q_u64, vzip2q_u64);

// =============================================================================
// Byte kernels
// =============================================================================

#[inline]
#[target_feature(enable = "neon")]
unsafe fn and_not_u8(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
    // `bic(x, y)` is `x & !y`.
    vbicq_u8(b, a)
}

byte_binary_kernel!("neon", 16, and_bytes, vld1q_u8, vst1q_u8, vandq_u8);
byte_binary_kernel!("neon", 16, or_bytes, vld1q_u8, vst1q_u8, vorrq_u8);
byte_binary_kernel!("neon", 16, xor_bytes, vld1q_u8, vst1q_u8, veorq_u8);
byte_binary_kernel!("neon", 16, and_not_bytes, vld1q_u8, vst1q_u8, and_not_u8);

#[target_feature(enable = "neon")]
pub(crate) unsafe fn not_bytes(a: *const u8, out: *mut u8, len: usize) {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        vst1q_u8(out.add(i), vmvnq_u8(vld1q_u8(a.add(i))));
        i += BYTES;
    }
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn blend_bytes(
    mask: *const u8,
    a: *const u8,
    b: *const u8,
    out: *mut u8,
    len: usize,
) {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        let m = vld1q_u8(mask.add(i));
        let v = vbslq_u8(m, vld1q_u8(a.add(i)), vld1q_u8(b.add(i)));
        vst1q_u8(out.add(i), v);
        i += BYTES;
    }
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn count_set_bytes(mask: *const u8, len: usize) -> usize {
    debug_assert_eq!(len % BYTES, 0);
    let mut count = 0;
    let mut i = 0;
    while i < len {
        // Normalized mask bytes are 0x00 or 0xFF; keep the top bit.
        let ones = vshrq_n_u8::<7>(vld1q_u8(mask.add(i)));
        count += usize::from(vaddvq_u8(ones));
        i += BYTES;
    }
    count
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn first_set_byte(mask: *const u8, len: usize) -> usize {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        if vmaxvq_u8(vld1q_u8(mask.add(i))) != 0 {
            if let Some(j) = (0..BYTES).find(|&j| *mask.add(i + j) == 0xFF) {
                return i + j;
            }
        }
        i += BYTES;
    }
    len
}

// =============================================================================
// Binding
// =============================================================================

/// Overwrites the entries NEON implements.
///
/// The registry must only be used on CPUs with NEON (every aarch64 target).
#[allow(clippy::too_many_lines)]
pub(crate) fn bind(reg: &mut KernelRegistry) {
    macro_rules! bind_arith {
        ($k:expr, $add:ident, $sub:ident, $min:ident, $max:ident,
         $eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident) => {{
            let k = &mut $k;
            k.add = $add;
            k.sub = $sub;
            k.min = $min;
            k.max = $max;
            k.eq = $eq;
            k.ne = $ne;
            k.lt = $lt;
            k.le = $le;
            k.gt = $gt;
            k.ge = $ge;
        }};
    }

    macro_rules! bind_shuffle {
        ($k:expr, $t:ty, $reverse:ident, $lower:ident, $upper:ident) => {{
            let k = &mut $k;
            k.reverse = $reverse::<$t>;
            k.interleave_lower = $lower::<$t>;
            k.interleave_upper = $upper::<$t>;
        }};
    }

    bind_arith!(reg.arith.i8, add_i8, sub_i8, min_i8, max_i8, eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8);
    bind_arith!(reg.arith.u8, add_u8, sub_u8, min_u8, max_u8, eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8);
    bind_arith!(reg.arith.i16, add_i16, sub_i16, min_i16, max_i16, eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16);
    bind_arith!(reg.arith.u16, add_u16, sub_u16, min_u16, max_u16, eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16);
    bind_arith!(reg.arith.i32, add_i32, sub_i32, min_i32, max_i32, eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32);
    bind_arith!(reg.arith.u32, add_u32, sub_u32, min_u32, max_u32, eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32);
    bind_arith!(reg.arith.i64, add_i64, sub_i64, min_i64, max_i64, eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64);
    bind_arith!(reg.arith.u64, add_u64, sub_u64, min_u64, max_u64, eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64);
    bind_arith!(reg.arith.f32, add_f32, sub_f32, min_f32, max_f32, eq_f32, ne_f32, lt_f32, le_f32, gt_f32, ge_f32);
    bind_arith!(reg.arith.f64, add_f64, sub_f64, min_f64, max_f64, eq_f64, ne_f64, lt_f64, le_f64, gt_f64, ge_f64);

    reg.arith.i8.mul = mul_i8;
    reg.arith.u8.mul = mul_u8;
    reg.arith.i16.mul = mul_i16;
    reg.arith.u16.mul = mul_u16;
    reg.arith.i32.mul = mul_i32;
    reg.arith.u32.mul = mul_u32;
    reg.arith.f32.mul = mul_f32;
    reg.arith.f64.mul = mul_f64;

    reg.arith.f32.reduce_sum = reduce_sum_f32;
    reg.arith.f64.reduce_sum = reduce_sum_f64;
    reg.arith.i32.reduce_sum = reduce_sum_i32;
    reg.arith.u32.reduce_sum = reduce_sum_u32;
    reg.arith.i64.reduce_sum = reduce_sum_i64;
    reg.arith.u64.reduce_sum = reduce_sum_u64;
    reg.arith.f32.reduce_min = reduce_min_f32;
    reg.arith.f32.reduce_max = reduce_max_f32;
    reg.arith.f64.reduce_min = reduce_min_f64;
    reg.arith.f64.reduce_max = reduce_max_f64;
    reg.arith.i32.reduce_min = reduce_min_i32;
    reg.arith.i32.reduce_max = reduce_max_i32;
    reg.arith.u32.reduce_min = reduce_min_u32;
    reg.arith.u32.reduce_max = reduce_max_u32;

    reg.signed.i8.neg = neg_i8;
    reg.signed.i16.neg = neg_i16;
    reg.signed.i32.neg = neg_i32;
    reg.signed.i64.neg = neg_i64;
    reg.signed.f32.neg = neg_f32;
    reg.signed.f64.neg = neg_f64;
    reg.signed.i8.abs = abs_i8;
    reg.signed.i16.abs = abs_i16;
    reg.signed.i32.abs = abs_i32;
    reg.signed.i64.abs = abs_i64;
    reg.signed.f32.abs = abs_f32;
    reg.signed.f64.abs = abs_f64;

    reg.int.i8.shl = shl_i8;
    reg.int.u8.shl = shl_u8;
    reg.int.i16.shl = shl_i16;
    reg.int.u16.shl = shl_u16;
    reg.int.i32.shl = shl_i32;
    reg.int.u32.shl = shl_u32;
    reg.int.i64.shl = shl_i64;
    reg.int.u64.shl = shl_u64;
    reg.int.i8.shr = shr_i8;
    reg.int.u8.shr = shr_u8;
    reg.int.i16.shr = shr_i16;
    reg.int.u16.shr = shr_u16;
    reg.int.i32.shr = shr_i32;
    reg.int.u32.shr = shr_u32;
    reg.int.i64.shr = shr_i64;
    reg.int.u64.shr = shr_u64;

    let f32k = &mut reg.float.f32;
    f32k.div = div_f32;
    f32k.sqrt = sqrt_f32;
    f32k.mul_add = mul_add_f32;
    f32k.mul_sub = mul_sub_f32;
    f32k.neg_mul_add = neg_mul_add_f32;
    f32k.fused = true;
    let f64k = &mut reg.float.f64;
    f64k.div = div_f64;
    f64k.sqrt = sqrt_f64;
    f64k.mul_add = mul_add_f64;
    f64k.mul_sub = mul_sub_f64;
    f64k.neg_mul_add = neg_mul_add_f64;
    f64k.fused = true;

    bind_shuffle!(reg.shuffle.i8, i8, reverse_8, interleave_lower_8, interleave_upper_8);
    bind_shuffle!(reg.shuffle.u8, u8, reverse_8, interleave_lower_8, interleave_upper_8);
    bind_shuffle!(reg.shuffle.i16, i16, reverse_16, interleave_lower_16, interleave_upper_16);
    bind_shuffle!(reg.shuffle.u16, u16, reverse_16, interleave_lower_16, interleave_upper_16);
    bind_shuffle!(reg.shuffle.f16, half::f16, reverse_16, interleave_lower_16, interleave_upper_16);
    bind_shuffle!(reg.shuffle.bf16, half::bf16, reverse_16, interleave_lower_16, interleave_upper_16);
    bind_shuffle!(reg.shuffle.i32, i32, reverse_32, interleave_lower_32, interleave_upper_32);
    bind_shuffle!(reg.shuffle.u32, u32, reverse_32, interleave_lower_32, interleave_upper_32);
    bind_shuffle!(reg.shuffle.f32, f32, reverse_32, interleave_lower_32, interleave_upper_32);
    bind_shuffle!(reg.shuffle.i64, i64, reverse_64, interleave_lower_64, interleave_upper_64);
    bind_shuffle!(reg.shuffle.u64, u64, reverse_64, interleave_lower_64, interleave_upper_64);
    bind_shuffle!(reg.shuffle.f64, f64, reverse_64, interleave_lower_64, interleave_upper_64);

    let bytes = &mut reg.bytes;
    bytes.and = and_bytes;
    bytes.or = or_bytes;
    bytes.xor = xor_bytes;
    bytes.and_not = and_not_bytes;
    bytes.not = not_bytes;
    bytes.blend = blend_bytes;
    bytes.count_set = count_set_bytes;
    bytes.first_set = first_set_byte;
}
