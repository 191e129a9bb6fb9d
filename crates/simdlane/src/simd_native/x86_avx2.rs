//! AVX2+FMA kernel implementations for x86_64.
//!
//! 256-bit kernels for arithmetic, comparisons, reductions, shifts, shuffles,
//! gathers and byte operations. Lane types without a native instruction for
//! an operation keep the scalar kernel (8-bit shifts, 64-bit arithmetic right
//! shift, 64-bit abs, scatter).
//!
//! All functions require runtime AVX2+FMA detection before calling.

// SAFETY: Numeric casts in this file are intentional and safe:
// - shift counts are clamped before the `as i32` conversion,
// - movemask results are reinterpreted as bit sets.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;
use std::mem::size_of;

use super::dispatch::KernelRegistry;
use super::lane_loop::{
    binary_kernel, byte_binary_kernel, compare_kernel, reduce_kernel, ternary_kernel,
    unary_kernel,
};

const BYTES: usize = 32;

// =============================================================================
// Register helpers
// =============================================================================

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn not_si256(v: __m256i) -> __m256i {
    _mm256_xor_si256(v, _mm256_set1_epi32(-1))
}

/// 8-bit multiply from two 16-bit multiplies (even and odd bytes).
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn mullo_epi8(a: __m256i, b: __m256i) -> __m256i {
    let even = _mm256_mullo_epi16(a, b);
    let odd = _mm256_mullo_epi16(_mm256_srli_epi16::<8>(a), _mm256_srli_epi16::<8>(b));
    _mm256_or_si256(
        _mm256_slli_epi16::<8>(odd),
        _mm256_and_si256(even, _mm256_set1_epi16(0x00FF)),
    )
}

/// Low 64 bits of a 64x64 multiply from three 32x32 partial products.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn mullo_epi64(a: __m256i, b: __m256i) -> __m256i {
    let lo = _mm256_mul_epu32(a, b);
    let cross = _mm256_add_epi64(
        _mm256_mul_epu32(_mm256_srli_epi64::<32>(a), b),
        _mm256_mul_epu32(a, _mm256_srli_epi64::<32>(b)),
    );
    _mm256_add_epi64(lo, _mm256_slli_epi64::<32>(cross))
}

macro_rules! minmax_64 {
    ($min:ident, $max:ident, $bias:expr) => {
        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $min(a: __m256i, b: __m256i) -> __m256i {
            let bias = $bias;
            let gt = _mm256_cmpgt_epi64(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias));
            _mm256_blendv_epi8(a, b, gt)
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $max(a: __m256i, b: __m256i) -> __m256i {
            let bias = $bias;
            let gt = _mm256_cmpgt_epi64(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias));
            _mm256_blendv_epi8(b, a, gt)
        }
    };
}

minmax_64!(min_epi64, max_epi64, _mm256_setzero_si256());
minmax_64!(min_epu64, max_epu64, _mm256_set1_epi64x(i64::MIN));

/// Minimum where a NaN operand yields the other operand.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn min_ps_nan(a: __m256, b: __m256) -> __m256 {
    // `min_ps` returns `b` when either is NaN; restore `a` where `b` is NaN.
    _mm256_blendv_ps(_mm256_min_ps(a, b), a, _mm256_cmp_ps::<_CMP_UNORD_Q>(b, b))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn max_ps_nan(a: __m256, b: __m256) -> __m256 {
    _mm256_blendv_ps(_mm256_max_ps(a, b), a, _mm256_cmp_ps::<_CMP_UNORD_Q>(b, b))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn min_pd_nan(a: __m256d, b: __m256d) -> __m256d {
    _mm256_blendv_pd(_mm256_min_pd(a, b), a, _mm256_cmp_pd::<_CMP_UNORD_Q>(b, b))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn max_pd_nan(a: __m256d, b: __m256d) -> __m256d {
    _mm256_blendv_pd(_mm256_max_pd(a, b), a, _mm256_cmp_pd::<_CMP_UNORD_Q>(b, b))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn neg_ps(a: __m256) -> __m256 {
    _mm256_xor_ps(a, _mm256_set1_ps(-0.0))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn abs_ps(a: __m256) -> __m256 {
    _mm256_andnot_ps(_mm256_set1_ps(-0.0), a)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn neg_pd(a: __m256d) -> __m256d {
    _mm256_xor_pd(a, _mm256_set1_pd(-0.0))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn abs_pd(a: __m256d) -> __m256d {
    _mm256_andnot_pd(_mm256_set1_pd(-0.0), a)
}

macro_rules! neg_int {
    ($($name:ident => $sub:ident),*) => {
        $(
            #[inline]
            #[target_feature(enable = "avx2")]
            unsafe fn $name(a: __m256i) -> __m256i {
                $sub(_mm256_setzero_si256(), a)
            }
        )*
    };
}

neg_int!(neg_epi8 => _mm256_sub_epi8, neg_epi16 => _mm256_sub_epi16,
    neg_epi32 => _mm256_sub_epi32, neg_epi64 => _mm256_sub_epi64);

// =============================================================================
// Comparison predicates
// =============================================================================

/// Six predicates from `cmpeq`/`cmpgt`; unsigned types flip the sign bit first.
macro_rules! int_predicates {
    ($eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident,
     $cmpeq:path, $cmpgt:path, $bias:expr) => {
        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $eq(a: __m256i, b: __m256i) -> __m256i {
            $cmpeq(a, b)
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $ne(a: __m256i, b: __m256i) -> __m256i {
            not_si256($cmpeq(a, b))
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $gt(a: __m256i, b: __m256i) -> __m256i {
            let bias = $bias;
            $cmpgt(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $lt(a: __m256i, b: __m256i) -> __m256i {
            $gt(b, a)
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $le(a: __m256i, b: __m256i) -> __m256i {
            not_si256($gt(a, b))
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $ge(a: __m256i, b: __m256i) -> __m256i {
            not_si256($gt(b, a))
        }
    };
}

int_predicates!(eq_epi8, ne_epi8, lt_epi8, le_epi8, gt_epi8, ge_epi8,
    _mm256_cmpeq_epi8, _mm256_cmpgt_epi8, _mm256_setzero_si256());
int_predicates!(eq_epi16, ne_epi16, lt_epi16, le_epi16, gt_epi16, ge_epi16,
    _mm256_cmpeq_epi16, _mm256_cmpgt_epi16, _mm256_setzero_si256());
int_predicates!(eq_epi32, ne_epi32, lt_epi32, le_epi32, gt_epi32, ge_epi32,
    _mm256_cmpeq_epi32, _mm256_cmpgt_epi32, _mm256_setzero_si256());
int_predicates!(eq_epi64, ne_epi64, lt_epi64, le_epi64, gt_epi64, ge_epi64,
    _mm256_cmpeq_epi64, _mm256_cmpgt_epi64, _mm256_setzero_si256());
int_predicates!(eq_epu8, ne_epu8, lt_epu8, le_epu8, gt_epu8, ge_epu8,
    _mm256_cmpeq_epi8, _mm256_cmpgt_epi8, _mm256_set1_epi8(i8::MIN));
int_predicates!(eq_epu16, ne_epu16, lt_epu16, le_epu16, gt_epu16, ge_epu16,
    _mm256_cmpeq_epi16, _mm256_cmpgt_epi16, _mm256_set1_epi16(i16::MIN));
int_predicates!(eq_epu32, ne_epu32, lt_epu32, le_epu32, gt_epu32, ge_epu32,
    _mm256_cmpeq_epi32, _mm256_cmpgt_epi32, _mm256_set1_epi32(i32::MIN));
int_predicates!(eq_epu64, ne_epu64, lt_epu64, le_epu64, gt_epu64, ge_epu64,
    _mm256_cmpeq_epi64, _mm256_cmpgt_epi64, _mm256_set1_epi64x(i64::MIN));

/// Float predicates; only `ne` is true for unordered operands.
macro_rules! float_predicates {
    ($vt:ty, $cmp:ident, $($name:ident => $pred:ident),*) => {
        $(
            #[inline]
            #[target_feature(enable = "avx2")]
            unsafe fn $name(a: $vt, b: $vt) -> $vt {
                $cmp::<$pred>(a, b)
            }
        )*
    };
}

float_predicates!(__m256, _mm256_cmp_ps,
    eq_ps => _CMP_EQ_OQ, ne_ps => _CMP_NEQ_UQ, lt_ps => _CMP_LT_OQ,
    le_ps => _CMP_LE_OQ, gt_ps => _CMP_GT_OQ, ge_ps => _CMP_GE_OQ);
float_predicates!(__m256d, _mm256_cmp_pd,
    eq_pd => _CMP_EQ_OQ, ne_pd => _CMP_NEQ_UQ, lt_pd => _CMP_LT_OQ,
    le_pd => _CMP_LE_OQ, gt_pd => _CMP_GT_OQ, ge_pd => _CMP_GE_OQ);

// =============================================================================
// Elementwise kernels
// =============================================================================

/// add, sub, mul, min, max and six comparisons for one integer lane type.
macro_rules! int_lane_kernels {
    ($t:ty, [$add:ident, $sub:ident, $mul:ident, $min:ident, $max:ident],
     [$eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident],
     ops: [$vadd:path, $vsub:path, $vmul:path, $vmin:path, $vmax:path],
     preds: [$peq:path, $pne:path, $plt:path, $ple:path, $pgt:path, $pge:path]) => {
        binary_kernel!("avx2,fma", 32, $add, $t, _mm256_loadu_si256, _mm256_storeu_si256, $vadd);
        binary_kernel!("avx2,fma", 32, $sub, $t, _mm256_loadu_si256, _mm256_storeu_si256, $vsub);
        binary_kernel!("avx2,fma", 32, $mul, $t, _mm256_loadu_si256, _mm256_storeu_si256, $vmul);
        binary_kernel!("avx2,fma", 32, $min, $t, _mm256_loadu_si256, _mm256_storeu_si256, $vmin);
        binary_kernel!("avx2,fma", 32, $max, $t, _mm256_loadu_si256, _mm256_storeu_si256, $vmax);
        compare_kernel!("avx2,fma", 32, $eq, $t, _mm256_loadu_si256, _mm256_storeu_si256, $peq);
        compare_kernel!("avx2,fma", 32, $ne, $t, _mm256_loadu_si256, _mm256_storeu_si256, $pne);
        compare_kernel!("avx2,fma", 32, $lt, $t, _mm256_loadu_si256, _mm256_storeu_si256, $plt);
        compare_kernel!("avx2,fma", 32, $le, $t, _mm256_loadu_si256, _mm256_storeu_si256, $ple);
        compare_kernel!("avx2,fma", 32, $gt, $t, _mm256_loadu_si256, _mm256_storeu_si256, $pgt);
        compare_kernel!("avx2,fma", 32, $ge, $t, _mm256_loadu_si256, _mm256_storeu_si256, $pge);
    };
}

int_lane_kernels!(i8, [add_i8, sub_i8, mul_i8, min_i8, max_i8],
    [eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8],
    ops: [_mm256_add_epi8, _mm256_sub_epi8, mullo_epi8, _mm256_min_epi8, _mm256_max_epi8],
    preds: [eq_epi8, ne_epi8, lt_epi8, le_epi8, gt_epi8, ge_epi8]);
int_lane_kernels!(u8, [add_u8, sub_u8, mul_u8, min_u8, max_u8],
    [eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8],
    ops: [_mm256_add_epi8, _mm256_sub_epi8, mullo_epi8, _mm256_min_epu8, _mm256_max_epu8],
    preds: [eq_epu8, ne_epu8, lt_epu8, le_epu8, gt_epu8, ge_epu8]);
int_lane_kernels!(i16, [add_i16, sub_i16, mul_i16, min_i16, max_i16],
    [eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16],
    ops: [_mm256_add_epi16, _mm256_sub_epi16, _mm256_mullo_epi16, _mm256_min_epi16, _mm256_max_epi16],
    preds: [eq_epi16, ne_epi16, lt_epi16, le_epi16, gt_epi16, ge_epi16]);
int_lane_kernels!(u16, [add_u16, sub_u16, mul_u16, min_u16, max_u16],
    [eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16],
    ops: [_mm256_add_epi16, _mm256_sub_epi16, _mm256_mullo_epi16, _mm256_min_epu16, _mm256_max_epu16],
    preds: [eq_epu16, ne_epu16, lt_epu16, le_epu16, gt_epu16, ge_epu16]);
int_lane_kernels!(i32, [add_i32, sub_i32, mul_i32, min_i32, max_i32],
    [eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32],
    ops: [_mm256_add_epi32, _mm256_sub_epi32, _mm256_mullo_epi32, _mm256_min_epi32, _mm256_max_epi32],
    preds: [eq_epi32, ne_epi32, lt_epi32, le_epi32, gt_epi32, ge_epi32]);
int_lane_kernels!(u32, [add_u32, sub_u32, mul_u32, min_u32, max_u32],
    [eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32],
    ops: [_mm256_add_epi32, _mm256_sub_epi32, _mm256_mullo_epi32, _mm256_min_epu32, _mm256_max_epu32],
    preds: [eq_epu32, ne_epu32, lt_epu32, le_epu32, gt_epu32, ge_epu32]);
int_lane_kernels!(i64, [add_i64, sub_i64, mul_i64, min_i64, max_i64],
    [eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64],
    ops: [_mm256_add_epi64, _mm256_sub_epi64, mullo_epi64, min_epi64, max_epi64],
    preds: [eq_epi64, ne_epi64, lt_epi64, le_epi64, gt_epi64, ge_epi64]);
int_lane_kernels!(u64, [add_u64, sub_u64, mul_u64, min_u64, max_u64],
    [eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64],
    ops: [_mm256_add_epi64, _mm256_sub_epi64, mullo_epi64, min_epu64, max_epu64],
    preds: [eq_epu64, ne_epu64, lt_epu64, le_epu64, gt_epu64, ge_epu64]);

// f32
binary_kernel!("avx2,fma", 32, add_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_add_ps);
binary_kernel!("avx2,fma", 32, sub_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_sub_ps);
binary_kernel!("avx2,fma", 32, mul_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_mul_ps);
binary_kernel!("avx2,fma", 32, div_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_div_ps);
binary_kernel!("avx2,fma", 32, min_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, min_ps_nan);
binary_kernel!("avx2,fma", 32, max_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, max_ps_nan);
unary_kernel!("avx2,fma", 32, sqrt_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_sqrt_ps);
unary_kernel!("avx2,fma", 32, neg_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, neg_ps);
unary_kernel!("avx2,fma", 32, abs_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, abs_ps);
ternary_kernel!("avx2,fma", 32, mul_add_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_fmadd_ps);
ternary_kernel!("avx2,fma", 32, mul_sub_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_fmsub_ps);
ternary_kernel!("avx2,fma", 32, neg_mul_add_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_fnmadd_ps);
compare_kernel!("avx2,fma", 32, eq_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, eq_ps);
compare_kernel!("avx2,fma", 32, ne_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, ne_ps);
compare_kernel!("avx2,fma", 32, lt_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, lt_ps);
compare_kernel!("avx2,fma", 32, le_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, le_ps);
compare_kernel!("avx2,fma", 32, gt_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, gt_ps);
compare_kernel!("avx2,fma", 32, ge_f32, f32, _mm256_loadu_ps, _mm256_storeu_ps, ge_ps);

// f64
binary_kernel!("avx2,fma", 32, add_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_add_pd);
binary_kernel!("avx2,fma", 32, sub_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_sub_pd);
binary_kernel!("avx2,fma", 32, mul_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_mul_pd);
binary_kernel!("avx2,fma", 32, div_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_div_pd);
binary_kernel!("avx2,fma", 32, min_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, min_pd_nan);
binary_kernel!("avx2,fma", 32, max_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, max_pd_nan);
unary_kernel!("avx2,fma", 32, sqrt_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_sqrt_pd);
unary_kernel!("avx2,fma", 32, neg_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, neg_pd);
unary_kernel!("avx2,fma", 32, abs_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, abs_pd);
ternary_kernel!("avx2,fma", 32, mul_add_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_fmadd_pd);
ternary_kernel!("avx2,fma", 32, mul_sub_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_fmsub_pd);
ternary_kernel!("avx2,fma", 32, neg_mul_add_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_fnmadd_pd);
compare_kernel!("avx2,fma", 32, eq_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, eq_pd);
compare_kernel!("avx2,fma", 32, ne_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, ne_pd);
compare_kernel!("avx2,fma", 32, lt_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, lt_pd);
compare_kernel!("avx2,fma", 32, le_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, le_pd);
compare_kernel!("avx2,fma", 32, gt_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, gt_pd);
compare_kernel!("avx2,fma", 32, ge_f64, f64, _mm256_loadu_pd, _mm256_storeu_pd, ge_pd);

// Signed integer negation and abs (64-bit abs has no AVX2 instruction).
unary_kernel!("avx2,fma", 32, neg_i8, i8, _mm256_loadu_si256, _mm256_storeu_si256, neg_epi8);
unary_kernel!("avx2,fma", 32, neg_i16, i16, _mm256_loadu_si256, _mm256_storeu_si256, neg_epi16);
unary_kernel!("avx2,fma", 32, neg_i32, i32, _mm256_loadu_si256, _mm256_storeu_si256, neg_epi32);
unary_kernel!("avx2,fma", 32, neg_i64, i64, _mm256_loadu_si256, _mm256_storeu_si256, neg_epi64);
unary_kernel!("avx2,fma", 32, abs_i8, i8, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_abs_epi8);
unary_kernel!("avx2,fma", 32, abs_i16, i16, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_abs_epi16);
unary_kernel!("avx2,fma", 32, abs_i32, i32, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_abs_epi32);

// =============================================================================
// Reductions
// =============================================================================

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_ps(v: __m256) -> f32 {
    let sum = _mm_add_ps(_mm256_castps256_ps128(v), _mm256_extractf128_ps::<1>(v));
    let shuf = _mm_movehdup_ps(sum);
    let sums = _mm_add_ps(sum, shuf);
    let shuf = _mm_movehl_ps(shuf, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_pd(v: __m256d) -> f64 {
    let sum = _mm_add_pd(_mm256_castpd256_pd128(v), _mm256_extractf128_pd::<1>(v));
    _mm_cvtsd_f64(_mm_add_sd(sum, _mm_unpackhi_pd(sum, sum)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_epi32(v: __m256i) -> i32 {
    let sum = _mm_add_epi32(_mm256_castsi256_si128(v), _mm256_extracti128_si256::<1>(v));
    let sum = _mm_add_epi32(sum, _mm_shuffle_epi32::<0b01_00_11_10>(sum));
    let sum = _mm_add_epi32(sum, _mm_shuffle_epi32::<0b10_11_00_01>(sum));
    _mm_cvtsi128_si32(sum)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_epu32(v: __m256i) -> u32 {
    hsum_epi32(v) as u32
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hmin_ps(v: __m256) -> f32 {
    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), v);
    lanes.into_iter().reduce(f32::min).unwrap_or(f32::NAN)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hmax_ps(v: __m256) -> f32 {
    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), v);
    lanes.into_iter().reduce(f32::max).unwrap_or(f32::NAN)
}

reduce_kernel!("avx2,fma", 32, reduce_sum_f32, f32, _mm256_loadu_ps, _mm256_add_ps, hsum_ps);
reduce_kernel!("avx2,fma", 32, reduce_sum_f64, f64, _mm256_loadu_pd, _mm256_add_pd, hsum_pd);
reduce_kernel!("avx2,fma", 32, reduce_sum_i32, i32, _mm256_loadu_si256, _mm256_add_epi32, hsum_epi32);
reduce_kernel!("avx2,fma", 32, reduce_sum_u32, u32, _mm256_loadu_si256, _mm256_add_epi32, hsum_epu32);
reduce_kernel!("avx2,fma", 32, reduce_min_f32, f32, _mm256_loadu_ps, min_ps_nan, hmin_ps);
reduce_kernel!("avx2,fma", 32, reduce_max_f32, f32, _mm256_loadu_ps, max_ps_nan, hmax_ps);

// =============================================================================
// Shifts
// =============================================================================

/// Shift by a runtime count; counts at or above the lane width give 0
/// (logical) or the sign fill (arithmetic), matching the scalar kernels.
macro_rules! shift_kernel {
    ($name:ident, $t:ty, $op:path) => {
        #[target_feature(enable = "avx2,fma")]
        pub(crate) unsafe fn $name(a: *const $t, out: *mut $t, lanes: usize, amount: u32) {
            const STEP: usize = BYTES / size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let count = _mm_cvtsi32_si128(amount.min(64) as i32);
            let mut i = 0;
            while i < lanes {
                let v = _mm256_loadu_si256(a.add(i).cast());
                _mm256_storeu_si256(out.add(i).cast(), $op(v, count));
                i += STEP;
            }
        }
    };
}

shift_kernel!(shl_i16, i16, _mm256_sll_epi16);
shift_kernel!(shl_u16, u16, _mm256_sll_epi16);
shift_kernel!(shl_i32, i32, _mm256_sll_epi32);
shift_kernel!(shl_u32, u32, _mm256_sll_epi32);
shift_kernel!(shl_i64, i64, _mm256_sll_epi64);
shift_kernel!(shl_u64, u64, _mm256_sll_epi64);
shift_kernel!(shr_i16, i16, _mm256_sra_epi16);
shift_kernel!(shr_u16, u16, _mm256_srl_epi16);
shift_kernel!(shr_i32, i32, _mm256_sra_epi32);
shift_kernel!(shr_u32, u32, _mm256_srl_epi32);
shift_kernel!(shr_u64, u64, _mm256_srl_epi64);

// =============================================================================
// Shuffles (exactly one register)
// =============================================================================

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reverse_epi8(v: __m256i) -> __m256i {
    let idx = _mm256_setr_epi8(
        15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, //
        15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
    );
    _mm256_permute4x64_epi64::<0x4E>(_mm256_shuffle_epi8(v, idx))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reverse_epi16(v: __m256i) -> __m256i {
    let idx = _mm256_setr_epi8(
        14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1, //
        14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1,
    );
    _mm256_permute4x64_epi64::<0x4E>(_mm256_shuffle_epi8(v, idx))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reverse_epi32(v: __m256i) -> __m256i {
    _mm256_permutevar8x32_epi32(v, _mm256_setr_epi32(7, 6, 5, 4, 3, 2, 1, 0))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reverse_epi64(v: __m256i) -> __m256i {
    _mm256_permute4x64_epi64::<0x1B>(v)
}

/// `unpack*` interleaves within 128-bit halves; `permute2x128` stitches the
/// halves back into lane order.
macro_rules! interleave_fns {
    ($lower:ident, $upper:ident, $unpacklo:path, $unpackhi:path) => {
        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $lower(a: __m256i, b: __m256i) -> __m256i {
            _mm256_permute2x128_si256::<0x20>($unpacklo(a, b), $unpackhi(a, b))
        }

        #[inline]
        #[target_feature(enable = "avx2")]
        unsafe fn $upper(a: __m256i, b: __m256i) -> __m256i {
            _mm256_permute2x128_si256::<0x31>($unpacklo(a, b), $unpackhi(a, b))
        }
    };
}

interleave_fns!(interleave_lower_epi8, interleave_upper_epi8, _mm256_unpacklo_epi8, _mm256_unpackhi_epi8);
interleave_fns!(interleave_lower_epi16, interleave_upper_epi16, _mm256_unpacklo_epi16, _mm256_unpackhi_epi16);
interleave_fns!(interleave_lower_epi32, interleave_upper_epi32, _mm256_unpacklo_epi32, _mm256_unpackhi_epi32);
interleave_fns!(interleave_lower_epi64, interleave_upper_epi64, _mm256_unpacklo_epi64, _mm256_unpackhi_epi64);

/// Width-generic shuffle kernels: the lane type only fixes the pointer type.
macro_rules! shuffle_kernels {
    ($reverse:ident, $lower:ident, $upper:ident, $vrev:path, $vlo:path, $vhi:path) => {
        #[target_feature(enable = "avx2,fma")]
        pub(crate) unsafe fn $reverse<T>(a: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let v = _mm256_loadu_si256(a.cast());
            _mm256_storeu_si256(out.cast(), $vrev(v));
        }

        #[target_feature(enable = "avx2,fma")]
        pub(crate) unsafe fn $lower<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let r = $vlo(_mm256_loadu_si256(a.cast()), _mm256_loadu_si256(b.cast()));
            _mm256_storeu_si256(out.cast(), r);
        }

        #[target_feature(enable = "avx2,fma")]
        pub(crate) unsafe fn $upper<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let r = $vhi(_mm256_loadu_si256(a.cast()), _mm256_loadu_si256(b.cast()));
            _mm256_storeu_si256(out.cast(), r);
        }
    };
}

shuffle_kernels!(reverse_8, interleave_lower_8, interleave_upper_8,
    reverse_epi8, interleave_lower_epi8, interleave_upper_epi8);
shuffle_kernels!(reverse_16, interleave_lower_16, interleave_upper_16,
    reverse_epi16, interleave_lower_epi16, interleave_upper_epi16);
shuffle_kernels!(reverse_32, interleave_lower_32, interleave_upper_32,
    reverse_epi32, interleave_lower_epi32, interleave_upper_epi32);
shuffle_kernels!(reverse_64, interleave_lower_64, interleave_upper_64,
    reverse_epi64, interleave_lower_epi64, interleave_upper_epi64);

// =============================================================================
// Gather
// =============================================================================

#[target_feature(enable = "avx2,fma")]
pub(crate) unsafe fn gather_32<T>(base: *const T, idx: *const i32, out: *mut T, lanes: usize) {
    debug_assert_eq!(size_of::<T>(), 4);
    debug_assert_eq!(lanes % 8, 0);
    let mut i = 0;
    while i < lanes {
        let offsets = _mm256_loadu_si256(idx.add(i).cast());
        let v = _mm256_i32gather_epi32::<4>(base.cast(), offsets);
        _mm256_storeu_si256(out.add(i).cast(), v);
        i += 8;
    }
}

#[target_feature(enable = "avx2,fma")]
pub(crate) unsafe fn gather_64<T>(base: *const T, idx: *const i64, out: *mut T, lanes: usize) {
    debug_assert_eq!(size_of::<T>(), 8);
    debug_assert_eq!(lanes % 4, 0);
    let mut i = 0;
    while i < lanes {
        let offsets = _mm256_loadu_si256(idx.add(i).cast());
        let v = _mm256_i64gather_epi64::<8>(base.cast(), offsets);
        _mm256_storeu_si256(out.add(i).cast(), v);
        i += 4;
    }
}

// =============================================================================
// Byte kernels
// =============================================================================

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn blend_si256(mask: __m256i, a: __m256i, b: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_and_si256(mask, a), _mm256_andnot_si256(mask, b))
}

byte_binary_kernel!("avx2,fma", 32, and_bytes, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_and_si256);
byte_binary_kernel!("avx2,fma", 32, or_bytes, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_or_si256);
byte_binary_kernel!("avx2,fma", 32, xor_bytes, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_xor_si256);
byte_binary_kernel!("avx2,fma", 32, and_not_bytes, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_andnot_si256);

#[target_feature(enable = "avx2,fma")]
pub(crate) unsafe fn not_bytes(a: *const u8, out: *mut u8, len: usize) {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        let v = _mm256_loadu_si256(a.add(i).cast());
        _mm256_storeu_si256(out.add(i).cast(), not_si256(v));
        i += BYTES;
    }
}

#[target_feature(enable = "avx2,fma")]
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
        let m = _mm256_loadu_si256(mask.add(i).cast());
        let va = _mm256_loadu_si256(a.add(i).cast());
        let vb = _mm256_loadu_si256(b.add(i).cast());
        _mm256_storeu_si256(out.add(i).cast(), blend_si256(m, va, vb));
        i += BYTES;
    }
}

/// Bit `j` set when byte `j` of the register is `0xFF`.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn full_byte_bits(p: *const u8) -> u32 {
    let v = _mm256_loadu_si256(p.cast());
    _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, _mm256_set1_epi8(-1))) as u32
}

#[target_feature(enable = "avx2,fma")]
pub(crate) unsafe fn count_set_bytes(mask: *const u8, len: usize) -> usize {
    debug_assert_eq!(len % BYTES, 0);
    let mut count = 0;
    let mut i = 0;
    while i < len {
        count += full_byte_bits(mask.add(i)).count_ones() as usize;
        i += BYTES;
    }
    count
}

#[target_feature(enable = "avx2,fma")]
pub(crate) unsafe fn first_set_byte(mask: *const u8, len: usize) -> usize {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        let bits = full_byte_bits(mask.add(i));
        if bits != 0 {
            return i + bits.trailing_zeros() as usize;
        }
        i += BYTES;
    }
    len
}

// =============================================================================
// Binding
// =============================================================================

/// Overwrites the registry entries this backend implements.
///
/// The registry must only be used on CPUs with AVX2 and FMA.
pub(crate) fn bind(reg: &mut KernelRegistry) {
    macro_rules! bind_arith {
        ($k:expr, $add:ident, $sub:ident, $mul:ident, $min:ident, $max:ident,
         $eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident) => {{
            let k = &mut $k;
            k.add = $add;
            k.sub = $sub;
            k.mul = $mul;
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

    bind_arith!(reg.arith.i8, add_i8, sub_i8, mul_i8, min_i8, max_i8, eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8);
    bind_arith!(reg.arith.u8, add_u8, sub_u8, mul_u8, min_u8, max_u8, eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8);
    bind_arith!(reg.arith.i16, add_i16, sub_i16, mul_i16, min_i16, max_i16, eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16);
    bind_arith!(reg.arith.u16, add_u16, sub_u16, mul_u16, min_u16, max_u16, eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16);
    bind_arith!(reg.arith.i32, add_i32, sub_i32, mul_i32, min_i32, max_i32, eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32);
    bind_arith!(reg.arith.u32, add_u32, sub_u32, mul_u32, min_u32, max_u32, eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32);
    bind_arith!(reg.arith.i64, add_i64, sub_i64, mul_i64, min_i64, max_i64, eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64);
    bind_arith!(reg.arith.u64, add_u64, sub_u64, mul_u64, min_u64, max_u64, eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64);
    bind_arith!(reg.arith.f32, add_f32, sub_f32, mul_f32, min_f32, max_f32, eq_f32, ne_f32, lt_f32, le_f32, gt_f32, ge_f32);
    bind_arith!(reg.arith.f64, add_f64, sub_f64, mul_f64, min_f64, max_f64, eq_f64, ne_f64, lt_f64, le_f64, gt_f64, ge_f64);

    reg.arith.f32.reduce_sum = reduce_sum_f32;
    reg.arith.f32.reduce_min = reduce_min_f32;
    reg.arith.f32.reduce_max = reduce_max_f32;
    reg.arith.f64.reduce_sum = reduce_sum_f64;
    reg.arith.i32.reduce_sum = reduce_sum_i32;
    reg.arith.u32.reduce_sum = reduce_sum_u32;

    reg.signed.i8.neg = neg_i8;
    reg.signed.i16.neg = neg_i16;
    reg.signed.i32.neg = neg_i32;
    reg.signed.i64.neg = neg_i64;
    reg.signed.i8.abs = abs_i8;
    reg.signed.i16.abs = abs_i16;
    reg.signed.i32.abs = abs_i32;
    reg.signed.f32.neg = neg_f32;
    reg.signed.f32.abs = abs_f32;
    reg.signed.f64.neg = neg_f64;
    reg.signed.f64.abs = abs_f64;

    reg.int.i16.shl = shl_i16;
    reg.int.u16.shl = shl_u16;
    reg.int.i32.shl = shl_i32;
    reg.int.u32.shl = shl_u32;
    reg.int.i64.shl = shl_i64;
    reg.int.u64.shl = shl_u64;
    reg.int.i16.shr = shr_i16;
    reg.int.u16.shr = shr_u16;
    reg.int.i32.shr = shr_i32;
    reg.int.u32.shr = shr_u32;
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

    macro_rules! bind_shuffle {
        ($k:expr, $t:ty, $reverse:ident, $lower:ident, $upper:ident) => {{
            let k = &mut $k;
            k.reverse = $reverse::<$t>;
            k.interleave_lower = $lower::<$t>;
            k.interleave_upper = $upper::<$t>;
        }};
    }

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

    reg.gather.i32.gather = gather_32::<i32>;
    reg.gather.u32.gather = gather_32::<u32>;
    reg.gather.f32.gather = gather_32::<f32>;
    reg.gather.i64.gather = gather_64::<i64>;
    reg.gather.u64.gather = gather_64::<u64>;
    reg.gather.f64.gather = gather_64::<f64>;

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
