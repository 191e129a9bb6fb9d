//! AVX-512 kernel implementations for x86_64.
//!
//! 512-bit kernels for 32/64-bit lanes (AVX-512F) and, when the CPU reports
//! AVX-512BW, for 8/16-bit lanes. The registry binds the AVX2 tables first,
//! so anything not overridden here (gather, f16 conversion, i64 multiply,
//! float -> int conversion) runs on the AVX2 kernel over two 256-bit steps.
//!
//! Comparisons produce `k` mask registers; they are expanded to full-lane
//! vectors before being stored.

// SAFETY: Numeric casts in this file are intentional and safe:
// - shift counts are clamped before the `as i32` conversion,
// - mask registers are widened into popcount/trailing-zero inputs,
// - the u32 sum reinterprets the wrapping i32 sum.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;
use std::mem::size_of;

use super::dispatch::KernelRegistry;
use super::lane_loop::{
    binary_kernel, byte_binary_kernel, compare_kernel, convert_kernel, reduce_kernel,
    ternary_kernel, unary_kernel,
};
use super::scalar;

const BYTES: usize = 64;

// =============================================================================
// Register helpers
// =============================================================================

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn all_ones() -> __m512i {
    _mm512_set1_epi32(-1)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn expand_mask32(k: __mmask16) -> __m512i {
    _mm512_maskz_mov_epi32(k, all_ones())
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn expand_mask64(k: __mmask8) -> __m512i {
    _mm512_maskz_mov_epi64(k, all_ones())
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn expand_mask8(k: __mmask64) -> __m512i {
    _mm512_maskz_mov_epi8(k, all_ones())
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn expand_mask16(k: __mmask32) -> __m512i {
    _mm512_maskz_mov_epi16(k, all_ones())
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn min_ps_nan(a: __m512, b: __m512) -> __m512 {
    let b_nan = _mm512_cmp_ps_mask::<_CMP_UNORD_Q>(b, b);
    _mm512_mask_mov_ps(_mm512_min_ps(a, b), b_nan, a)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn max_ps_nan(a: __m512, b: __m512) -> __m512 {
    let b_nan = _mm512_cmp_ps_mask::<_CMP_UNORD_Q>(b, b);
    _mm512_mask_mov_ps(_mm512_max_ps(a, b), b_nan, a)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn min_pd_nan(a: __m512d, b: __m512d) -> __m512d {
    let b_nan = _mm512_cmp_pd_mask::<_CMP_UNORD_Q>(b, b);
    _mm512_mask_mov_pd(_mm512_min_pd(a, b), b_nan, a)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn max_pd_nan(a: __m512d, b: __m512d) -> __m512d {
    let b_nan = _mm512_cmp_pd_mask::<_CMP_UNORD_Q>(b, b);
    _mm512_mask_mov_pd(_mm512_max_pd(a, b), b_nan, a)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn neg_ps(a: __m512) -> __m512 {
    _mm512_castsi512_ps(_mm512_xor_si512(_mm512_castps_si512(a), _mm512_set1_epi32(i32::MIN)))
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn neg_pd(a: __m512d) -> __m512d {
    _mm512_castsi512_pd(_mm512_xor_si512(_mm512_castpd_si512(a), _mm512_set1_epi64(i64::MIN)))
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn neg_epi32(a: __m512i) -> __m512i {
    _mm512_sub_epi32(_mm512_setzero_si512(), a)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn neg_epi64(a: __m512i) -> __m512i {
    _mm512_sub_epi64(_mm512_setzero_si512(), a)
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn neg_epi8(a: __m512i) -> __m512i {
    _mm512_sub_epi8(_mm512_setzero_si512(), a)
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn neg_epi16(a: __m512i) -> __m512i {
    _mm512_sub_epi16(_mm512_setzero_si512(), a)
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn mullo_epi8(a: __m512i, b: __m512i) -> __m512i {
    let even = _mm512_mullo_epi16(a, b);
    let odd = _mm512_mullo_epi16(_mm512_srli_epi16::<8>(a), _mm512_srli_epi16::<8>(b));
    _mm512_or_si512(
        _mm512_slli_epi16::<8>(odd),
        _mm512_and_si512(even, _mm512_set1_epi16(0x00FF)),
    )
}

// =============================================================================
// Comparison predicates
// =============================================================================

macro_rules! int_predicates {
    ($feat:literal, $vt:ty, $expand:path,
     $($name:ident => $cmp:path),* $(,)?) => {
        $(
            #[inline]
            #[target_feature(enable = $feat)]
            unsafe fn $name(a: $vt, b: $vt) -> __m512i {
                $expand($cmp(a, b))
            }
        )*
    };
}

int_predicates!("avx512f", __m512i, expand_mask32,
    eq_epi32 => _mm512_cmpeq_epi32_mask, ne_epi32 => _mm512_cmpneq_epi32_mask,
    lt_epi32 => _mm512_cmplt_epi32_mask, le_epi32 => _mm512_cmple_epi32_mask,
    gt_epi32 => _mm512_cmpgt_epi32_mask, ge_epi32 => _mm512_cmpge_epi32_mask);
int_predicates!("avx512f", __m512i, expand_mask32,
    eq_epu32 => _mm512_cmpeq_epu32_mask, ne_epu32 => _mm512_cmpneq_epu32_mask,
    lt_epu32 => _mm512_cmplt_epu32_mask, le_epu32 => _mm512_cmple_epu32_mask,
    gt_epu32 => _mm512_cmpgt_epu32_mask, ge_epu32 => _mm512_cmpge_epu32_mask);
int_predicates!("avx512f", __m512i, expand_mask64,
    eq_epi64 => _mm512_cmpeq_epi64_mask, ne_epi64 => _mm512_cmpneq_epi64_mask,
    lt_epi64 => _mm512_cmplt_epi64_mask, le_epi64 => _mm512_cmple_epi64_mask,
    gt_epi64 => _mm512_cmpgt_epi64_mask, ge_epi64 => _mm512_cmpge_epi64_mask);
int_predicates!("avx512f", __m512i, expand_mask64,
    eq_epu64 => _mm512_cmpeq_epu64_mask, ne_epu64 => _mm512_cmpneq_epu64_mask,
    lt_epu64 => _mm512_cmplt_epu64_mask, le_epu64 => _mm512_cmple_epu64_mask,
    gt_epu64 => _mm512_cmpgt_epu64_mask, ge_epu64 => _mm512_cmpge_epu64_mask);
int_predicates!("avx512f,avx512bw", __m512i, expand_mask8,
    eq_epi8 => _mm512_cmpeq_epi8_mask, ne_epi8 => _mm512_cmpneq_epi8_mask,
    lt_epi8 => _mm512_cmplt_epi8_mask, le_epi8 => _mm512_cmple_epi8_mask,
    gt_epi8 => _mm512_cmpgt_epi8_mask, ge_epi8 => _mm512_cmpge_epi8_mask);
int_predicates!("avx512f,avx512bw", __m512i, expand_mask8,
    eq_epu8 => _mm512_cmpeq_epu8_mask, ne_epu8 => _mm512_cmpneq_epu8_mask,
    lt_epu8 => _mm512_cmplt_epu8_mask, le_epu8 => _mm512_cmple_epu8_mask,
    gt_epu8 => _mm512_cmpgt_epu8_mask, ge_epu8 => _mm512_cmpge_epu8_mask);
int_predicates!("avx512f,avx512bw", __m512i, expand_mask16,
    eq_epi16 => _mm512_cmpeq_epi16_mask, ne_epi16 => _mm512_cmpneq_epi16_mask,
    lt_epi16 => _mm512_cmplt_epi16_mask, le_epi16 => _mm512_cmple_epi16_mask,
    gt_epi16 => _mm512_cmpgt_epi16_mask, ge_epi16 => _mm512_cmpge_epi16_mask);
int_predicates!("avx512f,avx512bw", __m512i, expand_mask16,
    eq_epu16 => _mm512_cmpeq_epu16_mask, ne_epu16 => _mm512_cmpneq_epu16_mask,
    lt_epu16 => _mm512_cmplt_epu16_mask, le_epu16 => _mm512_cmple_epu16_mask,
    gt_epu16 => _mm512_cmpgt_epu16_mask, ge_epu16 => _mm512_cmpge_epu16_mask);

macro_rules! float_predicates {
    ($vt:ty, $cmp:ident, $expand:path, $($name:ident => $pred:ident),* $(,)?) => {
        $(
            #[inline]
            #[target_feature(enable = "avx512f")]
            unsafe fn $name(a: $vt, b: $vt) -> __m512i {
                $expand($cmp::<$pred>(a, b))
            }
        )*
    };
}

float_predicates!(__m512, _mm512_cmp_ps_mask, expand_mask32,
    eq_ps => _CMP_EQ_OQ, ne_ps => _CMP_NEQ_UQ, lt_ps => _CMP_LT_OQ,
    le_ps => _CMP_LE_OQ, gt_ps => _CMP_GT_OQ, ge_ps => _CMP_GE_OQ);
float_predicates!(__m512d, _mm512_cmp_pd_mask, expand_mask64,
    eq_pd => _CMP_EQ_OQ, ne_pd => _CMP_NEQ_UQ, lt_pd => _CMP_LT_OQ,
    le_pd => _CMP_LE_OQ, gt_pd => _CMP_GT_OQ, ge_pd => _CMP_GE_OQ);

// =============================================================================
// Elementwise kernels
// =============================================================================

macro_rules! int_lane_kernels {
    ($feat:literal, $t:ty, [$add:ident, $sub:ident, $min:ident, $max:ident],
     [$eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident],
     ops: [$vadd:path, $vsub:path, $vmin:path, $vmax:path],
     preds: [$peq:path, $pne:path, $plt:path, $ple:path, $pgt:path, $pge:path]) => {
        binary_kernel!($feat, 64, $add, $t, _mm512_loadu_si512, _mm512_storeu_si512, $vadd);
        binary_kernel!($feat, 64, $sub, $t, _mm512_loadu_si512, _mm512_storeu_si512, $vsub);
        binary_kernel!($feat, 64, $min, $t, _mm512_loadu_si512, _mm512_storeu_si512, $vmin);
        binary_kernel!($feat, 64, $max, $t, _mm512_loadu_si512, _mm512_storeu_si512, $vmax);
        compare_kernel!($feat, 64, $eq, $t, _mm512_loadu_si512, _mm512_storeu_si512, $peq);
        compare_kernel!($feat, 64, $ne, $t, _mm512_loadu_si512, _mm512_storeu_si512, $pne);
        compare_kernel!($feat, 64, $lt, $t, _mm512_loadu_si512, _mm512_storeu_si512, $plt);
        compare_kernel!($feat, 64, $le, $t, _mm512_loadu_si512, _mm512_storeu_si512, $ple);
        compare_kernel!($feat, 64, $gt, $t, _mm512_loadu_si512, _mm512_storeu_si512, $pgt);
        compare_kernel!($feat, 64, $ge, $t, _mm512_loadu_si512, _mm512_storeu_si512, $pge);
    };
}

int_lane_kernels!("avx512f,avx2,fma", i32, [add_i32, sub_i32, min_i32, max_i32],
    [eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32],
    ops: [_mm512_add_epi32, _mm512_sub_epi32, _mm512_min_epi32, _mm512_max_epi32],
    preds: [eq_epi32, ne_epi32, lt_epi32, le_epi32, gt_epi32, ge_epi32]);
int_lane_kernels!("avx512f,avx2,fma", u32, [add_u32, sub_u32, min_u32, max_u32],
    [eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32],
    ops: [_mm512_add_epi32, _mm512_sub_epi32, _mm512_min_epu32, _mm512_max_epu32],
    preds: [eq_epu32, ne_epu32, lt_epu32, le_epu32, gt_epu32, ge_epu32]);
int_lane_kernels!("avx512f,avx2,fma", i64, [add_i64, sub_i64, min_i64, max_i64],
    [eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64],
    ops: [_mm512_add_epi64, _mm512_sub_epi64, _mm512_min_epi64, _mm512_max_epi64],
    preds: [eq_epi64, ne_epi64, lt_epi64, le_epi64, gt_epi64, ge_epi64]);
int_lane_kernels!("avx512f,avx2,fma", u64, [add_u64, sub_u64, min_u64, max_u64],
    [eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64],
    ops: [_mm512_add_epi64, _mm512_sub_epi64, _mm512_min_epu64, _mm512_max_epu64],
    preds: [eq_epu64, ne_epu64, lt_epu64, le_epu64, gt_epu64, ge_epu64]);
int_lane_kernels!("avx512f,avx512bw,avx2,fma", i8, [add_i8, sub_i8, min_i8, max_i8],
    [eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8],
    ops: [_mm512_add_epi8, _mm512_sub_epi8, _mm512_min_epi8, _mm512_max_epi8],
    preds: [eq_epi8, ne_epi8, lt_epi8, le_epi8, gt_epi8, ge_epi8]);
int_lane_kernels!("avx512f,avx512bw,avx2,fma", u8, [add_u8, sub_u8, min_u8, max_u8],
    [eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8],
    ops: [_mm512_add_epi8, _mm512_sub_epi8, _mm512_min_epu8, _mm512_max_epu8],
    preds: [eq_epu8, ne_epu8, lt_epu8, le_epu8, gt_epu8, ge_epu8]);
int_lane_kernels!("avx512f,avx512bw,avx2,fma", i16, [add_i16, sub_i16, min_i16, max_i16],
    [eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16],
    ops: [_mm512_add_epi16, _mm512_sub_epi16, _mm512_min_epi16, _mm512_max_epi16],
    preds: [eq_epi16, ne_epi16, lt_epi16, le_epi16, gt_epi16, ge_epi16]);
int_lane_kernels!("avx512f,avx512bw,avx2,fma", u16, [add_u16, sub_u16, min_u16, max_u16],
    [eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16],
    ops: [_mm512_add_epi16, _mm512_sub_epi16, _mm512_min_epu16, _mm512_max_epu16],
    preds: [eq_epu16, ne_epu16, lt_epu16, le_epu16, gt_epu16, ge_epu16]);

binary_kernel!("avx512f,avx2,fma", 64, mul_i32, i32, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_mullo_epi32);
binary_kernel!("avx512f,avx2,fma", 64, mul_u32, u32, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_mullo_epi32);
binary_kernel!("avx512f,avx512bw,avx2,fma", 64, mul_i16, i16, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_mullo_epi16);
binary_kernel!("avx512f,avx512bw,avx2,fma", 64, mul_u16, u16, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_mullo_epi16);
binary_kernel!("avx512f,avx512bw,avx2,fma", 64, mul_i8, i8, _mm512_loadu_si512, _mm512_storeu_si512, mullo_epi8);
binary_kernel!("avx512f,avx512bw,avx2,fma", 64, mul_u8, u8, _mm512_loadu_si512, _mm512_storeu_si512, mullo_epi8);

// f32
binary_kernel!("avx512f,avx2,fma", 64, add_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_add_ps);
binary_kernel!("avx512f,avx2,fma", 64, sub_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_sub_ps);
binary_kernel!("avx512f,avx2,fma", 64, mul_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_mul_ps);
binary_kernel!("avx512f,avx2,fma", 64, div_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_div_ps);
binary_kernel!("avx512f,avx2,fma", 64, min_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, min_ps_nan);
binary_kernel!("avx512f,avx2,fma", 64, max_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, max_ps_nan);
unary_kernel!("avx512f,avx2,fma", 64, sqrt_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_sqrt_ps);
unary_kernel!("avx512f,avx2,fma", 64, neg_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, neg_ps);
unary_kernel!("avx512f,avx2,fma", 64, abs_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_abs_ps);
ternary_kernel!("avx512f,avx2,fma", 64, mul_add_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_fmadd_ps);
ternary_kernel!("avx512f,avx2,fma", 64, mul_sub_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_fmsub_ps);
ternary_kernel!("avx512f,avx2,fma", 64, neg_mul_add_f32, f32, _mm512_loadu_ps, _mm512_storeu_ps, _mm512_fnmadd_ps);
compare_kernel!("avx512f,avx2,fma", 64, eq_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, eq_ps);
compare_kernel!("avx512f,avx2,fma", 64, ne_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, ne_ps);
compare_kernel!("avx512f,avx2,fma", 64, lt_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, lt_ps);
compare_kernel!("avx512f,avx2,fma", 64, le_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, le_ps);
compare_kernel!("avx512f,avx2,fma", 64, gt_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, gt_ps);
compare_kernel!("avx512f,avx2,fma", 64, ge_f32, f32, _mm512_loadu_ps, _mm512_storeu_si512, ge_ps);

// f64
binary_kernel!("avx512f,avx2,fma", 64, add_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_add_pd);
binary_kernel!("avx512f,avx2,fma", 64, sub_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_sub_pd);
binary_kernel!("avx512f,avx2,fma", 64, mul_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_mul_pd);
binary_kernel!("avx512f,avx2,fma", 64, div_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_div_pd);
binary_kernel!("avx512f,avx2,fma", 64, min_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, min_pd_nan);
binary_kernel!("avx512f,avx2,fma", 64, max_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, max_pd_nan);
unary_kernel!("avx512f,avx2,fma", 64, sqrt_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_sqrt_pd);
unary_kernel!("avx512f,avx2,fma", 64, neg_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, neg_pd);
unary_kernel!("avx512f,avx2,fma", 64, abs_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_abs_pd);
ternary_kernel!("avx512f,avx2,fma", 64, mul_add_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_fmadd_pd);
ternary_kernel!("avx512f,avx2,fma", 64, mul_sub_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_fmsub_pd);
ternary_kernel!("avx512f,avx2,fma", 64, neg_mul_add_f64, f64, _mm512_loadu_pd, _mm512_storeu_pd, _mm512_fnmadd_pd);
compare_kernel!("avx512f,avx2,fma", 64, eq_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, eq_pd);
compare_kernel!("avx512f,avx2,fma", 64, ne_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, ne_pd);
compare_kernel!("avx512f,avx2,fma", 64, lt_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, lt_pd);
compare_kernel!("avx512f,avx2,fma", 64, le_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, le_pd);
compare_kernel!("avx512f,avx2,fma", 64, gt_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, gt_pd);
compare_kernel!("avx512f,avx2,fma", 64, ge_f64, f64, _mm512_loadu_pd, _mm512_storeu_si512, ge_pd);

// Signed integer negation and abs.
unary_kernel!("avx512f,avx2,fma", 64, neg_i32, i32, _mm512_loadu_si512, _mm512_storeu_si512, neg_epi32);
unary_kernel!("avx512f,avx2,fma", 64, neg_i64, i64, _mm512_loadu_si512, _mm512_storeu_si512, neg_epi64);
unary_kernel!("avx512f,avx2,fma", 64, abs_i32, i32, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_abs_epi32);
unary_kernel!("avx512f,avx2,fma", 64, abs_i64, i64, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_abs_epi64);
unary_kernel!("avx512f,avx512bw,avx2,fma", 64, neg_i8, i8, _mm512_loadu_si512, _mm512_storeu_si512, neg_epi8);
unary_kernel!("avx512f,avx512bw,avx2,fma", 64, neg_i16, i16, _mm512_loadu_si512, _mm512_storeu_si512, neg_epi16);
unary_kernel!("avx512f,avx512bw,avx2,fma", 64, abs_i8, i8, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_abs_epi8);
unary_kernel!("avx512f,avx512bw,avx2,fma", 64, abs_i16, i16, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_abs_epi16);

// =============================================================================
// Reductions
// =============================================================================

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn hmin_ps(v: __m512) -> f32 {
    let mut lanes = [0.0f32; 16];
    _mm512_storeu_ps(lanes.as_mut_ptr(), v);
    lanes.into_iter().reduce(f32::min).unwrap_or(f32::NAN)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn hmax_ps(v: __m512) -> f32 {
    let mut lanes = [0.0f32; 16];
    _mm512_storeu_ps(lanes.as_mut_ptr(), v);
    lanes.into_iter().reduce(f32::max).unwrap_or(f32::NAN)
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn hsum_epu32(v: __m512i) -> u32 {
    _mm512_reduce_add_epi32(v) as u32
}

reduce_kernel!("avx512f,avx2,fma", 64, reduce_sum_f32, f32, _mm512_loadu_ps, _mm512_add_ps, _mm512_reduce_add_ps);
reduce_kernel!("avx512f,avx2,fma", 64, reduce_sum_f64, f64, _mm512_loadu_pd, _mm512_add_pd, _mm512_reduce_add_pd);
reduce_kernel!("avx512f,avx2,fma", 64, reduce_sum_i32, i32, _mm512_loadu_si512, _mm512_add_epi32, _mm512_reduce_add_epi32);
reduce_kernel!("avx512f,avx2,fma", 64, reduce_sum_u32, u32, _mm512_loadu_si512, _mm512_add_epi32, hsum_epu32);
reduce_kernel!("avx512f,avx2,fma", 64, reduce_min_f32, f32, _mm512_loadu_ps, min_ps_nan, hmin_ps);
reduce_kernel!("avx512f,avx2,fma", 64, reduce_max_f32, f32, _mm512_loadu_ps, max_ps_nan, hmax_ps);

// =============================================================================
// Shifts
// =============================================================================

macro_rules! shift_kernel {
    ($feat:literal, $name:ident, $t:ty, $op:path) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $name(a: *const $t, out: *mut $t, lanes: usize, amount: u32) {
            const STEP: usize = BYTES / size_of::<$t>();
            debug_assert_eq!(lanes % STEP, 0);
            let count = _mm_cvtsi32_si128(amount.min(64) as i32);
            let mut i = 0;
            while i < lanes {
                let v = _mm512_loadu_si512(a.add(i).cast());
                _mm512_storeu_si512(out.add(i).cast(), $op(v, count));
                i += STEP;
            }
        }
    };
}

shift_kernel!("avx512f,avx2,fma", shl_i32, i32, _mm512_sll_epi32);
shift_kernel!("avx512f,avx2,fma", shl_u32, u32, _mm512_sll_epi32);
shift_kernel!("avx512f,avx2,fma", shl_i64, i64, _mm512_sll_epi64);
shift_kernel!("avx512f,avx2,fma", shl_u64, u64, _mm512_sll_epi64);
shift_kernel!("avx512f,avx2,fma", shr_i32, i32, _mm512_sra_epi32);
shift_kernel!("avx512f,avx2,fma", shr_u32, u32, _mm512_srl_epi32);
shift_kernel!("avx512f,avx2,fma", shr_i64, i64, _mm512_sra_epi64);
shift_kernel!("avx512f,avx2,fma", shr_u64, u64, _mm512_srl_epi64);
shift_kernel!("avx512f,avx512bw,avx2,fma", shl_i16, i16, _mm512_sll_epi16);
shift_kernel!("avx512f,avx512bw,avx2,fma", shl_u16, u16, _mm512_sll_epi16);
shift_kernel!("avx512f,avx512bw,avx2,fma", shr_i16, i16, _mm512_sra_epi16);
shift_kernel!("avx512f,avx512bw,avx2,fma", shr_u16, u16, _mm512_srl_epi16);

// =============================================================================
// Shuffles (exactly one register)
// =============================================================================

const REVERSE_32: [i32; 16] = [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
const REVERSE_64: [i64; 8] = [7, 6, 5, 4, 3, 2, 1, 0];
const INTERLEAVE_LOWER_32: [i32; 16] = [0, 16, 1, 17, 2, 18, 3, 19, 4, 20, 5, 21, 6, 22, 7, 23];
const INTERLEAVE_UPPER_32: [i32; 16] =
    [8, 24, 9, 25, 10, 26, 11, 27, 12, 28, 13, 29, 14, 30, 15, 31];
const INTERLEAVE_LOWER_64: [i64; 8] = [0, 8, 1, 9, 2, 10, 3, 11];
const INTERLEAVE_UPPER_64: [i64; 8] = [4, 12, 5, 13, 6, 14, 7, 15];

/// Index vectors for 16-bit lanes; bit 5 of an index selects the second operand.
const fn reverse_16_indices() -> [i16; 32] {
    let mut idx = [0i16; 32];
    let mut i = 0;
    while i < 32 {
        idx[i] = 31 - i as i16;
        i += 1;
    }
    idx
}

const fn interleave_16_indices(start: i16) -> [i16; 32] {
    let mut idx = [0i16; 32];
    let mut i = 0;
    while i < 16 {
        idx[2 * i] = start + i as i16;
        idx[2 * i + 1] = 32 + start + i as i16;
        i += 1;
    }
    idx
}

const REVERSE_16: [i16; 32] = reverse_16_indices();
const INTERLEAVE_LOWER_16: [i16; 32] = interleave_16_indices(0);
const INTERLEAVE_UPPER_16: [i16; 32] = interleave_16_indices(16);

macro_rules! shuffle_kernels {
    ($feat:literal, $reverse:ident, $lower:ident, $upper:ident,
     $permute:path, $permute2:path, $rev_idx:expr, $lo_idx:expr, $hi_idx:expr) => {
        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $reverse<T>(a: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let idx = _mm512_loadu_si512($rev_idx.as_ptr().cast());
            let v = $permute(idx, _mm512_loadu_si512(a.cast()));
            _mm512_storeu_si512(out.cast(), v);
        }

        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $lower<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let idx = _mm512_loadu_si512($lo_idx.as_ptr().cast());
            let va = _mm512_loadu_si512(a.cast());
            let vb = _mm512_loadu_si512(b.cast());
            _mm512_storeu_si512(out.cast(), $permute2(va, idx, vb));
        }

        #[target_feature(enable = $feat)]
        pub(crate) unsafe fn $upper<T>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            debug_assert_eq!(lanes * size_of::<T>(), BYTES);
            let idx = _mm512_loadu_si512($hi_idx.as_ptr().cast());
            let va = _mm512_loadu_si512(a.cast());
            let vb = _mm512_loadu_si512(b.cast());
            _mm512_storeu_si512(out.cast(), $permute2(va, idx, vb));
        }
    };
}

shuffle_kernels!("avx512f,avx2,fma", reverse_32, interleave_lower_32, interleave_upper_32,
    _mm512_permutexvar_epi32, _mm512_permutex2var_epi32,
    REVERSE_32, INTERLEAVE_LOWER_32, INTERLEAVE_UPPER_32);
shuffle_kernels!("avx512f,avx2,fma", reverse_64, interleave_lower_64, interleave_upper_64,
    _mm512_permutexvar_epi64, _mm512_permutex2var_epi64,
    REVERSE_64, INTERLEAVE_LOWER_64, INTERLEAVE_UPPER_64);
shuffle_kernels!("avx512f,avx512bw,avx2,fma", reverse_16, interleave_lower_16, interleave_upper_16,
    _mm512_permutexvar_epi16, _mm512_permutex2var_epi16,
    REVERSE_16, INTERLEAVE_LOWER_16, INTERLEAVE_UPPER_16);

// =============================================================================
// Integer narrowing (AVX-512F down-converts)
// =============================================================================

macro_rules! down_convert {
    ($name:ident, $step:expr, $s:ty => $d:ty, |$v:ident| $body:expr) => {
        convert_kernel!("avx512f,avx2,fma", $step, $name, $s => $d, |src, dst| {
            let $v = _mm512_loadu_si512(src.cast());
            _mm256_storeu_si256(dst.cast(), $body);
        });
    };
}

down_convert!(demote_sat_i32_i16, 16, i32 => i16, |v| _mm512_cvtsepi32_epi16(v));
down_convert!(demote_trunc_i32_i16, 16, i32 => i16, |v| _mm512_cvtepi32_epi16(v));
down_convert!(demote_sat_i32_u16, 16, i32 => u16,
    |v| _mm512_cvtusepi32_epi16(_mm512_max_epi32(v, _mm512_setzero_si512())));
down_convert!(demote_trunc_i32_u16, 16, i32 => u16, |v| _mm512_cvtepi32_epi16(v));
down_convert!(demote_sat_u32_u16, 16, u32 => u16, |v| _mm512_cvtusepi32_epi16(v));
down_convert!(demote_trunc_u32_u16, 16, u32 => u16, |v| _mm512_cvtepi32_epi16(v));
down_convert!(demote_sat_i64_i32, 8, i64 => i32, |v| _mm512_cvtsepi64_epi32(v));
down_convert!(demote_trunc_i64_i32, 8, i64 => i32, |v| _mm512_cvtepi64_epi32(v));
down_convert!(demote_sat_u64_u32, 8, u64 => u32, |v| _mm512_cvtusepi64_epi32(v));
down_convert!(demote_trunc_u64_u32, 8, u64 => u32, |v| _mm512_cvtepi64_epi32(v));

// =============================================================================
// Byte kernels
// =============================================================================

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn not_si512(v: __m512i) -> __m512i {
    _mm512_xor_si512(v, all_ones())
}

byte_binary_kernel!("avx512f,avx2,fma", 64, and_bytes, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_and_si512);
byte_binary_kernel!("avx512f,avx2,fma", 64, or_bytes, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_or_si512);
byte_binary_kernel!("avx512f,avx2,fma", 64, xor_bytes, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_xor_si512);
byte_binary_kernel!("avx512f,avx2,fma", 64, and_not_bytes, _mm512_loadu_si512, _mm512_storeu_si512, _mm512_andnot_si512);

#[target_feature(enable = "avx512f,avx2,fma")]
pub(crate) unsafe fn not_bytes(a: *const u8, out: *mut u8, len: usize) {
    debug_assert_eq!(len % BYTES, 0);
    let mut i = 0;
    while i < len {
        let v = _mm512_loadu_si512(a.add(i).cast());
        _mm512_storeu_si512(out.add(i).cast(), not_si512(v));
        i += BYTES;
    }
}

#[target_feature(enable = "avx512f,avx2,fma")]
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
        let m = _mm512_loadu_si512(mask.add(i).cast());
        let va = _mm512_loadu_si512(a.add(i).cast());
        let vb = _mm512_loadu_si512(b.add(i).cast());
        let v = _mm512_or_si512(_mm512_and_si512(m, va), _mm512_andnot_si512(m, vb));
        _mm512_storeu_si512(out.add(i).cast(), v);
        i += BYTES;
    }
}

#[inline]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn full_byte_bits(p: *const u8) -> u64 {
    _mm512_cmpeq_epi8_mask(_mm512_loadu_si512(p.cast()), all_ones())
}

#[target_feature(enable = "avx512f,avx512bw,avx2,fma")]
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

#[target_feature(enable = "avx512f,avx512bw,avx2,fma")]
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

/// Overwrites the entries AVX-512 improves on. Call after `x86_avx2::bind`.
///
/// The registry must only be used on CPUs with AVX-512F, AVX2 and FMA;
/// 8/16-bit kernels are bound only when the feature probe reports AVX-512BW.
#[allow(clippy::too_many_lines)]
pub(crate) fn bind(reg: &mut KernelRegistry) {
    let bw = reg.features().avx512bw;

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
        ($k:expr, $t:ty, $reverse:expr, $lower:expr, $upper:expr) => {{
            let k = &mut $k;
            k.reverse = $reverse;
            k.interleave_lower = $lower;
            k.interleave_upper = $upper;
        }};
    }

    bind_arith!(reg.arith.i32, add_i32, sub_i32, min_i32, max_i32, eq_i32, ne_i32, lt_i32, le_i32, gt_i32, ge_i32);
    bind_arith!(reg.arith.u32, add_u32, sub_u32, min_u32, max_u32, eq_u32, ne_u32, lt_u32, le_u32, gt_u32, ge_u32);
    bind_arith!(reg.arith.i64, add_i64, sub_i64, min_i64, max_i64, eq_i64, ne_i64, lt_i64, le_i64, gt_i64, ge_i64);
    bind_arith!(reg.arith.u64, add_u64, sub_u64, min_u64, max_u64, eq_u64, ne_u64, lt_u64, le_u64, gt_u64, ge_u64);
    bind_arith!(reg.arith.f32, add_f32, sub_f32, min_f32, max_f32, eq_f32, ne_f32, lt_f32, le_f32, gt_f32, ge_f32);
    bind_arith!(reg.arith.f64, add_f64, sub_f64, min_f64, max_f64, eq_f64, ne_f64, lt_f64, le_f64, gt_f64, ge_f64);
    reg.arith.i32.mul = mul_i32;
    reg.arith.u32.mul = mul_u32;
    reg.arith.f32.mul = mul_f32;
    reg.arith.f64.mul = mul_f64;

    reg.arith.f32.reduce_sum = reduce_sum_f32;
    reg.arith.f32.reduce_min = reduce_min_f32;
    reg.arith.f32.reduce_max = reduce_max_f32;
    reg.arith.f64.reduce_sum = reduce_sum_f64;
    reg.arith.i32.reduce_sum = reduce_sum_i32;
    reg.arith.u32.reduce_sum = reduce_sum_u32;

    reg.signed.i32.neg = neg_i32;
    reg.signed.i64.neg = neg_i64;
    reg.signed.i32.abs = abs_i32;
    reg.signed.i64.abs = abs_i64;
    reg.signed.f32.neg = neg_f32;
    reg.signed.f32.abs = abs_f32;
    reg.signed.f64.neg = neg_f64;
    reg.signed.f64.abs = abs_f64;

    reg.int.i32.shl = shl_i32;
    reg.int.u32.shl = shl_u32;
    reg.int.i64.shl = shl_i64;
    reg.int.u64.shl = shl_u64;
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

    bind_shuffle!(reg.shuffle.i32, i32, reverse_32::<i32>, interleave_lower_32::<i32>, interleave_upper_32::<i32>);
    bind_shuffle!(reg.shuffle.u32, u32, reverse_32::<u32>, interleave_lower_32::<u32>, interleave_upper_32::<u32>);
    bind_shuffle!(reg.shuffle.f32, f32, reverse_32::<f32>, interleave_lower_32::<f32>, interleave_upper_32::<f32>);
    bind_shuffle!(reg.shuffle.i64, i64, reverse_64::<i64>, interleave_lower_64::<i64>, interleave_upper_64::<i64>);
    bind_shuffle!(reg.shuffle.u64, u64, reverse_64::<u64>, interleave_lower_64::<u64>, interleave_upper_64::<u64>);
    bind_shuffle!(reg.shuffle.f64, f64, reverse_64::<f64>, interleave_lower_64::<f64>, interleave_upper_64::<f64>);
    // The AVX2 8-bit shuffles only cover one 256-bit register.
    bind_shuffle!(reg.shuffle.i8, i8, scalar::reverse::<i8>, scalar::interleave_lower::<i8>, scalar::interleave_upper::<i8>);
    bind_shuffle!(reg.shuffle.u8, u8, scalar::reverse::<u8>, scalar::interleave_lower::<u8>, scalar::interleave_upper::<u8>);

    let c = &mut reg.convert;
    c.demote_i32_i16.saturating = demote_sat_i32_i16;
    c.demote_i32_i16.truncating = demote_trunc_i32_i16;
    c.demote_i32_u16.saturating = demote_sat_i32_u16;
    c.demote_i32_u16.truncating = demote_trunc_i32_u16;
    c.demote_u32_u16.saturating = demote_sat_u32_u16;
    c.demote_u32_u16.truncating = demote_trunc_u32_u16;
    c.demote_i64_i32.saturating = demote_sat_i64_i32;
    c.demote_i64_i32.truncating = demote_trunc_i64_i32;
    c.demote_u64_u32.saturating = demote_sat_u64_u32;
    c.demote_u64_u32.truncating = demote_trunc_u64_u32;

    let bytes = &mut reg.bytes;
    bytes.and = and_bytes;
    bytes.or = or_bytes;
    bytes.xor = xor_bytes;
    bytes.and_not = and_not_bytes;
    bytes.not = not_bytes;
    bytes.blend = blend_bytes;

    if bw {
        bind_arith!(reg.arith.i8, add_i8, sub_i8, min_i8, max_i8, eq_i8, ne_i8, lt_i8, le_i8, gt_i8, ge_i8);
        bind_arith!(reg.arith.u8, add_u8, sub_u8, min_u8, max_u8, eq_u8, ne_u8, lt_u8, le_u8, gt_u8, ge_u8);
        bind_arith!(reg.arith.i16, add_i16, sub_i16, min_i16, max_i16, eq_i16, ne_i16, lt_i16, le_i16, gt_i16, ge_i16);
        bind_arith!(reg.arith.u16, add_u16, sub_u16, min_u16, max_u16, eq_u16, ne_u16, lt_u16, le_u16, gt_u16, ge_u16);
        reg.arith.i8.mul = mul_i8;
        reg.arith.u8.mul = mul_u8;
        reg.arith.i16.mul = mul_i16;
        reg.arith.u16.mul = mul_u16;

        reg.signed.i8.neg = neg_i8;
        reg.signed.i16.neg = neg_i16;
        reg.signed.i8.abs = abs_i8;
        reg.signed.i16.abs = abs_i16;

        reg.int.i16.shl = shl_i16;
        reg.int.u16.shl = shl_u16;
        reg.int.i16.shr = shr_i16;
        reg.int.u16.shr = shr_u16;

        bind_shuffle!(reg.shuffle.i16, i16, reverse_16::<i16>, interleave_lower_16::<i16>, interleave_upper_16::<i16>);
        bind_shuffle!(reg.shuffle.u16, u16, reverse_16::<u16>, interleave_lower_16::<u16>, interleave_upper_16::<u16>);
        bind_shuffle!(reg.shuffle.f16, half::f16, reverse_16::<half::f16>, interleave_lower_16::<half::f16>, interleave_upper_16::<half::f16>);
        bind_shuffle!(reg.shuffle.bf16, half::bf16, reverse_16::<half::bf16>, interleave_lower_16::<half::bf16>, interleave_upper_16::<half::bf16>);

        reg.bytes.count_set = count_set_bytes;
        reg.bytes.first_set = first_set_byte;
    } else {
        bind_shuffle!(reg.shuffle.i16, i16, scalar::reverse::<i16>, scalar::interleave_lower::<i16>, scalar::interleave_upper::<i16>);
        bind_shuffle!(reg.shuffle.u16, u16, scalar::reverse::<u16>, scalar::interleave_lower::<u16>, scalar::interleave_upper::<u16>);
        bind_shuffle!(reg.shuffle.f16, half::f16, scalar::reverse::<half::f16>, scalar::interleave_lower::<half::f16>, scalar::interleave_upper::<half::f16>);
        bind_shuffle!(reg.shuffle.bf16, half::bf16, scalar::reverse::<half::bf16>, scalar::interleave_lower::<half::bf16>, scalar::interleave_upper::<half::bf16>);
    }
}
