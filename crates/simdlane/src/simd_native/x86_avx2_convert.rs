//! AVX2 (+F16C) conversion kernels for x86_64.
//!
//! Narrowing kernels read one 256-bit register of wide lanes and write the
//! narrow half (128 bits). Widening kernels read 128 bits and write 256.
//! f32 <-> f16 uses F16C only when the CPU reports it; bf16 is pure integer
//! AVX2 and reproduces `narrow::bits` bit for bit.

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use half::{bf16, f16};

use super::dispatch::KernelRegistry;
use super::lane_loop::convert_kernel;

// =============================================================================
// Helpers
// =============================================================================

/// Packs the eight 32-bit results of `packs/packus(v, v)` into the low 128 bits.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn store_low_packed(dst: *mut __m128i, packed: __m256i) {
    // `pack*` works per 128-bit half: [v0..3 v0..3 | v4..7 v4..7].
    let ordered = _mm256_permute4x64_epi64::<0x08>(packed);
    _mm_storeu_si128(dst, _mm256_castsi256_si128(ordered));
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load256(p: *const u8) -> __m256i {
    _mm256_loadu_si256(p.cast())
}

// =============================================================================
// Integer narrowing
// =============================================================================

convert_kernel!("avx2,fma", 16, demote_sat_i16_i8, i16 => i8, |src, dst| {
    let v = load256(src.cast());
    store_low_packed(dst.cast(), _mm256_packs_epi16(v, v));
});

convert_kernel!("avx2,fma", 16, demote_sat_i16_u8, i16 => u8, |src, dst| {
    let v = load256(src.cast());
    store_low_packed(dst.cast(), _mm256_packus_epi16(v, v));
});

convert_kernel!("avx2,fma", 16, demote_sat_u16_u8, u16 => u8, |src, dst| {
    // Clamp as unsigned first; `packus` reads its input as signed.
    let v = _mm256_min_epu16(load256(src.cast()), _mm256_set1_epi16(0x00FF));
    store_low_packed(dst.cast(), _mm256_packus_epi16(v, v));
});

convert_kernel!("avx2,fma", 8, demote_sat_i32_i16, i32 => i16, |src, dst| {
    let v = load256(src.cast());
    store_low_packed(dst.cast(), _mm256_packs_epi32(v, v));
});

convert_kernel!("avx2,fma", 8, demote_sat_i32_u16, i32 => u16, |src, dst| {
    let v = load256(src.cast());
    store_low_packed(dst.cast(), _mm256_packus_epi32(v, v));
});

convert_kernel!("avx2,fma", 8, demote_sat_u32_u16, u32 => u16, |src, dst| {
    let v = _mm256_min_epu32(load256(src.cast()), _mm256_set1_epi32(0xFFFF));
    store_low_packed(dst.cast(), _mm256_packus_epi32(v, v));
});

macro_rules! truncate_16_to_8 {
    ($name:ident, $s:ty => $d:ty) => {
        convert_kernel!("avx2,fma", 16, $name, $s => $d, |src, dst| {
            let v = _mm256_and_si256(load256(src.cast()), _mm256_set1_epi16(0x00FF));
            store_low_packed(dst.cast(), _mm256_packus_epi16(v, v));
        });
    };
}

macro_rules! truncate_32_to_16 {
    ($name:ident, $s:ty => $d:ty) => {
        convert_kernel!("avx2,fma", 8, $name, $s => $d, |src, dst| {
            let v = _mm256_and_si256(load256(src.cast()), _mm256_set1_epi32(0xFFFF));
            store_low_packed(dst.cast(), _mm256_packus_epi32(v, v));
        });
    };
}

macro_rules! truncate_64_to_32 {
    ($name:ident, $s:ty => $d:ty) => {
        convert_kernel!("avx2,fma", 4, $name, $s => $d, |src, dst| {
            let idx = _mm256_setr_epi32(0, 2, 4, 6, 0, 2, 4, 6);
            let v = _mm256_permutevar8x32_epi32(load256(src.cast()), idx);
            _mm_storeu_si128(dst.cast(), _mm256_castsi256_si128(v));
        });
    };
}

truncate_16_to_8!(demote_trunc_i16_i8, i16 => i8);
truncate_16_to_8!(demote_trunc_i16_u8, i16 => u8);
truncate_16_to_8!(demote_trunc_u16_u8, u16 => u8);
truncate_32_to_16!(demote_trunc_i32_i16, i32 => i16);
truncate_32_to_16!(demote_trunc_i32_u16, i32 => u16);
truncate_32_to_16!(demote_trunc_u32_u16, u32 => u16);
truncate_64_to_32!(demote_trunc_i64_i32, i64 => i32);
truncate_64_to_32!(demote_trunc_u64_u32, u64 => u32);

// =============================================================================
// Integer widening
// =============================================================================

macro_rules! widen {
    ($name:ident, $step:expr, $s:ty => $d:ty, $cvt:path) => {
        convert_kernel!("avx2,fma", $step, $name, $s => $d, |src, dst| {
            let v = _mm_loadu_si128(src.cast());
            _mm256_storeu_si256(dst.cast(), $cvt(v));
        });
    };
}

widen!(promote_i8_i16, 16, i8 => i16, _mm256_cvtepi8_epi16);
widen!(promote_u8_u16, 16, u8 => u16, _mm256_cvtepu8_epi16);
widen!(promote_i16_i32, 8, i16 => i32, _mm256_cvtepi16_epi32);
widen!(promote_u16_u32, 8, u16 => u32, _mm256_cvtepu16_epi32);
widen!(promote_i32_i64, 4, i32 => i64, _mm256_cvtepi32_epi64);
widen!(promote_u32_u64, 4, u32 => u64, _mm256_cvtepu32_epi64);

// =============================================================================
// Float conversions
// =============================================================================

convert_kernel!("avx2,fma", 4, promote_f32_f64, f32 => f64, |src, dst| {
    _mm256_storeu_pd(dst, _mm256_cvtps_pd(_mm_loadu_ps(src)));
});

convert_kernel!("avx2,fma", 4, demote_f64_f32, f64 => f32, |src, dst| {
    _mm_storeu_ps(dst, _mm256_cvtpd_ps(_mm256_loadu_pd(src)));
});

convert_kernel!("avx2,fma", 8, i32_to_f32, i32 => f32, |src, dst| {
    _mm256_storeu_ps(dst, _mm256_cvtepi32_ps(load256(src.cast())));
});

convert_kernel!("avx2,fma", 8, f32_to_i32, f32 => i32, |src, dst| {
    let v = _mm256_loadu_ps(src);
    // `cvtt` yields i32::MIN for NaN and every out-of-range input.
    let truncated = _mm256_cvttps_epi32(v);
    let too_big = _mm256_castps_si256(_mm256_cmp_ps::<_CMP_GE_OQ>(v, _mm256_set1_ps(2_147_483_648.0)));
    let ordered = _mm256_castps_si256(_mm256_cmp_ps::<_CMP_ORD_Q>(v, v));
    let saturated = _mm256_blendv_epi8(truncated, _mm256_set1_epi32(i32::MAX), too_big);
    _mm256_storeu_si256(dst.cast(), _mm256_and_si256(saturated, ordered));
});

convert_kernel!("avx2,fma,f16c", 8, demote_f32_f16, f32 => f16, |src, dst| {
    let h = _mm256_cvtps_ph::<_MM_FROUND_TO_NEAREST_INT>(_mm256_loadu_ps(src));
    _mm_storeu_si128(dst.cast(), h);
});

convert_kernel!("avx2,fma,f16c", 8, promote_f16_f32, f16 => f32, |src, dst| {
    _mm256_storeu_ps(dst, _mm256_cvtph_ps(_mm_loadu_si128(src.cast())));
});

convert_kernel!("avx2,fma", 8, demote_f32_bf16, f32 => bf16, |src, dst| {
    let v = _mm256_loadu_ps(src);
    let bits = _mm256_castps_si256(v);
    let lsb = _mm256_and_si256(_mm256_srli_epi32::<16>(bits), _mm256_set1_epi32(1));
    let bias = _mm256_add_epi32(_mm256_set1_epi32(0x7FFF), lsb);
    let rounded = _mm256_srli_epi32::<16>(_mm256_add_epi32(bits, bias));
    let quiet = _mm256_or_si256(_mm256_srli_epi32::<16>(bits), _mm256_set1_epi32(0x0040));
    let nan = _mm256_castps_si256(_mm256_cmp_ps::<_CMP_UNORD_Q>(v, v));
    let result = _mm256_blendv_epi8(rounded, quiet, nan);
    store_low_packed(dst.cast(), _mm256_packus_epi32(result, result));
});

convert_kernel!("avx2,fma", 8, promote_bf16_f32, bf16 => f32, |src, dst| {
    let wide = _mm256_cvtepu16_epi32(_mm_loadu_si128(src.cast()));
    _mm256_storeu_si256(dst.cast(), _mm256_slli_epi32::<16>(wide));
});

// =============================================================================
// Binding
// =============================================================================

/// Overwrites the conversion entries this backend implements.
///
/// The registry must only be used on CPUs with AVX2 and FMA; F16C kernels
/// are bound only when the registry's feature probe reports `f16c`.
pub(crate) fn bind(reg: &mut KernelRegistry) {
    let f16c = reg.features().f16c;
    let c = &mut reg.convert;

    c.demote_i16_i8.saturating = demote_sat_i16_i8;
    c.demote_i16_i8.truncating = demote_trunc_i16_i8;
    c.demote_i16_u8.saturating = demote_sat_i16_u8;
    c.demote_i16_u8.truncating = demote_trunc_i16_u8;
    c.demote_u16_u8.saturating = demote_sat_u16_u8;
    c.demote_u16_u8.truncating = demote_trunc_u16_u8;
    c.demote_i32_i16.saturating = demote_sat_i32_i16;
    c.demote_i32_i16.truncating = demote_trunc_i32_i16;
    c.demote_i32_u16.saturating = demote_sat_i32_u16;
    c.demote_i32_u16.truncating = demote_trunc_i32_u16;
    c.demote_u32_u16.saturating = demote_sat_u32_u16;
    c.demote_u32_u16.truncating = demote_trunc_u32_u16;
    c.demote_i64_i32.truncating = demote_trunc_i64_i32;
    c.demote_u64_u32.truncating = demote_trunc_u64_u32;

    c.promote_i8_i16 = promote_i8_i16;
    c.promote_u8_u16 = promote_u8_u16;
    c.promote_i16_i32 = promote_i16_i32;
    c.promote_u16_u32 = promote_u16_u32;
    c.promote_i32_i64 = promote_i32_i64;
    c.promote_u32_u64 = promote_u32_u64;
    c.promote_f32_f64 = promote_f32_f64;
    c.demote_f64_f32 = demote_f64_f32;
    c.i32_to_f32 = i32_to_f32;
    c.f32_to_i32 = f32_to_i32;

    c.demote_f32_bf16 = demote_f32_bf16;
    c.promote_bf16_f32 = promote_bf16_f32;

    if f16c {
        c.demote_f32_f16 = demote_f32_f16;
        c.promote_f16_f32 = promote_f16_f32;
    }
}
