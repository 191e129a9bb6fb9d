//! NEON conversion kernels for aarch64.
//!
//! Narrowing reads one 128-bit register and writes a 64-bit half; widening
//! does the reverse. f32 <-> f16 stays on the scalar kernel (the half-precision
//! vector types are not stable in `std::arch`); bf16 is integer NEON and
//! matches `narrow::bits` bit for bit.

#![allow(clippy::wildcard_imports)]

use std::arch::aarch64::*;

use half::bf16;

use super::dispatch::KernelRegistry;
use super::lane_loop::convert_kernel;

// =============================================================================
// Integer narrowing
// =============================================================================

macro_rules! half_register {
    ($name:ident, $step:expr, $s:ty => $d:ty, $load:path, $store:path, |$v:ident| $body:expr) => {
        convert_kernel!("neon", $step, $name, $s => $d, |src, dst| {
            let $v = $load(src);
            $store(dst, $body);
        });
    };
}

half_register!(demote_sat_i16_i8, 8, i16 => i8, vld1q_s16, vst1_s8, |v| vqmovn_s16(v));
half_register!(demote_sat_i16_u8, 8, i16 => u8, vld1q_s16, vst1_u8, |v| vqmovun_s16(v));
half_register!(demote_sat_u16_u8, 8, u16 => u8, vld1q_u16, vst1_u8, |v| vqmovn_u16(v));
half_register!(demote_sat_i32_i16, 4, i32 => i16, vld1q_s32, vst1_s16, |v| vqmovn_s32(v));
half_register!(demote_sat_i32_u16, 4, i32 => u16, vld1q_s32, vst1_u16, |v| vqmovun_s32(v));
half_register!(demote_sat_u32_u16, 4, u32 => u16, vld1q_u32, vst1_u16, |v| vqmovn_u32(v));
half_register!(demote_sat_i64_i32, 2, i64 => i32, vld1q_s64, vst1_s32, |v| vqmovn_s64(v));
half_register!(demote_sat_u64_u32, 2, u64 => u32, vld1q_u64, vst1_u32, |v| vqmovn_u64(v));

half_register!(demote_trunc_i16_i8, 8, i16 => i8, vld1q_s16, vst1_s8, |v| vmovn_s16(v));
half_register!(demote_trunc_i16_u8, 8, i16 => u8, vld1q_s16, vst1_u8,
    |v| vmovn_u16(vreinterpretq_u16_s16(v)));
half_register!(demote_trunc_u16_u8, 8, u16 => u8, vld1q_u16, vst1_u8, |v| vmovn_u16(v));
half_register!(demote_trunc_i32_i16, 4, i32 => i16, vld1q_s32, vst1_s16, |v| vmovn_s32(v));
half_register!(demote_trunc_i32_u16, 4, i32 => u16, vld1q_s32, vst1_u16,
    |v| vmovn_u32(vreinterpretq_u32_s32(v)));
half_register!(demote_trunc_u32_u16, 4, u32 => u16, vld1q_u32, vst1_u16, |v| vmovn_u32(v));
half_register!(demote_trunc_i64_i32, 2, i64 => i32, vld1q_s64, vst1_s32, |v| vmovn_s64(v));
half_register!(demote_trunc_u64_u32, 2, u64 => u32, vld1q_u64, vst1_u32, |v| vmovn_u64(v));

// =============================================================================
// Integer widening
// =============================================================================

half_register!(promote_i8_i16, 8, i8 => i16, vld1_s8, vst1q_s16, |v| vmovl_s8(v));
half_register!(promote_u8_u16, 8, u8 => u16, vld1_u8, vst1q_u16, |v| vmovl_u8(v));
half_register!(promote_i16_i32, 4, i16 => i32, vld1_s16, vst1q_s32, |v| vmovl_s16(v));
half_register!(promote_u16_u32, 4, u16 => u32, vld1_u16, vst1q_u32, |v| vmovl_u16(v));
half_register!(promote_i32_i64, 2, i32 => i64, vld1_s32, vst1q_s64, |v| vmovl_s32(v));
half_register!(promote_u32_u64, 2, u32 => u64, vld1_u32, vst1q_u64, |v| vmovl_u32(v));

// =============================================================================
// Float conversions
// =============================================================================

half_register!(promote_f32_f64, 2, f32 => f64, vld1_f32, vst1q_f64, |v| vcvt_f64_f32(v));
half_register!(demote_f64_f32, 2, f64 => f32, vld1q_f64, vst1_f32, |v| vcvt_f32_f64(v));
half_register!(i32_to_f32, 4, i32 => f32, vld1q_s32, vst1q_f32, |v| vcvtq_f32_s32(v));
half_register!(i64_to_f64, 2, i64 => f64, vld1q_s64, vst1q_f64, |v| vcvtq_f64_s64(v));
// FCVTZS truncates, saturates and maps NaN to zero.
half_register!(f32_to_i32, 4, f32 => i32, vld1q_f32, vst1q_s32, |v| vcvtq_s32_f32(v));
half_register!(f64_to_i64, 2, f64 => i64, vld1q_f64, vst1q_s64, |v| vcvtq_s64_f64(v));

#[inline]
#[target_feature(enable = "neon")]
unsafe fn round_to_bf16(v: float32x4_t) -> uint16x4_t {
    let bits = vreinterpretq_u32_f32(v);
    let upper = vshrq_n_u32::<16>(bits);
    let lsb = vandq_u32(upper, vdupq_n_u32(1));
    let bias = vaddq_u32(vdupq_n_u32(0x7FFF), lsb);
    let rounded = vshrq_n_u32::<16>(vaddq_u32(bits, bias));
    let quiet = vorrq_u32(upper, vdupq_n_u32(0x0040));
    let nan = vmvnq_u32(vceqq_f32(v, v));
    vmovn_u32(vbslq_u32(nan, quiet, rounded))
}

convert_kernel!("neon", 4, demote_f32_bf16, f32 => bf16, |src, dst| {
    vst1_u16(dst.cast(), round_to_bf16(vld1q_f32(src)));
});

convert_kernel!("neon", 4, promote_bf16_f32, bf16 => f32, |src, dst| {
    let wide = vshll_n_u16::<16>(vld1_u16(src.cast()));
    vst1q_u32(dst.cast(), wide);
});

// =============================================================================
// Binding
// =============================================================================

/// Overwrites the conversion entries NEON implements.
pub(crate) fn bind(reg: &mut KernelRegistry) {
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
    c.demote_i64_i32.saturating = demote_sat_i64_i32;
    c.demote_i64_i32.truncating = demote_trunc_i64_i32;
    c.demote_u64_u32.saturating = demote_sat_u64_u32;
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
    c.i64_to_f64 = i64_to_f64;
    c.f64_to_i64 = f64_to_i64;

    c.demote_f32_bf16 = demote_f32_bf16;
    c.promote_bf16_f32 = promote_bf16_f32;
}
