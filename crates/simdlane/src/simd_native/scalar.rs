//! Portable scalar kernels.
//!
//! Every `{operation, element type}` pair has a scalar kernel here, and every
//! registry starts from these tables. The scalar level emulates a 128-bit
//! register, but the kernels themselves accept any lane count.
//!
//! `mul_add` and friends round twice (`mul`, then `add`), unlike the fused
//! hardware kernels; `FloatKernels::fused` is `false` for this table.

// SAFETY: Numeric casts in this file are intentional:
// - narrowing casts implement the documented truncating conversions,
// - float <-> int casts use Rust's saturating `as` semantics, which define
//   the conversion results (truncate toward zero, saturate, NaN -> 0).
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use std::mem::size_of;
use std::ptr;

use half::{bf16, f16};

use super::kernels::{
    ArithKernels, ArithSet, ByteKernels, ConvertFn, ConvertSet, FloatKernels, FloatSet,
    GatherKernels, GatherSet, IntKernels, IntSet, NarrowingKernels, ShuffleKernels, ShuffleSet,
    SignedKernels, SignedSet,
};
use crate::narrow::bits;

/// Largest lane count of any register (64 one-byte lanes).
pub(crate) const MAX_LANES: usize = 64;

// =============================================================================
// Per-type scalar semantics
// =============================================================================

/// Lanewise semantics shared by the scalar kernels.
pub(crate) trait ScalarLane: Copy + PartialOrd + Default {
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    /// For floats: a NaN operand yields the other operand.
    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;
}

pub(crate) trait ScalarSigned: ScalarLane {
    fn neg(self) -> Self;
    fn abs(self) -> Self;
}

pub(crate) trait ScalarInt: ScalarLane {
    /// `amount >= BITS` yields zero.
    fn shl(self, amount: u32) -> Self;
    /// Arithmetic for signed types (sign fill), logical for unsigned.
    fn shr(self, amount: u32) -> Self;
}

pub(crate) trait ScalarFloat: ScalarSigned {
    fn div(self, rhs: Self) -> Self;
    fn sqrt(self) -> Self;
}

macro_rules! scalar_int {
    ($($t:ty),*) => {
        $(
            impl ScalarLane for $t {
                #[inline] fn add(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
                #[inline] fn sub(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
                #[inline] fn mul(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
                #[inline] fn min(self, rhs: Self) -> Self { Ord::min(self, rhs) }
                #[inline] fn max(self, rhs: Self) -> Self { Ord::max(self, rhs) }
            }
        )*
    };
}

macro_rules! scalar_signed_int {
    ($($t:ty),*) => {
        $(
            impl ScalarSigned for $t {
                #[inline] fn neg(self) -> Self { self.wrapping_neg() }
                #[inline] fn abs(self) -> Self { self.wrapping_abs() }
            }

            impl ScalarInt for $t {
                #[inline]
                fn shl(self, amount: u32) -> Self {
                    self.checked_shl(amount).unwrap_or(0)
                }

                #[inline]
                fn shr(self, amount: u32) -> Self {
                    self >> Ord::min(amount, <$t>::BITS - 1)
                }
            }
        )*
    };
}

macro_rules! scalar_unsigned_int {
    ($($t:ty),*) => {
        $(
            impl ScalarInt for $t {
                #[inline]
                fn shl(self, amount: u32) -> Self {
                    self.checked_shl(amount).unwrap_or(0)
                }

                #[inline]
                fn shr(self, amount: u32) -> Self {
                    self.checked_shr(amount).unwrap_or(0)
                }
            }
        )*
    };
}

macro_rules! scalar_float {
    ($($t:ty),*) => {
        $(
            impl ScalarLane for $t {
                #[inline] fn add(self, rhs: Self) -> Self { self + rhs }
                #[inline] fn sub(self, rhs: Self) -> Self { self - rhs }
                #[inline] fn mul(self, rhs: Self) -> Self { self * rhs }
                #[inline] fn min(self, rhs: Self) -> Self { <$t>::min(self, rhs) }
                #[inline] fn max(self, rhs: Self) -> Self { <$t>::max(self, rhs) }
            }

            impl ScalarSigned for $t {
                #[inline] fn neg(self) -> Self { -self }
                #[inline] fn abs(self) -> Self { <$t>::abs(self) }
            }

            impl ScalarFloat for $t {
                #[inline] fn div(self, rhs: Self) -> Self { self / rhs }
                #[inline] fn sqrt(self) -> Self { <$t>::sqrt(self) }
            }
        )*
    };
}

scalar_int!(i8, i16, i32, i64, u8, u16, u32, u64);
scalar_signed_int!(i8, i16, i32, i64);
scalar_unsigned_int!(u8, u16, u32, u64);
scalar_float!(f32, f64);

// =============================================================================
// Generic kernels
// =============================================================================

macro_rules! binary_kernel {
    ($name:ident, $method:ident, $bound:path) => {
        pub(crate) unsafe fn $name<T: $bound>(a: *const T, b: *const T, out: *mut T, lanes: usize) {
            for i in 0..lanes {
                *out.add(i) = (*a.add(i)).$method(*b.add(i));
            }
        }
    };
}

binary_kernel!(add, add, ScalarLane);
binary_kernel!(sub, sub, ScalarLane);
binary_kernel!(mul, mul, ScalarLane);
binary_kernel!(min, min, ScalarLane);
binary_kernel!(max, max, ScalarLane);
binary_kernel!(div, div, ScalarFloat);

#[inline]
unsafe fn write_mask_lane(mask: *mut u8, lane: usize, width: usize, set: bool) {
    ptr::write_bytes(mask.add(lane * width), if set { 0xFF } else { 0x00 }, width);
}

macro_rules! compare_kernel {
    ($name:ident, |$x:ident, $y:ident| $pred:expr) => {
        pub(crate) unsafe fn $name<T: ScalarLane>(
            a: *const T,
            b: *const T,
            mask: *mut u8,
            lanes: usize,
        ) {
            for i in 0..lanes {
                let ($x, $y) = (*a.add(i), *b.add(i));
                write_mask_lane(mask, i, size_of::<T>(), $pred);
            }
        }
    };
}

compare_kernel!(eq, |x, y| x == y);
compare_kernel!(ne, |x, y| x != y);
compare_kernel!(lt, |x, y| x < y);
compare_kernel!(le, |x, y| x <= y);
compare_kernel!(gt, |x, y| x > y);
compare_kernel!(ge, |x, y| x >= y);

pub(crate) unsafe fn reduce_sum<T: ScalarLane>(a: *const T, lanes: usize) -> T {
    if lanes == 0 {
        return T::default();
    }
    // Seeded from lane 0 so an all `-0.0` register sums to `-0.0`.
    let mut acc = *a;
    for i in 1..lanes {
        acc = acc.add(*a.add(i));
    }
    acc
}

pub(crate) unsafe fn reduce_min<T: ScalarLane>(a: *const T, lanes: usize) -> T {
    debug_assert!(lanes > 0);
    let mut acc = *a;
    for i in 1..lanes {
        acc = acc.min(*a.add(i));
    }
    acc
}

pub(crate) unsafe fn reduce_max<T: ScalarLane>(a: *const T, lanes: usize) -> T {
    debug_assert!(lanes > 0);
    let mut acc = *a;
    for i in 1..lanes {
        acc = acc.max(*a.add(i));
    }
    acc
}

pub(crate) unsafe fn neg<T: ScalarSigned>(a: *const T, out: *mut T, lanes: usize) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).neg();
    }
}

pub(crate) unsafe fn abs<T: ScalarSigned>(a: *const T, out: *mut T, lanes: usize) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).abs();
    }
}

pub(crate) unsafe fn shl<T: ScalarInt>(a: *const T, out: *mut T, lanes: usize, amount: u32) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).shl(amount);
    }
}

pub(crate) unsafe fn shr<T: ScalarInt>(a: *const T, out: *mut T, lanes: usize, amount: u32) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).shr(amount);
    }
}

pub(crate) unsafe fn sqrt<T: ScalarFloat>(a: *const T, out: *mut T, lanes: usize) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).sqrt();
    }
}

pub(crate) unsafe fn mul_add<T: ScalarFloat>(
    a: *const T,
    b: *const T,
    c: *const T,
    out: *mut T,
    lanes: usize,
) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).mul(*b.add(i)).add(*c.add(i));
    }
}

pub(crate) unsafe fn mul_sub<T: ScalarFloat>(
    a: *const T,
    b: *const T,
    c: *const T,
    out: *mut T,
    lanes: usize,
) {
    for i in 0..lanes {
        *out.add(i) = (*a.add(i)).mul(*b.add(i)).sub(*c.add(i));
    }
}

pub(crate) unsafe fn neg_mul_add<T: ScalarFloat>(
    a: *const T,
    b: *const T,
    c: *const T,
    out: *mut T,
    lanes: usize,
) {
    for i in 0..lanes {
        *out.add(i) = (*c.add(i)).sub((*a.add(i)).mul(*b.add(i)));
    }
}

// =============================================================================
// Shuffles (any Copy lane, including f16/bf16)
// =============================================================================

pub(crate) unsafe fn reverse<T: Copy>(a: *const T, out: *mut T, lanes: usize) {
    if !ptr::eq(a, out) {
        ptr::copy_nonoverlapping(a, out, lanes);
    }
    std::slice::from_raw_parts_mut(out, lanes).reverse();
}

pub(crate) unsafe fn interleave_lower<T: Copy + Default>(
    a: *const T,
    b: *const T,
    out: *mut T,
    lanes: usize,
) {
    interleave_from(a, b, out, lanes, 0);
}

pub(crate) unsafe fn interleave_upper<T: Copy + Default>(
    a: *const T,
    b: *const T,
    out: *mut T,
    lanes: usize,
) {
    interleave_from(a, b, out, lanes, lanes / 2);
}

unsafe fn interleave_from<T: Copy + Default>(
    a: *const T,
    b: *const T,
    out: *mut T,
    lanes: usize,
    start: usize,
) {
    debug_assert!(lanes <= MAX_LANES);
    // Inputs may alias `out`; read both halves before writing.
    let mut tmp = [T::default(); MAX_LANES];
    for i in 0..lanes / 2 {
        tmp[2 * i] = *a.add(start + i);
        tmp[2 * i + 1] = *b.add(start + i);
    }
    ptr::copy_nonoverlapping(tmp.as_ptr(), out, lanes);
}

// =============================================================================
// Gather / scatter
// =============================================================================

pub(crate) unsafe fn gather<T: Copy, I: Copy + Into<i64>>(
    base: *const T,
    idx: *const I,
    out: *mut T,
    lanes: usize,
) {
    for i in 0..lanes {
        let offset: i64 = (*idx.add(i)).into();
        *out.add(i) = *base.offset(offset as isize);
    }
}

pub(crate) unsafe fn scatter<T: Copy, I: Copy + Into<i64>>(
    v: *const T,
    idx: *const I,
    base: *mut T,
    lanes: usize,
) {
    for i in 0..lanes {
        let offset: i64 = (*idx.add(i)).into();
        *base.offset(offset as isize) = *v.add(i);
    }
}

// =============================================================================
// Byte kernels
// =============================================================================

pub(crate) unsafe fn and_bytes(a: *const u8, b: *const u8, out: *mut u8, len: usize) {
    for i in 0..len {
        *out.add(i) = *a.add(i) & *b.add(i);
    }
}

pub(crate) unsafe fn or_bytes(a: *const u8, b: *const u8, out: *mut u8, len: usize) {
    for i in 0..len {
        *out.add(i) = *a.add(i) | *b.add(i);
    }
}

pub(crate) unsafe fn xor_bytes(a: *const u8, b: *const u8, out: *mut u8, len: usize) {
    for i in 0..len {
        *out.add(i) = *a.add(i) ^ *b.add(i);
    }
}

pub(crate) unsafe fn and_not_bytes(a: *const u8, b: *const u8, out: *mut u8, len: usize) {
    for i in 0..len {
        *out.add(i) = !*a.add(i) & *b.add(i);
    }
}

pub(crate) unsafe fn not_bytes(a: *const u8, out: *mut u8, len: usize) {
    for i in 0..len {
        *out.add(i) = !*a.add(i);
    }
}

pub(crate) unsafe fn blend_bytes(
    mask: *const u8,
    a: *const u8,
    b: *const u8,
    out: *mut u8,
    len: usize,
) {
    for i in 0..len {
        let m = *mask.add(i);
        *out.add(i) = (m & *a.add(i)) | (!m & *b.add(i));
    }
}

pub(crate) unsafe fn count_set_bytes(mask: *const u8, len: usize) -> usize {
    (0..len).filter(|&i| *mask.add(i) == 0xFF).count()
}

pub(crate) unsafe fn first_set_byte(mask: *const u8, len: usize) -> usize {
    (0..len).find(|&i| *mask.add(i) == 0xFF).unwrap_or(len)
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! narrowing_pair {
    ($sat:ident, $trunc:ident, $w:ty => $n:ty) => {
        pub(crate) unsafe fn $sat(src: *const $w, dst: *mut $n, lanes: usize) {
            for i in 0..lanes {
                let v = *src.add(i);
                *dst.add(i) = v.clamp(<$n>::MIN as $w, <$n>::MAX as $w) as $n;
            }
        }

        pub(crate) unsafe fn $trunc(src: *const $w, dst: *mut $n, lanes: usize) {
            for i in 0..lanes {
                *dst.add(i) = *src.add(i) as $n;
            }
        }
    };
}

narrowing_pair!(demote_sat_i16_i8, demote_trunc_i16_i8, i16 => i8);
narrowing_pair!(demote_sat_i16_u8, demote_trunc_i16_u8, i16 => u8);
narrowing_pair!(demote_sat_i32_i16, demote_trunc_i32_i16, i32 => i16);
narrowing_pair!(demote_sat_i32_u16, demote_trunc_i32_u16, i32 => u16);
narrowing_pair!(demote_sat_i64_i32, demote_trunc_i64_i32, i64 => i32);
narrowing_pair!(demote_sat_u16_u8, demote_trunc_u16_u8, u16 => u8);
narrowing_pair!(demote_sat_u32_u16, demote_trunc_u32_u16, u32 => u16);
narrowing_pair!(demote_sat_u64_u32, demote_trunc_u64_u32, u64 => u32);

macro_rules! cast_kernel {
    ($name:ident, $s:ty => $d:ty) => {
        pub(crate) unsafe fn $name(src: *const $s, dst: *mut $d, lanes: usize) {
            for i in 0..lanes {
                *dst.add(i) = *src.add(i) as $d;
            }
        }
    };
}

cast_kernel!(demote_f64_f32, f64 => f32);
cast_kernel!(i32_to_f32, i32 => f32);
cast_kernel!(f32_to_i32, f32 => i32);
cast_kernel!(i64_to_f64, i64 => f64);
cast_kernel!(f64_to_i64, f64 => i64);

pub(crate) unsafe fn promote<S: Copy + Into<D>, D>(src: *const S, dst: *mut D, lanes: usize) {
    for i in 0..lanes {
        *dst.add(i) = (*src.add(i)).into();
    }
}

pub(crate) unsafe fn demote_f32_f16(src: *const f32, dst: *mut f16, lanes: usize) {
    for i in 0..lanes {
        *dst.add(i) = f16::from_bits(bits::f32_to_f16_bits(*src.add(i)));
    }
}

pub(crate) unsafe fn demote_f32_bf16(src: *const f32, dst: *mut bf16, lanes: usize) {
    for i in 0..lanes {
        *dst.add(i) = bf16::from_bits(bits::f32_to_bf16_bits(*src.add(i)));
    }
}

pub(crate) unsafe fn promote_f16_f32(src: *const f16, dst: *mut f32, lanes: usize) {
    for i in 0..lanes {
        *dst.add(i) = bits::f16_bits_to_f32((*src.add(i)).to_bits());
    }
}

pub(crate) unsafe fn promote_bf16_f32(src: *const bf16, dst: *mut f32, lanes: usize) {
    for i in 0..lanes {
        *dst.add(i) = bits::bf16_bits_to_f32((*src.add(i)).to_bits());
    }
}

// =============================================================================
// Tables
// =============================================================================

fn arith<T: ScalarLane>() -> ArithKernels<T> {
    ArithKernels {
        add: add::<T>,
        sub: sub::<T>,
        mul: mul::<T>,
        min: min::<T>,
        max: max::<T>,
        eq: eq::<T>,
        ne: ne::<T>,
        lt: lt::<T>,
        le: le::<T>,
        gt: gt::<T>,
        ge: ge::<T>,
        reduce_sum: reduce_sum::<T>,
        reduce_min: reduce_min::<T>,
        reduce_max: reduce_max::<T>,
    }
}

fn signed<T: ScalarSigned>() -> SignedKernels<T> {
    SignedKernels {
        neg: neg::<T>,
        abs: abs::<T>,
    }
}

fn int<T: ScalarInt>() -> IntKernels<T> {
    IntKernels {
        shl: shl::<T>,
        shr: shr::<T>,
    }
}

fn float<T: ScalarFloat>() -> FloatKernels<T> {
    FloatKernels {
        div: div::<T>,
        sqrt: sqrt::<T>,
        mul_add: mul_add::<T>,
        mul_sub: mul_sub::<T>,
        neg_mul_add: neg_mul_add::<T>,
        fused: false,
    }
}

fn shuffle<T: Copy + Default>() -> ShuffleKernels<T> {
    ShuffleKernels {
        reverse: reverse::<T>,
        interleave_lower: interleave_lower::<T>,
        interleave_upper: interleave_upper::<T>,
    }
}

fn gather_kernels<T: Copy, I: Copy + Into<i64>>() -> GatherKernels<T, I> {
    GatherKernels {
        gather: gather::<T, I>,
        scatter: scatter::<T, I>,
    }
}

const fn narrowing<W, N>(saturating: ConvertFn<W, N>, truncating: ConvertFn<W, N>) -> NarrowingKernels<W, N> {
    NarrowingKernels {
        saturating,
        truncating,
    }
}

pub(crate) fn arith_set() -> ArithSet {
    ArithSet {
        i8: arith(),
        i16: arith(),
        i32: arith(),
        i64: arith(),
        u8: arith(),
        u16: arith(),
        u32: arith(),
        u64: arith(),
        f32: arith(),
        f64: arith(),
    }
}

pub(crate) fn signed_set() -> SignedSet {
    SignedSet {
        i8: signed(),
        i16: signed(),
        i32: signed(),
        i64: signed(),
        f32: signed(),
        f64: signed(),
    }
}

pub(crate) fn int_set() -> IntSet {
    IntSet {
        i8: int(),
        i16: int(),
        i32: int(),
        i64: int(),
        u8: int(),
        u16: int(),
        u32: int(),
        u64: int(),
    }
}

pub(crate) fn float_set() -> FloatSet {
    FloatSet {
        f32: float(),
        f64: float(),
    }
}

pub(crate) fn shuffle_set() -> ShuffleSet {
    ShuffleSet {
        i8: shuffle(),
        i16: shuffle(),
        i32: shuffle(),
        i64: shuffle(),
        u8: shuffle(),
        u16: shuffle(),
        u32: shuffle(),
        u64: shuffle(),
        f32: shuffle(),
        f64: shuffle(),
        f16: shuffle(),
        bf16: shuffle(),
    }
}

pub(crate) fn gather_set() -> GatherSet {
    GatherSet {
        i32: gather_kernels(),
        u32: gather_kernels(),
        f32: gather_kernels(),
        i64: gather_kernels(),
        u64: gather_kernels(),
        f64: gather_kernels(),
    }
}

pub(crate) fn convert_set() -> ConvertSet {
    ConvertSet {
        demote_i16_i8: narrowing(demote_sat_i16_i8, demote_trunc_i16_i8),
        demote_i16_u8: narrowing(demote_sat_i16_u8, demote_trunc_i16_u8),
        demote_i32_i16: narrowing(demote_sat_i32_i16, demote_trunc_i32_i16),
        demote_i32_u16: narrowing(demote_sat_i32_u16, demote_trunc_i32_u16),
        demote_i64_i32: narrowing(demote_sat_i64_i32, demote_trunc_i64_i32),
        demote_u16_u8: narrowing(demote_sat_u16_u8, demote_trunc_u16_u8),
        demote_u32_u16: narrowing(demote_sat_u32_u16, demote_trunc_u32_u16),
        demote_u64_u32: narrowing(demote_sat_u64_u32, demote_trunc_u64_u32),
        demote_f64_f32,
        demote_f32_f16,
        demote_f32_bf16,
        promote_i8_i16: promote::<i8, i16>,
        promote_u8_u16: promote::<u8, u16>,
        promote_i16_i32: promote::<i16, i32>,
        promote_u16_u32: promote::<u16, u32>,
        promote_i32_i64: promote::<i32, i64>,
        promote_u32_u64: promote::<u32, u64>,
        promote_f32_f64: promote::<f32, f64>,
        promote_f16_f32,
        promote_bf16_f32,
        i32_to_f32,
        f32_to_i32,
        i64_to_f64,
        f64_to_i64,
    }
}

pub(crate) fn byte_kernels() -> ByteKernels {
    ByteKernels {
        and: and_bytes,
        or: or_bytes,
        xor: xor_bytes,
        and_not: and_not_bytes,
        not: not_bytes,
        blend: blend_bytes,
        count_set: count_set_bytes,
        first_set: first_set_byte,
    }
}
