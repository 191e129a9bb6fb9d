//! Kernel signatures and the per-type tables the registry binds.
//!
//! Every backend kernel follows one convention: raw input pointers, a raw
//! output pointer, and a lane count. Kernels written for a fixed register
//! width loop over `lanes` in steps of that width, so they accept any
//! multiple of it; scalar kernels accept any count. This is what lets one
//! operation fall back to a narrower kernel while its neighbours stay on the
//! bound backend.
//!
//! # Safety contract (all kernel types)
//!
//! - every input pointer is valid for reads of `lanes` elements,
//! - every output pointer is valid for writes of `lanes` elements (mask
//!   outputs: `lanes * size_of::<T>()` bytes),
//! - `lanes` is a multiple of the kernel's register step,
//! - the CPU supports the kernel's target features.
//!
//! Inputs and outputs may alias only when they are the same pointer.

use half::{bf16, f16};

/// `out[i] = op(a[i])`.
pub type UnaryFn<T> = unsafe fn(a: *const T, out: *mut T, lanes: usize);

/// `out[i] = op(a[i], b[i])`.
pub type BinaryFn<T> = unsafe fn(a: *const T, b: *const T, out: *mut T, lanes: usize);

/// `out[i] = op(a[i], b[i], c[i])`.
pub type TernaryFn<T> =
    unsafe fn(a: *const T, b: *const T, c: *const T, out: *mut T, lanes: usize);

/// Writes an all-ones or all-zeros lane of `size_of::<T>()` bytes per lane.
pub type CompareFn<T> = unsafe fn(a: *const T, b: *const T, mask: *mut u8, lanes: usize);

/// Horizontal fold of `lanes` elements.
pub type ReduceFn<T> = unsafe fn(a: *const T, lanes: usize) -> T;

/// Shift every lane by the same runtime amount.
pub type ShiftFn<T> = unsafe fn(a: *const T, out: *mut T, lanes: usize, amount: u32);

/// Lane conversion; `lanes` counts *source* lanes, which equals output lanes.
pub type ConvertFn<S, D> = unsafe fn(src: *const S, dst: *mut D, lanes: usize);

/// `out[i] = base[idx[i]]`; indices are validated by the caller.
pub type GatherFn<T, I> = unsafe fn(base: *const T, idx: *const I, out: *mut T, lanes: usize);

/// `base[idx[i]] = v[i]`; indices are validated by the caller.
pub type ScatterFn<T, I> = unsafe fn(v: *const T, idx: *const I, base: *mut T, lanes: usize);

/// Byte-granular binary operation over `len` bytes.
pub type ByteBinaryFn = unsafe fn(a: *const u8, b: *const u8, out: *mut u8, len: usize);

/// Byte-granular unary operation over `len` bytes.
pub type ByteUnaryFn = unsafe fn(a: *const u8, out: *mut u8, len: usize);

/// `out = (mask & a) | (!mask & b)` over `len` bytes.
pub type BlendFn =
    unsafe fn(mask: *const u8, a: *const u8, b: *const u8, out: *mut u8, len: usize);

/// Query over a normalized mask of `len` bytes, returning a byte count/index.
pub type MaskQueryFn = unsafe fn(mask: *const u8, len: usize) -> usize;

// =============================================================================
// Per-family tables
// =============================================================================

/// Operations every numeric lane type supports.
#[derive(Clone, Copy)]
pub struct ArithKernels<T> {
    /// Lanewise add (wrapping for integers).
    pub add: BinaryFn<T>,
    /// Lanewise subtract (wrapping for integers).
    pub sub: BinaryFn<T>,
    /// Lanewise multiply (wrapping for integers).
    pub mul: BinaryFn<T>,
    /// Lanewise minimum.
    pub min: BinaryFn<T>,
    /// Lanewise maximum.
    pub max: BinaryFn<T>,
    /// `a == b`.
    pub eq: CompareFn<T>,
    /// `a != b`.
    pub ne: CompareFn<T>,
    /// `a < b`.
    pub lt: CompareFn<T>,
    /// `a <= b`.
    pub le: CompareFn<T>,
    /// `a > b`.
    pub gt: CompareFn<T>,
    /// `a >= b`.
    pub ge: CompareFn<T>,
    /// Sum of all lanes.
    pub reduce_sum: ReduceFn<T>,
    /// Minimum of all lanes.
    pub reduce_min: ReduceFn<T>,
    /// Maximum of all lanes.
    pub reduce_max: ReduceFn<T>,
}

/// Sign operations for signed integers and floats.
#[derive(Clone, Copy)]
pub struct SignedKernels<T> {
    /// Lanewise negation (wrapping for integers).
    pub neg: UnaryFn<T>,
    /// Lanewise absolute value (wrapping for integers).
    pub abs: UnaryFn<T>,
}

/// Integer-only operations.
#[derive(Clone, Copy)]
pub struct IntKernels<T> {
    /// Logical left shift.
    pub shl: ShiftFn<T>,
    /// Arithmetic (signed) or logical (unsigned) right shift.
    pub shr: ShiftFn<T>,
}

/// Float-only operations.
#[derive(Clone, Copy)]
pub struct FloatKernels<T> {
    /// Lanewise division.
    pub div: BinaryFn<T>,
    /// Lanewise square root.
    pub sqrt: UnaryFn<T>,
    /// `a * b + c`.
    pub mul_add: TernaryFn<T>,
    /// `a * b - c`.
    pub mul_sub: TernaryFn<T>,
    /// `c - a * b`.
    pub neg_mul_add: TernaryFn<T>,
    /// Whether the three multiply-add kernels round once.
    pub fused: bool,
}

/// Lane-order operations, available for every lane type.
#[derive(Clone, Copy)]
pub struct ShuffleKernels<T> {
    /// Reverses lane order.
    pub reverse: UnaryFn<T>,
    /// `a0 b0 a1 b1 ...` from the lower halves.
    pub interleave_lower: BinaryFn<T>,
    /// `a(n/2) b(n/2) ...` from the upper halves.
    pub interleave_upper: BinaryFn<T>,
}

/// Indexed memory access for 32/64-bit lanes with same-width indices.
#[derive(Clone, Copy)]
pub struct GatherKernels<T, I> {
    /// Indexed load.
    pub gather: GatherFn<T, I>,
    /// Indexed store; later lanes win on duplicate indices.
    pub scatter: ScatterFn<T, I>,
}

/// Byte-level kernels shared by every lane type and by masks.
#[derive(Clone, Copy)]
pub struct ByteKernels {
    /// `a & b`.
    pub and: ByteBinaryFn,
    /// `a | b`.
    pub or: ByteBinaryFn,
    /// `a ^ b`.
    pub xor: ByteBinaryFn,
    /// `!a & b`.
    pub and_not: ByteBinaryFn,
    /// `!a`.
    pub not: ByteUnaryFn,
    /// Bitwise select.
    pub blend: BlendFn,
    /// Number of `0xFF` bytes in a normalized mask.
    pub count_set: MaskQueryFn,
    /// Index of the first `0xFF` byte, or `len` when none is set.
    pub first_set: MaskQueryFn,
}

/// Saturating and truncating narrowing for one integer pair.
#[derive(Clone, Copy)]
pub struct NarrowingKernels<W, N> {
    /// Out-of-range values clamp to the target's min/max.
    pub saturating: ConvertFn<W, N>,
    /// Keeps the low bits.
    pub truncating: ConvertFn<W, N>,
}

// =============================================================================
// Grouped tables
// =============================================================================

/// Arithmetic kernels for each numeric lane type.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct ArithSet {
    pub i8: ArithKernels<i8>,
    pub i16: ArithKernels<i16>,
    pub i32: ArithKernels<i32>,
    pub i64: ArithKernels<i64>,
    pub u8: ArithKernels<u8>,
    pub u16: ArithKernels<u16>,
    pub u32: ArithKernels<u32>,
    pub u64: ArithKernels<u64>,
    pub f32: ArithKernels<f32>,
    pub f64: ArithKernels<f64>,
}

/// Sign kernels for signed lane types.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct SignedSet {
    pub i8: SignedKernels<i8>,
    pub i16: SignedKernels<i16>,
    pub i32: SignedKernels<i32>,
    pub i64: SignedKernels<i64>,
    pub f32: SignedKernels<f32>,
    pub f64: SignedKernels<f64>,
}

/// Shift kernels for integer lane types.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct IntSet {
    pub i8: IntKernels<i8>,
    pub i16: IntKernels<i16>,
    pub i32: IntKernels<i32>,
    pub i64: IntKernels<i64>,
    pub u8: IntKernels<u8>,
    pub u16: IntKernels<u16>,
    pub u32: IntKernels<u32>,
    pub u64: IntKernels<u64>,
}

/// Float kernels.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct FloatSet {
    pub f32: FloatKernels<f32>,
    pub f64: FloatKernels<f64>,
}

/// Shuffle kernels for every lane type.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct ShuffleSet {
    pub i8: ShuffleKernels<i8>,
    pub i16: ShuffleKernels<i16>,
    pub i32: ShuffleKernels<i32>,
    pub i64: ShuffleKernels<i64>,
    pub u8: ShuffleKernels<u8>,
    pub u16: ShuffleKernels<u16>,
    pub u32: ShuffleKernels<u32>,
    pub u64: ShuffleKernels<u64>,
    pub f32: ShuffleKernels<f32>,
    pub f64: ShuffleKernels<f64>,
    pub f16: ShuffleKernels<f16>,
    pub bf16: ShuffleKernels<bf16>,
}

/// Gather/scatter kernels.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct GatherSet {
    pub i32: GatherKernels<i32, i32>,
    pub u32: GatherKernels<u32, i32>,
    pub f32: GatherKernels<f32, i32>,
    pub i64: GatherKernels<i64, i64>,
    pub u64: GatherKernels<u64, i64>,
    pub f64: GatherKernels<f64, i64>,
}

/// Every lane-width and representation change.
#[derive(Clone, Copy)]
#[allow(missing_docs)] // Fields are named after their lane type or conversion.
pub struct ConvertSet {
    pub demote_i16_i8: NarrowingKernels<i16, i8>,
    pub demote_i16_u8: NarrowingKernels<i16, u8>,
    pub demote_i32_i16: NarrowingKernels<i32, i16>,
    pub demote_i32_u16: NarrowingKernels<i32, u16>,
    pub demote_i64_i32: NarrowingKernels<i64, i32>,
    pub demote_u16_u8: NarrowingKernels<u16, u8>,
    pub demote_u32_u16: NarrowingKernels<u32, u16>,
    pub demote_u64_u32: NarrowingKernels<u64, u32>,
    pub demote_f64_f32: ConvertFn<f64, f32>,
    pub demote_f32_f16: ConvertFn<f32, f16>,
    pub demote_f32_bf16: ConvertFn<f32, bf16>,
    pub promote_i8_i16: ConvertFn<i8, i16>,
    pub promote_u8_u16: ConvertFn<u8, u16>,
    pub promote_i16_i32: ConvertFn<i16, i32>,
    pub promote_u16_u32: ConvertFn<u16, u32>,
    pub promote_i32_i64: ConvertFn<i32, i64>,
    pub promote_u32_u64: ConvertFn<u32, u64>,
    pub promote_f32_f64: ConvertFn<f32, f64>,
    pub promote_f16_f32: ConvertFn<f16, f32>,
    pub promote_bf16_f32: ConvertFn<bf16, f32>,
    pub i32_to_f32: ConvertFn<i32, f32>,
    pub f32_to_i32: ConvertFn<f32, i32>,
    pub i64_to_f64: ConvertFn<i64, f64>,
    pub f64_to_i64: ConvertFn<f64, i64>,
}
