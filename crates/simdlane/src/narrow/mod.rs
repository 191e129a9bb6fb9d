//! Float16 and BFloat16 vectors emulated on f32 lanes.
//!
//! Two storage strategies implement [`NarrowVector`]:
//!
//! - [`PromotedVec`] converts on load, computes in f32, and rounds to the
//!   16-bit format only on store and in reductions.
//! - [`PackedVec`] keeps 16-bit patterns and rounds after every operation,
//!   matching what a native 16-bit instruction would produce.
//!
//! [`Float16Vec`] and [`BFloat16Vec`] name one of them per build: promoted by
//! default, packed with the `packed-narrow` feature. Both hold
//! `SimdVec::<f32>::lanes()` logical lanes, and both only need f32 kernels,
//! which every backend provides.
//!
//! ```
//! use half::f16;
//! use simdlane::narrow::{Float16Vec, NarrowVector};
//!
//! let a = Float16Vec::broadcast(f16::from_f32(1.0));
//! let b = Float16Vec::broadcast(f16::from_f32(2.0));
//! let mut out = vec![f16::ZERO; Float16Vec::lanes()];
//! (a + b).store(&mut out).unwrap();
//! assert_eq!(out[0].to_bits(), 0x4200);
//! ```

pub mod bits;
pub mod dot;
mod storage;

#[cfg(test)]
mod storage_tests;

use half::{bf16, f16};

pub use storage::{PackedVec, PromotedVec};

use crate::error::{ensure_same_len, Result};
use crate::lane::{DemoteFloat, Lane, Promote};
use crate::simd_native::kernels::ConvertFn;
use crate::simd_native::{detect_and_bind, KernelRegistry};
use crate::vector::{Mask, SimdVec};

/// The 16-bit float formats: IEEE binary16 and bfloat16.
pub trait NarrowFloat: Lane + Promote<f32> {
    /// Rounds `value` to nearest, ties to even.
    fn from_f32_rne(value: f32) -> Self;

    /// Exact widening.
    fn to_f32_exact(self) -> f32;

    /// Kernel rounding f32 lanes to this format.
    fn demote_kernel(reg: &KernelRegistry) -> ConvertFn<f32, Self>;
}

impl NarrowFloat for f16 {
    #[inline]
    fn from_f32_rne(value: f32) -> Self {
        Self::from_bits(bits::f32_to_f16_bits(value))
    }

    #[inline]
    fn to_f32_exact(self) -> f32 {
        bits::f16_bits_to_f32(self.to_bits())
    }

    #[inline]
    fn demote_kernel(reg: &KernelRegistry) -> ConvertFn<f32, Self> {
        <f32 as DemoteFloat<f16>>::demote(reg)
    }
}

impl NarrowFloat for bf16 {
    #[inline]
    fn from_f32_rne(value: f32) -> Self {
        Self::from_bits(bits::f32_to_bf16_bits(value))
    }

    #[inline]
    fn to_f32_exact(self) -> f32 {
        bits::bf16_bits_to_f32(self.to_bits())
    }

    #[inline]
    fn demote_kernel(reg: &KernelRegistry) -> ConvertFn<f32, Self> {
        <f32 as DemoteFloat<bf16>>::demote(reg)
    }
}

/// Vector of `SimdVec::<f32>::lanes()` 16-bit float lanes.
///
/// Arithmetic operators (`+ - * /`, unary `-`) are provided by the
/// implementing types.
pub trait NarrowVector<N: NarrowFloat>: Copy + Sized {
    /// Logical lane count; equals `SimdVec::<f32>::lanes()`.
    #[must_use]
    fn lanes() -> usize {
        SimdVec::<f32>::lanes()
    }

    /// All lanes `+0.0`.
    fn zero() -> Self;

    /// Every lane set to `value`.
    fn broadcast(value: N) -> Self;

    /// Loads the first `lanes()` elements of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::InsufficientLength`](crate::SimdError::InsufficientLength)
    /// if `src` is shorter than one vector.
    fn load(src: &[N]) -> Result<Self>;

    /// Rounds every lane to `N` and stores it to the front of `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::InsufficientLength`](crate::SimdError::InsufficientLength)
    /// if `dst` is shorter than one vector.
    fn store(&self, dst: &mut [N]) -> Result<()>;

    /// Rounds each f32 lane to `N`.
    fn from_f32(v: SimdVec<f32>) -> Self;

    /// The lanes as f32. Exact for values already rounded to `N`.
    fn to_f32(self) -> SimdVec<f32>;

    /// Lanewise minimum; a NaN operand yields the other operand.
    #[must_use]
    fn min(self, rhs: Self) -> Self;

    /// Lanewise maximum; a NaN operand yields the other operand.
    #[must_use]
    fn max(self, rhs: Self) -> Self;

    /// Lanewise square root.
    #[must_use]
    fn sqrt(self) -> Self;

    /// Lanewise absolute value.
    #[must_use]
    fn abs(self) -> Self;

    /// `self * b + c`.
    #[must_use]
    fn mul_add(self, b: Self, c: Self) -> Self;

    /// `self * b - c`.
    #[must_use]
    fn mul_sub(self, b: Self, c: Self) -> Self;

    /// `self == rhs`, evaluated on the f32 values.
    fn simd_eq(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_eq(rhs.to_f32())
    }

    /// `self != rhs`.
    fn simd_ne(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_ne(rhs.to_f32())
    }

    /// `self < rhs`.
    fn simd_lt(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_lt(rhs.to_f32())
    }

    /// `self <= rhs`.
    fn simd_le(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_le(rhs.to_f32())
    }

    /// `self > rhs`.
    fn simd_gt(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_gt(rhs.to_f32())
    }

    /// `self >= rhs`.
    fn simd_ge(self, rhs: Self) -> Mask<f32> {
        self.to_f32().simd_ge(rhs.to_f32())
    }

    /// `a` where `mask` is true, `b` elsewhere.
    fn merge(a: Self, b: Self, mask: Mask<f32>) -> Self;

    /// Sum of all lanes, accumulated in f32 and rounded once.
    fn reduce_sum(self) -> N {
        N::from_f32_rne(self.to_f32().reduce_sum())
    }

    /// Smallest lane.
    fn reduce_min(self) -> N {
        N::from_f32_rne(self.to_f32().reduce_min())
    }

    /// Largest lane.
    fn reduce_max(self) -> N {
        N::from_f32_rne(self.to_f32().reduce_max())
    }
}

/// IEEE binary16 vector for this build.
#[cfg(not(feature = "packed-narrow"))]
pub type Float16Vec = PromotedVec<f16>;

/// bfloat16 vector for this build.
#[cfg(not(feature = "packed-narrow"))]
pub type BFloat16Vec = PromotedVec<bf16>;

/// IEEE binary16 vector for this build.
#[cfg(feature = "packed-narrow")]
pub type Float16Vec = PackedVec<f16>;

/// bfloat16 vector for this build.
#[cfg(feature = "packed-narrow")]
pub type BFloat16Vec = PackedVec<bf16>;

// =============================================================================
// Slice conversions
// =============================================================================

/// Widens `src` into `dst` (f16/bf16 tensor buffer to f32).
///
/// # Errors
///
/// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
/// if the slices differ in length.
pub fn promote_slice<N: NarrowFloat>(src: &[N], dst: &mut [f32]) -> Result<()> {
    ensure_same_len(src.len(), dst.len())?;
    let reg = detect_and_bind();
    let step = reg.lanes::<f32>();
    let full = src.len() - src.len() % step;
    if full > 0 {
        // SAFETY: both slices hold `full` elements, a multiple of the step.
        unsafe { (N::promote(reg))(src.as_ptr(), dst.as_mut_ptr(), full) };
    }
    for (d, s) in dst[full..].iter_mut().zip(&src[full..]) {
        *d = s.to_f32_exact();
    }
    Ok(())
}

/// Rounds `src` into `dst` (f32 to f16/bf16 tensor buffer).
///
/// # Errors
///
/// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
/// if the slices differ in length.
pub fn demote_slice<N: NarrowFloat>(src: &[f32], dst: &mut [N]) -> Result<()> {
    ensure_same_len(src.len(), dst.len())?;
    let reg = detect_and_bind();
    let step = reg.lanes::<f32>();
    let full = src.len() - src.len() % step;
    if full > 0 {
        // SAFETY: both slices hold `full` elements, a multiple of the step.
        unsafe { (N::demote_kernel(reg))(src.as_ptr(), dst.as_mut_ptr(), full) };
    }
    for (d, s) in dst[full..].iter_mut().zip(&src[full..]) {
        *d = N::from_f32_rne(*s);
    }
    Ok(())
}
