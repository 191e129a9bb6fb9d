//! Generic vector façade over the bound kernel registry.
//!
//! [`SimdVec<T>`] is a `Copy` value holding one register's worth of lanes.
//! Its lane count is fixed by the dispatch level bound at first use:
//!
//! | level | bytes | `f32` lanes |
//! |---|---|---|
//! | Scalar | 16 | 4 |
//! | NEON | 16 | 4 |
//! | AVX2 | 32 | 8 |
//! | AVX-512 | 64 | 16 |
//!
//! Every operation looks up its kernel in the process-wide registry and runs
//! it on the register block, so generic code is written once per algorithm
//! and runs on whatever the host provides.
//!
//! # Example
//!
//! ```
//! use simdlane::SimdVec;
//!
//! let n = SimdVec::<f32>::lanes();
//! let a = SimdVec::<f32>::iota();
//! let b = SimdVec::broadcast(2.0f32);
//! let c = a * b + SimdVec::broadcast(1.0);
//! assert_eq!(c.lane(n - 1), 2.0 * (n - 1) as f32 + 1.0);
//! ```

mod convert;
mod mask;
mod ops;
mod shuffle;

#[cfg(test)]
mod convert_tests;
#[cfg(test)]
mod mask_tests;
#[cfg(test)]
mod ops_tests;
#[cfg(test)]
mod vector_tests;

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

pub use mask::Mask;

use crate::error::{ensure_len, Result};
use crate::lane::{Lane, Numeric};
use crate::simd_native::kernels::{BinaryFn, ByteBinaryFn, TernaryFn, UnaryFn};
use crate::simd_native::{detect_and_bind, KernelRegistry};

/// Widest register any backend uses (AVX-512).
pub const MAX_VECTOR_BYTES: usize = 64;

/// Raw register storage, aligned for the widest backend.
///
/// Only the first `vector_bytes()` bytes are meaningful; the rest stay zero.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub(crate) struct RegisterBlock([u8; MAX_VECTOR_BYTES]);

impl RegisterBlock {
    pub(crate) const ZERO: Self = Self([0; MAX_VECTOR_BYTES]);

    #[inline]
    pub(crate) fn as_ptr<T>(&self) -> *const T {
        self.0.as_ptr().cast()
    }

    #[inline]
    pub(crate) fn as_mut_ptr<T>(&mut self) -> *mut T {
        self.0.as_mut_ptr().cast()
    }

    #[inline]
    pub(crate) fn bytes(&self, len: usize) -> &[u8] {
        &self.0[..len]
    }
}

#[inline]
pub(crate) fn registry() -> &'static KernelRegistry {
    detect_and_bind()
}

/// One register of `T` lanes.
#[derive(Clone, Copy)]
pub struct SimdVec<T: Lane> {
    block: RegisterBlock,
    _lane: PhantomData<T>,
}

impl<T: Lane> SimdVec<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Number of lanes, fixed for the process once the registry is bound.
    #[inline]
    #[must_use]
    pub fn lanes() -> usize {
        registry().lanes::<T>()
    }

    /// All lanes zero (all bits clear).
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::from_block(RegisterBlock::ZERO)
    }

    /// Every lane set to `value`.
    #[must_use]
    pub fn broadcast(value: T) -> Self {
        let mut v = Self::zero();
        v.lanes_mut().fill(value);
        v
    }

    /// Lane `i` set to `f(i)`.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        let mut v = Self::zero();
        for (i, lane) in v.lanes_mut().iter_mut().enumerate() {
            *lane = f(i);
        }
        v
    }

    /// Loads the first `lanes()` elements of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::InsufficientLength`](crate::SimdError::InsufficientLength)
    /// if `src` is shorter than one vector.
    pub fn load(src: &[T]) -> Result<Self> {
        let n = Self::lanes();
        ensure_len(n, src.len())?;
        let mut v = Self::zero();
        v.lanes_mut().copy_from_slice(&src[..n]);
        Ok(v)
    }

    /// Loads `lanes()` elements from `src` without alignment requirements.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads of `lanes()` elements of `T`.
    #[must_use]
    pub unsafe fn load_unaligned(src: *const T) -> Self {
        let n = Self::lanes();
        let mut v = Self::zero();
        // SAFETY: caller guarantees `n` readable elements; the block holds
        // at least `n` lanes and cannot overlap caller memory.
        std::ptr::copy_nonoverlapping(src.cast::<u8>(), v.block.as_mut_ptr(), n * size_of::<T>());
        v
    }

    /// Loads up to `lanes()` elements, zeroing the lanes `src` does not cover.
    pub(crate) fn load_prefix(src: &[T]) -> Self {
        let mut v = Self::zero();
        let n = src.len().min(Self::lanes());
        v.lanes_mut()[..n].copy_from_slice(&src[..n]);
        v
    }

    /// Stores every lane to the front of `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::InsufficientLength`](crate::SimdError::InsufficientLength)
    /// if `dst` is shorter than one vector.
    pub fn store(&self, dst: &mut [T]) -> Result<()> {
        let n = Self::lanes();
        ensure_len(n, dst.len())?;
        dst[..n].copy_from_slice(self.as_slice());
        Ok(())
    }

    /// Stores `lanes()` elements to `dst` without alignment requirements.
    ///
    /// # Safety
    ///
    /// `dst` must be valid for writes of `lanes()` elements of `T`.
    pub unsafe fn store_unaligned(&self, dst: *mut T) {
        let n = Self::lanes();
        // SAFETY: caller guarantees `n` writable elements.
        std::ptr::copy_nonoverlapping(self.block.as_ptr::<u8>(), dst.cast::<u8>(), n * size_of::<T>());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The active lanes.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        let bytes = self.block.bytes(registry().vector_bytes());
        bytemuck::cast_slice(bytes)
    }

    /// Lane `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= lanes()`.
    #[inline]
    #[must_use]
    pub fn lane(&self, i: usize) -> T {
        self.as_slice()[i]
    }

    /// Copies the lanes into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Reinterprets the register bytes as lanes of `U`.
    ///
    /// Lane count changes with the width ratio; no value is converted.
    #[inline]
    #[must_use]
    pub fn bit_cast<U: Lane>(self) -> SimdVec<U> {
        SimdVec::from_block(self.block)
    }

    #[inline]
    fn lanes_mut(&mut self) -> &mut [T] {
        let len = registry().vector_bytes();
        bytemuck::cast_slice_mut(&mut self.block.0[..len])
    }

    // =========================================================================
    // Bitwise
    // =========================================================================

    /// `!self & other`, lanewise on the raw bits.
    #[inline]
    #[must_use]
    pub fn and_not(self, other: Self) -> Self {
        self.bytewise(other, registry().bytes.and_not)
    }

    /// `a` where `mask` is true, `b` where it is false.
    #[must_use]
    pub fn merge(a: Self, b: Self, mask: Mask<T>) -> Self {
        let reg = registry();
        let mut out = Self::zero();
        // SAFETY: all three blocks hold `vector_bytes()` initialized bytes;
        // `blend` is bound for this CPU.
        unsafe {
            (reg.bytes.blend)(
                mask.block().as_ptr(),
                a.block.as_ptr(),
                b.block.as_ptr(),
                out.block.as_mut_ptr(),
                reg.vector_bytes(),
            );
        }
        out
    }

    // =========================================================================
    // Kernel plumbing
    // =========================================================================

    #[inline]
    pub(crate) const fn from_block(block: RegisterBlock) -> Self {
        Self {
            block,
            _lane: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.block.as_ptr()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.block.as_mut_ptr()
    }

    #[inline]
    pub(crate) fn unary(self, kernel: UnaryFn<T>) -> Self {
        let mut out = Self::zero();
        // SAFETY: both blocks hold `lanes()` lanes of `T`; the kernel comes
        // from the registry bound for this CPU and accepts one register.
        unsafe { kernel(self.as_ptr(), out.as_mut_ptr(), Self::lanes()) };
        out
    }

    #[inline]
    pub(crate) fn binary(self, rhs: Self, kernel: BinaryFn<T>) -> Self {
        let mut out = Self::zero();
        // SAFETY: as in `unary`.
        unsafe { kernel(self.as_ptr(), rhs.as_ptr(), out.as_mut_ptr(), Self::lanes()) };
        out
    }

    #[inline]
    pub(crate) fn ternary(self, b: Self, c: Self, kernel: TernaryFn<T>) -> Self {
        let mut out = Self::zero();
        // SAFETY: as in `unary`.
        unsafe {
            kernel(self.as_ptr(), b.as_ptr(), c.as_ptr(), out.as_mut_ptr(), Self::lanes());
        }
        out
    }

    #[inline]
    pub(crate) fn bytewise(self, rhs: Self, kernel: ByteBinaryFn) -> Self {
        let mut out = Self::zero();
        // SAFETY: the blocks hold `vector_bytes()` bytes each.
        unsafe {
            kernel(
                self.block.as_ptr(),
                rhs.block.as_ptr(),
                out.block.as_mut_ptr(),
                registry().vector_bytes(),
            );
        }
        out
    }

    #[inline]
    pub(crate) fn not_bits(self) -> Self {
        let mut out = Self::zero();
        // SAFETY: the blocks hold `vector_bytes()` bytes each.
        unsafe {
            (registry().bytes.not)(
                self.block.as_ptr(),
                out.block.as_mut_ptr(),
                registry().vector_bytes(),
            );
        }
        out
    }
}

impl<T: Numeric> SimdVec<T> {
    /// Lane `i` holds `i` (wrapping for narrow integers).
    #[must_use]
    pub fn iota() -> Self {
        Self::from_fn(T::from_index)
    }
}

impl<T: Lane> Default for SimdVec<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Lane> PartialEq for SimdVec<T> {
    /// Lanewise equality of the stored values (`NaN != NaN`).
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Lane> fmt::Debug for SimdVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimdVec").field(&self.as_slice()).finish()
    }
}
