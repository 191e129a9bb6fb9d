//! Lane masks produced by comparisons.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use super::{registry, RegisterBlock, SimdVec};
use crate::lane::{Lane, Numeric};
use crate::simd_native::kernels::ByteBinaryFn;
use crate::simd_native::KernelRegistry;

/// One boolean per lane of `SimdVec<T>`, stored as an all-ones or all-zeros
/// lane of `T`'s width.
#[derive(Clone, Copy)]
pub struct Mask<T: Lane> {
    block: RegisterBlock,
    _lane: PhantomData<T>,
}

impl<T: Lane> Mask<T> {
    #[inline]
    pub(crate) const fn from_block(block: RegisterBlock) -> Self {
        Self {
            block,
            _lane: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn block(&self) -> &RegisterBlock {
        &self.block
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.block.as_mut_ptr()
    }

    /// Every lane false.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::from_block(RegisterBlock::ZERO)
    }

    /// Every lane true.
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        !Self::none()
    }

    /// Lane `i` set to `f(i)`.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        let width = size_of::<T>();
        let mut mask = Self::none();
        for i in 0..SimdVec::<T>::lanes() {
            if f(i) {
                mask.block.0[i * width..(i + 1) * width].fill(0xFF);
            }
        }
        mask
    }

    /// Whether every lane is true.
    #[inline]
    #[must_use]
    pub fn all_true(&self) -> bool {
        self.count_true() == SimdVec::<T>::lanes()
    }

    /// Whether every lane is false.
    #[inline]
    #[must_use]
    pub fn all_false(&self) -> bool {
        self.count_true() == 0
    }

    /// Number of true lanes.
    #[must_use]
    pub fn count_true(&self) -> usize {
        let reg = registry();
        // SAFETY: the block holds `vector_bytes()` bytes of full-lane patterns.
        let bytes = unsafe { (reg.bytes.count_set)(self.block.as_ptr(), reg.vector_bytes()) };
        bytes / size_of::<T>()
    }

    /// Index of the first true lane.
    #[must_use]
    pub fn find_first_true(&self) -> Option<usize> {
        let reg = registry();
        let len = reg.vector_bytes();
        // SAFETY: as in `count_true`.
        let byte = unsafe { (reg.bytes.first_set)(self.block.as_ptr(), len) };
        (byte < len).then(|| byte / size_of::<T>())
    }

    /// Whether lane `i` is true.
    ///
    /// # Panics
    ///
    /// Panics if `i >= lanes()`.
    #[must_use]
    pub fn test(&self, i: usize) -> bool {
        assert!(i < SimdVec::<T>::lanes(), "lane {i} out of range");
        self.block.0[i * size_of::<T>()] == 0xFF
    }

    /// One `bool` per lane.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        (0..SimdVec::<T>::lanes()).map(|i| self.test(i)).collect()
    }

    fn bytewise(self, rhs: Self, pick: fn(&KernelRegistry) -> ByteBinaryFn) -> Self {
        let reg = registry();
        let mut out = Self::none();
        // SAFETY: the blocks hold `vector_bytes()` bytes each.
        unsafe {
            pick(reg)(
                self.block.as_ptr(),
                rhs.block.as_ptr(),
                out.block.as_mut_ptr(),
                reg.vector_bytes(),
            );
        }
        out
    }
}

impl<T: Numeric> Mask<T> {
    /// First `n` lanes true, the rest false (`iota() < n`).
    #[must_use]
    pub fn first_n(n: usize) -> Self {
        let n = n.min(SimdVec::<T>::lanes());
        SimdVec::<T>::iota().simd_lt(SimdVec::broadcast(T::from_index(n)))
    }
}

impl<T: Lane> BitAnd for Mask<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.bytewise(rhs, |reg| reg.bytes.and)
    }
}

impl<T: Lane> BitOr for Mask<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.bytewise(rhs, |reg| reg.bytes.or)
    }
}

impl<T: Lane> BitXor for Mask<T> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.bytewise(rhs, |reg| reg.bytes.xor)
    }
}

impl<T: Lane> Not for Mask<T> {
    type Output = Self;

    fn not(self) -> Self {
        let reg = registry();
        let mut out = Self::none();
        // SAFETY: the blocks hold `vector_bytes()` bytes each.
        unsafe { (reg.bytes.not)(self.block.as_ptr(), out.block.as_mut_ptr(), reg.vector_bytes()) };
        out
    }
}

impl<T: Lane> PartialEq for Mask<T> {
    fn eq(&self, other: &Self) -> bool {
        let len = registry().vector_bytes();
        self.block.bytes(len) == other.block.bytes(len)
    }
}

impl<T: Lane> Eq for Mask<T> {}

impl<T: Lane> fmt::Debug for Mask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mask").field(&self.to_bools()).finish()
    }
}
