//! Lane-width and representation changes.
//!
//! Narrowing a full vector of `W` lanes fills the lower half of a `SimdVec<N>`
//! (N has twice as many lanes) and zeroes the upper half. The `ordered_demote2`
//! variants fill both halves, `self` first. Widening reads either half of the
//! source.

use super::{registry, SimdVec};
use crate::lane::{ConvertLanes, DemoteFloat, DemoteInt, Integer, Lane, Promote};
use crate::simd_native::kernels::ConvertFn;

/// Runs `kernel` on `count` lanes of `src` starting at `src_offset`, writing to
/// `dst` starting at `dst_offset`.
///
/// # Safety
///
/// Both offsets plus `count` must stay within one vector of their lane type,
/// and `count` must be a whole number of the kernel's register steps.
#[inline]
unsafe fn run_convert<S: Lane, D: Lane>(
    kernel: ConvertFn<S, D>,
    src: &SimdVec<S>,
    src_offset: usize,
    dst: &mut SimdVec<D>,
    dst_offset: usize,
    count: usize,
) {
    kernel(src.as_ptr().add(src_offset), dst.as_mut_ptr().add(dst_offset), count);
}

impl<W: Integer> SimdVec<W> {
    /// Narrows each lane to `N`, clamping to `N`'s range.
    #[must_use]
    pub fn demote_saturating<N: Integer>(self) -> SimdVec<N>
    where
        W: DemoteInt<N>,
    {
        self.demote_with(W::narrowing(registry()).saturating)
    }

    /// Narrows each lane to `N`, keeping the low bits.
    #[must_use]
    pub fn demote_truncating<N: Integer>(self) -> SimdVec<N>
    where
        W: DemoteInt<N>,
    {
        self.demote_with(W::narrowing(registry()).truncating)
    }

    /// Saturating narrowing of `self` into the lower half and `hi` into the
    /// upper half.
    #[must_use]
    pub fn ordered_demote2_saturating<N: Integer>(self, hi: Self) -> SimdVec<N>
    where
        W: DemoteInt<N>,
    {
        self.demote2_with(hi, W::narrowing(registry()).saturating)
    }

    /// Truncating narrowing of `self` into the lower half and `hi` into the
    /// upper half.
    #[must_use]
    pub fn ordered_demote2_truncating<N: Integer>(self, hi: Self) -> SimdVec<N>
    where
        W: DemoteInt<N>,
    {
        self.demote2_with(hi, W::narrowing(registry()).truncating)
    }
}

impl<W: Lane> SimdVec<W> {
    /// Rounds each float lane to `N` (nearest, ties to even).
    #[must_use]
    pub fn demote_float<N: Lane>(self) -> SimdVec<N>
    where
        W: DemoteFloat<N>,
    {
        self.demote_with(W::demote(registry()))
    }

    /// Rounds `self` into the lower half and `hi` into the upper half.
    #[must_use]
    pub fn ordered_demote2_float<N: Lane>(self, hi: Self) -> SimdVec<N>
    where
        W: DemoteFloat<N>,
    {
        self.demote2_with(hi, W::demote(registry()))
    }

    /// Widens the lower half of the lanes to `T`.
    #[must_use]
    pub fn promote_lower<T: Lane>(self) -> SimdVec<T>
    where
        W: Promote<T>,
    {
        self.promote_half(0)
    }

    /// Widens the upper half of the lanes to `T`.
    #[must_use]
    pub fn promote_upper<T: Lane>(self) -> SimdVec<T>
    where
        W: Promote<T>,
    {
        self.promote_half(SimdVec::<T>::lanes())
    }

    /// Same-width conversion: int to float rounds to nearest; float to int
    /// truncates toward zero, saturates, and maps NaN to zero.
    #[must_use]
    pub fn convert<D: Lane>(self) -> SimdVec<D>
    where
        W: ConvertLanes<D>,
    {
        let mut out = SimdVec::<D>::zero();
        // SAFETY: source and destination hold `lanes()` lanes of equal width.
        unsafe { run_convert(W::convert(registry()), &self, 0, &mut out, 0, Self::lanes()) };
        out
    }

    fn demote_with<N: Lane>(self, kernel: ConvertFn<W, N>) -> SimdVec<N> {
        let mut out = SimdVec::<N>::zero();
        // SAFETY: `N` is half as wide, so the destination has room for
        // `lanes()` lanes in its lower half.
        unsafe { run_convert(kernel, &self, 0, &mut out, 0, Self::lanes()) };
        out
    }

    fn demote2_with<N: Lane>(self, hi: Self, kernel: ConvertFn<W, N>) -> SimdVec<N> {
        let n = Self::lanes();
        let mut out = SimdVec::<N>::zero();
        // SAFETY: the destination holds `2 * n` lanes of `N`.
        unsafe {
            run_convert(kernel, &self, 0, &mut out, 0, n);
            run_convert(kernel, &hi, 0, &mut out, n, n);
        }
        out
    }

    fn promote_half<T: Lane>(self, offset: usize) -> SimdVec<T>
    where
        W: Promote<T>,
    {
        let mut out = SimdVec::<T>::zero();
        // SAFETY: `T` is twice as wide, so one vector of `T` holds half the
        // source lanes; `offset` is 0 or that half.
        unsafe {
            run_convert(W::promote(registry()), &self, offset, &mut out, 0, SimdVec::<T>::lanes());
        }
        out
    }
}
