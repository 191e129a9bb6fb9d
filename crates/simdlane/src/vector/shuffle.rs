//! Lane reordering and indexed memory access.

use super::{registry, SimdVec};
use crate::error::{Result, SimdError};
use crate::lane::{Indexable, Lane};

impl<T: Lane> SimdVec<T> {
    /// Lanes in reverse order.
    #[inline]
    #[must_use]
    pub fn reverse(self) -> Self {
        self.unary(T::shuffle(registry()).reverse)
    }

    /// `[a0, b0, a1, b1, ...]` from the lower halves of `self` and `other`.
    #[inline]
    #[must_use]
    pub fn interleave_lower(self, other: Self) -> Self {
        self.binary(other, T::shuffle(registry()).interleave_lower)
    }

    /// `[a(n/2), b(n/2), ...]` from the upper halves of `self` and `other`.
    #[inline]
    #[must_use]
    pub fn interleave_upper(self, other: Self) -> Self {
        self.binary(other, T::shuffle(registry()).interleave_upper)
    }
}

/// Checks every index against `len`, reporting the first offender.
fn check_indices<I: Into<i64> + Copy>(indices: &[I], len: usize) -> Result<()> {
    for &index in indices {
        let index: i64 = index.into();
        let in_range = usize::try_from(index).is_ok_and(|i| i < len);
        if !in_range {
            return Err(SimdError::IndexOutOfBounds { index, len });
        }
    }
    Ok(())
}

impl<T: Indexable> SimdVec<T> {
    /// `lane[i] = base[indices[i]]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::IndexOutOfBounds`] if any index is negative or
    /// not below `base.len()`.
    pub fn gather(base: &[T], indices: SimdVec<T::Index>) -> Result<Self> {
        check_indices(indices.as_slice(), base.len())?;
        let mut out = Self::zero();
        // SAFETY: every index was checked against `base.len()`; index and
        // value lanes have the same width, hence the same count.
        unsafe {
            (T::gather(registry()).gather)(
                base.as_ptr(),
                indices.as_ptr(),
                out.as_mut_ptr(),
                Self::lanes(),
            );
        }
        Ok(out)
    }

    /// `base[indices[i]] = lane[i]`; on duplicate indices the highest lane wins.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::IndexOutOfBounds`] if any index is negative or
    /// not below `base.len()`. Nothing is written in that case.
    pub fn scatter(self, base: &mut [T], indices: SimdVec<T::Index>) -> Result<()> {
        check_indices(indices.as_slice(), base.len())?;
        // SAFETY: as in `gather`.
        unsafe {
            (T::gather(registry()).scatter)(
                self.as_ptr(),
                indices.as_ptr(),
                base.as_mut_ptr(),
                Self::lanes(),
            );
        }
        Ok(())
    }
}
