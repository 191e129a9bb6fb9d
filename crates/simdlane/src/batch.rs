//! Slice-level operations on a [`KernelRegistry`].
//!
//! Whole registers run on the registry's kernels; the remainder runs on the
//! scalar kernels. Any registry works, so callers (and tests) can compare
//! levels side by side on the same buffers.

use crate::error::{ensure_same_len, Result};
use crate::lane::{Float, Numeric};
use crate::simd_native::kernels::{BinaryFn, TernaryFn};
use crate::simd_native::{scalar_registry, KernelRegistry};
use crate::vector::RegisterBlock;

impl KernelRegistry {
    /// Largest prefix of `len` made of whole `T` registers.
    #[inline]
    fn full_len<T: Numeric>(&self, len: usize) -> usize {
        let step = self.lanes::<T>();
        len - len % step
    }

    /// `out[i] = a[i] + b[i]`, wrapping for integers.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
    /// unless all three slices have the same length.
    pub fn add_slices<T: Numeric>(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        self.binary_slices(a, b, out, |reg| T::arith(reg).add)
    }

    /// `out[i] = a[i] - b[i]`, wrapping for integers.
    ///
    /// # Errors
    ///
    /// As [`add_slices`](Self::add_slices).
    pub fn sub_slices<T: Numeric>(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        self.binary_slices(a, b, out, |reg| T::arith(reg).sub)
    }

    /// `out[i] = a[i] * b[i]`, wrapping for integers.
    ///
    /// # Errors
    ///
    /// As [`add_slices`](Self::add_slices).
    pub fn mul_slices<T: Numeric>(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        self.binary_slices(a, b, out, |reg| T::arith(reg).mul)
    }

    /// `out[i] = min(a[i], b[i])`.
    ///
    /// # Errors
    ///
    /// As [`add_slices`](Self::add_slices).
    pub fn min_slices<T: Numeric>(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        self.binary_slices(a, b, out, |reg| T::arith(reg).min)
    }

    /// `out[i] = max(a[i], b[i])`.
    ///
    /// # Errors
    ///
    /// As [`add_slices`](Self::add_slices).
    pub fn max_slices<T: Numeric>(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        self.binary_slices(a, b, out, |reg| T::arith(reg).max)
    }

    /// `out[i] = a[i] * b[i] + c[i]`.
    ///
    /// The register part is fused when [`fused_mul_add`](Self::fused_mul_add)
    /// is true; the tail always rounds twice.
    ///
    /// # Errors
    ///
    /// As [`add_slices`](Self::add_slices), over all four slices.
    pub fn mul_add_slices<T: Float>(
        &self,
        a: &[T],
        b: &[T],
        c: &[T],
        out: &mut [T],
    ) -> Result<()> {
        let len = a.len();
        ensure_same_len(len, b.len())?;
        ensure_same_len(len, c.len())?;
        ensure_same_len(len, out.len())?;
        let pick = |reg: &KernelRegistry| -> TernaryFn<T> { T::float(reg).mul_add };
        let full = self.full_len::<T>(len);
        // SAFETY: all slices hold `len` elements; `full` is a multiple of the
        // register step and the tail goes to the scalar kernel.
        unsafe {
            if full > 0 {
                pick(self)(a.as_ptr(), b.as_ptr(), c.as_ptr(), out.as_mut_ptr(), full);
            }
            if len > full {
                pick(scalar_registry())(
                    a.as_ptr().add(full),
                    b.as_ptr().add(full),
                    c.as_ptr().add(full),
                    out.as_mut_ptr().add(full),
                    len - full,
                );
            }
        }
        Ok(())
    }

    /// Sum of every element; zero for an empty slice.
    #[must_use]
    pub fn reduce_sum<T: Numeric>(&self, a: &[T]) -> T {
        let full = self.full_len::<T>(a.len());
        let mut tail = a[full..].iter();
        let sum = if full > 0 {
            // SAFETY: `a` holds `full` elements, a non-zero multiple of the step.
            unsafe { (T::arith(self).reduce_sum)(a.as_ptr(), full) }
        } else {
            match tail.next() {
                Some(&first) => first,
                None => return T::ZERO,
            }
        };
        tail.fold(sum, |acc, &x| acc.add_lane(x))
    }

    /// `sum(a[i] * b[i])`, accumulated per lane in one register.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
    /// if the slices differ in length.
    pub fn dot<T: Float>(&self, a: &[T], b: &[T]) -> Result<T> {
        ensure_same_len(a.len(), b.len())?;
        let step = self.lanes::<T>();
        let full = self.full_len::<T>(a.len());
        let mul_add = T::float(self).mul_add;

        let mut acc = RegisterBlock::ZERO;
        let mut sum = T::ZERO;
        if full > 0 {
            let acc_ptr = acc.as_mut_ptr::<T>();
            let mut i = 0;
            // SAFETY: each step reads one register from `a` and `b` within
            // `full`; `acc` is one register used as both addend and output.
            unsafe {
                while i < full {
                    mul_add(a.as_ptr().add(i), b.as_ptr().add(i), acc_ptr, acc_ptr, step);
                    i += step;
                }
                sum = (T::arith(self).reduce_sum)(acc.as_ptr(), step);
            }
        }
        Ok(a[full..]
            .iter()
            .zip(&b[full..])
            .fold(sum, |acc, (&x, &y)| acc.add_lane(x.mul_lane(y))))
    }

    fn binary_slices<T: Numeric>(
        &self,
        a: &[T],
        b: &[T],
        out: &mut [T],
        pick: fn(&KernelRegistry) -> BinaryFn<T>,
    ) -> Result<()> {
        let len = a.len();
        ensure_same_len(len, b.len())?;
        ensure_same_len(len, out.len())?;
        let full = self.full_len::<T>(len);
        // SAFETY: as in `mul_add_slices`.
        unsafe {
            if full > 0 {
                pick(self)(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), full);
            }
            if len > full {
                pick(scalar_registry())(
                    a.as_ptr().add(full),
                    b.as_ptr().add(full),
                    out.as_mut_ptr().add(full),
                    len - full,
                );
            }
        }
        Ok(())
    }
}
