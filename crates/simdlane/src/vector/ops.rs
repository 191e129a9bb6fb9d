//! Arithmetic, comparisons, reductions and `std::ops` impls for `SimdVec`.
//!
//! Integer arithmetic wraps. Float `min`/`max` return the other operand when
//! one side is NaN. Comparisons involving NaN are false except `simd_ne`.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Shl, Shr, Sub, SubAssign,
};

use super::{registry, Mask, SimdVec};
use crate::lane::{Float, Integer, Lane, Numeric, Signed};
use crate::simd_native::kernels::CompareFn;

impl<T: Numeric> SimdVec<T> {
    /// Lanewise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        self.binary(rhs, T::arith(registry()).min)
    }

    /// Lanewise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        self.binary(rhs, T::arith(registry()).max)
    }

    fn compare(self, rhs: Self, kernel: CompareFn<T>) -> Mask<T> {
        let mut mask = Mask::none();
        // SAFETY: both inputs hold `lanes()` lanes; the mask block holds
        // `lanes() * size_of::<T>()` bytes.
        unsafe { kernel(self.as_ptr(), rhs.as_ptr(), mask.as_mut_ptr(), Self::lanes()) };
        mask
    }

    /// `self == rhs` per lane.
    #[inline]
    #[must_use]
    pub fn simd_eq(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).eq)
    }

    /// `self != rhs` per lane; true for NaN lanes.
    #[inline]
    #[must_use]
    pub fn simd_ne(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).ne)
    }

    /// `self < rhs` per lane.
    #[inline]
    #[must_use]
    pub fn simd_lt(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).lt)
    }

    /// `self <= rhs` per lane.
    #[inline]
    #[must_use]
    pub fn simd_le(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).le)
    }

    /// `self > rhs` per lane.
    #[inline]
    #[must_use]
    pub fn simd_gt(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).gt)
    }

    /// `self >= rhs` per lane.
    #[inline]
    #[must_use]
    pub fn simd_ge(self, rhs: Self) -> Mask<T> {
        self.compare(rhs, T::arith(registry()).ge)
    }

    /// Sum of all lanes. The order of additions is backend-specific.
    #[must_use]
    pub fn reduce_sum(self) -> T {
        // SAFETY: the block holds `lanes()` lanes.
        unsafe { (T::arith(registry()).reduce_sum)(self.as_ptr(), Self::lanes()) }
    }

    /// Smallest lane.
    #[must_use]
    pub fn reduce_min(self) -> T {
        // SAFETY: the block holds `lanes()` lanes.
        unsafe { (T::arith(registry()).reduce_min)(self.as_ptr(), Self::lanes()) }
    }

    /// Largest lane.
    #[must_use]
    pub fn reduce_max(self) -> T {
        // SAFETY: the block holds `lanes()` lanes.
        unsafe { (T::arith(registry()).reduce_max)(self.as_ptr(), Self::lanes()) }
    }
}

impl<T: Signed> SimdVec<T> {
    /// Lanewise absolute value; `abs(MIN) == MIN` for integers.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        self.unary(T::signed(registry()).abs)
    }
}

impl<T: Float> SimdVec<T> {
    /// Lanewise square root.
    #[inline]
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.unary(T::float(registry()).sqrt)
    }

    /// `self * b + c`, fused when [`KernelRegistry::fused_mul_add`] says so.
    ///
    /// [`KernelRegistry::fused_mul_add`]: crate::simd_native::KernelRegistry::fused_mul_add
    #[inline]
    #[must_use]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        self.ternary(b, c, T::float(registry()).mul_add)
    }

    /// `self * b - c`.
    #[inline]
    #[must_use]
    pub fn mul_sub(self, b: Self, c: Self) -> Self {
        self.ternary(b, c, T::float(registry()).mul_sub)
    }

    /// `c - self * b`.
    #[inline]
    #[must_use]
    pub fn neg_mul_add(self, b: Self, c: Self) -> Self {
        self.ternary(b, c, T::float(registry()).neg_mul_add)
    }
}

impl<T: Integer> SimdVec<T> {
    /// Shifts every lane left; `amount >= BITS` yields zero.
    #[must_use]
    pub fn shift_left(self, amount: u32) -> Self {
        let mut out = Self::zero();
        // SAFETY: both blocks hold `lanes()` lanes.
        unsafe { (T::int(registry()).shl)(self.as_ptr(), out.as_mut_ptr(), Self::lanes(), amount) };
        out
    }

    /// Shifts every lane right: arithmetic for signed lanes, logical for
    /// unsigned. `amount >= BITS` yields the sign fill (signed) or zero.
    #[must_use]
    pub fn shift_right(self, amount: u32) -> Self {
        let mut out = Self::zero();
        // SAFETY: both blocks hold `lanes()` lanes.
        unsafe { (T::int(registry()).shr)(self.as_ptr(), out.as_mut_ptr(), Self::lanes(), amount) };
        out
    }
}

// =============================================================================
// Operator traits
// =============================================================================

macro_rules! impl_binary_op {
    ($bound:ident, $trait:ident, $method:ident, $assign_trait:ident, $assign:ident, |$reg:ident| $kernel:expr) => {
        impl<T: $bound> $trait for SimdVec<T> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                let $reg = registry();
                self.binary(rhs, $kernel)
            }
        }

        impl<T: $bound> $assign_trait for SimdVec<T> {
            #[inline]
            fn $assign(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

impl_binary_op!(Numeric, Add, add, AddAssign, add_assign, |reg| T::arith(reg).add);
impl_binary_op!(Numeric, Sub, sub, SubAssign, sub_assign, |reg| T::arith(reg).sub);
impl_binary_op!(Numeric, Mul, mul, MulAssign, mul_assign, |reg| T::arith(reg).mul);
impl_binary_op!(Float, Div, div, DivAssign, div_assign, |reg| T::float(reg).div);

macro_rules! impl_bit_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign:ident, $field:ident) => {
        impl<T: Lane> $trait for SimdVec<T> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                self.bytewise(rhs, registry().bytes.$field)
            }
        }

        impl<T: Lane> $assign_trait for SimdVec<T> {
            #[inline]
            fn $assign(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, and);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, or);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor);

impl<T: Lane> Not for SimdVec<T> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.not_bits()
    }
}

impl<T: Signed> Neg for SimdVec<T> {
    type Output = Self;

    /// Lanewise negation; wraps for integers, flips the sign bit for floats.
    #[inline]
    fn neg(self) -> Self {
        self.unary(T::signed(registry()).neg)
    }
}

impl<T: Integer> Shl<u32> for SimdVec<T> {
    type Output = Self;

    #[inline]
    fn shl(self, amount: u32) -> Self {
        self.shift_left(amount)
    }
}

impl<T: Integer> Shr<u32> for SimdVec<T> {
    type Output = Self;

    #[inline]
    fn shr(self, amount: u32) -> Self {
        self.shift_right(amount)
    }
}
