//! Promoted and packed storage for 16-bit float vectors.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{NarrowFloat, NarrowVector};
use crate::error::{ensure_len, Result};
use crate::vector::{registry, Mask, SimdVec};

/// Widens the lower `lanes::<f32>()` lanes.
#[inline]
fn widen<N: NarrowFloat>(v: SimdVec<N>) -> SimdVec<f32> {
    v.promote_lower::<f32>()
}

/// Rounds every f32 lane into the lower half of a `SimdVec<N>`.
#[inline]
fn round_lanes<N: NarrowFloat>(v: SimdVec<f32>) -> SimdVec<N> {
    let mut out = SimdVec::<N>::zero();
    // SAFETY: the source holds `lanes::<f32>()` lanes; `N` is half as wide,
    // so the destination's lower half has room for all of them.
    unsafe {
        (N::demote_kernel(registry()))(v.as_ptr(), out.as_mut_ptr(), SimdVec::<f32>::lanes());
    }
    out
}

// =============================================================================
// Promoted storage
// =============================================================================

/// f32 lanes holding values representable in `N`; rounds only when leaving
/// the vector (store, reductions).
#[derive(Clone, Copy)]
pub struct PromotedVec<N: NarrowFloat> {
    lanes: SimdVec<f32>,
    _format: PhantomData<N>,
}

impl<N: NarrowFloat> PromotedVec<N> {
    #[inline]
    fn wrap(lanes: SimdVec<f32>) -> Self {
        Self {
            lanes,
            _format: PhantomData,
        }
    }

    fn map(self, f: impl FnOnce(SimdVec<f32>) -> SimdVec<f32>) -> Self {
        Self::wrap(f(self.lanes))
    }

    fn zip(self, rhs: Self, f: impl FnOnce(SimdVec<f32>, SimdVec<f32>) -> SimdVec<f32>) -> Self {
        Self::wrap(f(self.lanes, rhs.lanes))
    }
}

impl<N: NarrowFloat> NarrowVector<N> for PromotedVec<N> {
    fn zero() -> Self {
        Self::wrap(SimdVec::zero())
    }

    fn broadcast(value: N) -> Self {
        Self::wrap(SimdVec::broadcast(value.to_f32_exact()))
    }

    fn load(src: &[N]) -> Result<Self> {
        let n = Self::lanes();
        ensure_len(n, src.len())?;
        Ok(Self::wrap(widen(SimdVec::load_prefix(&src[..n]))))
    }

    fn store(&self, dst: &mut [N]) -> Result<()> {
        let n = Self::lanes();
        ensure_len(n, dst.len())?;
        let rounded = round_lanes::<N>(self.lanes);
        dst[..n].copy_from_slice(&rounded.as_slice()[..n]);
        Ok(())
    }

    fn from_f32(v: SimdVec<f32>) -> Self {
        Self::wrap(widen(round_lanes::<N>(v)))
    }

    fn to_f32(self) -> SimdVec<f32> {
        self.lanes
    }

    fn min(self, rhs: Self) -> Self {
        self.zip(rhs, SimdVec::<f32>::min)
    }

    fn max(self, rhs: Self) -> Self {
        self.zip(rhs, SimdVec::<f32>::max)
    }

    fn sqrt(self) -> Self {
        self.map(SimdVec::<f32>::sqrt)
    }

    fn abs(self) -> Self {
        self.map(SimdVec::<f32>::abs)
    }

    fn mul_add(self, b: Self, c: Self) -> Self {
        Self::wrap(self.lanes.mul_add(b.lanes, c.lanes))
    }

    fn mul_sub(self, b: Self, c: Self) -> Self {
        Self::wrap(self.lanes.mul_sub(b.lanes, c.lanes))
    }

    fn merge(a: Self, b: Self, mask: Mask<f32>) -> Self {
        Self::wrap(SimdVec::merge(a.lanes, b.lanes, mask))
    }
}

// =============================================================================
// Packed storage
// =============================================================================

/// 16-bit patterns in the lower half of a `SimdVec<N>`; every operation
/// widens, computes one f32 operation and rounds back.
#[derive(Clone, Copy)]
pub struct PackedVec<N: NarrowFloat> {
    bits: SimdVec<N>,
}

impl<N: NarrowFloat> PackedVec<N> {
    /// The packed lanes; the upper half of the register is zero.
    #[must_use]
    pub fn as_packed(&self) -> SimdVec<N> {
        self.bits
    }

    fn map(self, f: impl FnOnce(SimdVec<f32>) -> SimdVec<f32>) -> Self {
        Self { bits: round_lanes(f(widen(self.bits))) }
    }

    fn zip(self, rhs: Self, f: impl FnOnce(SimdVec<f32>, SimdVec<f32>) -> SimdVec<f32>) -> Self {
        Self { bits: round_lanes(f(widen(self.bits), widen(rhs.bits))) }
    }
}

impl<N: NarrowFloat> NarrowVector<N> for PackedVec<N> {
    fn zero() -> Self {
        Self { bits: SimdVec::zero() }
    }

    fn broadcast(value: N) -> Self {
        let n = Self::lanes();
        Self {
            bits: SimdVec::from_fn(|i| if i < n { value } else { N::default() }),
        }
    }

    fn load(src: &[N]) -> Result<Self> {
        let n = Self::lanes();
        ensure_len(n, src.len())?;
        Ok(Self { bits: SimdVec::load_prefix(&src[..n]) })
    }

    fn store(&self, dst: &mut [N]) -> Result<()> {
        let n = Self::lanes();
        ensure_len(n, dst.len())?;
        dst[..n].copy_from_slice(&self.bits.as_slice()[..n]);
        Ok(())
    }

    fn from_f32(v: SimdVec<f32>) -> Self {
        Self { bits: round_lanes(v) }
    }

    fn to_f32(self) -> SimdVec<f32> {
        widen(self.bits)
    }

    fn min(self, rhs: Self) -> Self {
        self.zip(rhs, SimdVec::<f32>::min)
    }

    fn max(self, rhs: Self) -> Self {
        self.zip(rhs, SimdVec::<f32>::max)
    }

    fn sqrt(self) -> Self {
        self.map(SimdVec::<f32>::sqrt)
    }

    fn abs(self) -> Self {
        self.map(SimdVec::<f32>::abs)
    }

    fn mul_add(self, b: Self, c: Self) -> Self {
        Self::from_f32(self.to_f32().mul_add(b.to_f32(), c.to_f32()))
    }

    fn mul_sub(self, b: Self, c: Self) -> Self {
        Self::from_f32(self.to_f32().mul_sub(b.to_f32(), c.to_f32()))
    }

    fn merge(a: Self, b: Self, mask: Mask<f32>) -> Self {
        Self::from_f32(SimdVec::merge(a.to_f32(), b.to_f32(), mask))
    }
}

// =============================================================================
// Operators and formatting
// =============================================================================

macro_rules! narrow_operators {
    ($ty:ident) => {
        impl<N: NarrowFloat> Add for $ty<N> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a + b)
            }
        }

        impl<N: NarrowFloat> Sub for $ty<N> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a - b)
            }
        }

        impl<N: NarrowFloat> Mul for $ty<N> {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a * b)
            }
        }

        impl<N: NarrowFloat> Div for $ty<N> {
            type Output = Self;

            fn div(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a / b)
            }
        }

        impl<N: NarrowFloat> Neg for $ty<N> {
            type Output = Self;

            fn neg(self) -> Self {
                self.map(|a| -a)
            }
        }

        impl<N: NarrowFloat> PartialEq for $ty<N> {
            fn eq(&self, other: &Self) -> bool {
                self.to_f32() == other.to_f32()
            }
        }

        impl<N: NarrowFloat> fmt::Debug for $ty<N> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($ty)).field(&self.to_f32().as_slice()).finish()
            }
        }
    };
}

narrow_operators!(PromotedVec);
narrow_operators!(PackedVec);
