//! Lane element traits.
//!
//! Each trait maps a lane type to its kernel table in a [`KernelRegistry`],
//! so generic code such as `SimdVec<T>` never matches on the element type.
//! All traits are sealed: the set of lane types is closed.

// Reason: `from_index` deliberately wraps lane indices into small lane types.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use std::fmt::Debug;

use half::{bf16, f16};

use crate::simd_native::kernels::{
    ArithKernels, ConvertFn, FloatKernels, GatherKernels, IntKernels, NarrowingKernels,
    ShuffleKernels, SignedKernels,
};
use crate::simd_native::KernelRegistry;

mod sealed {
    pub trait Sealed {}
}

/// Any type a vector lane can hold, including the 16-bit float storage types.
pub trait Lane:
    sealed::Sealed + bytemuck::Pod + Default + PartialEq + Debug + Send + Sync + 'static
{
    /// Lane-order kernels for this type.
    fn shuffle(reg: &KernelRegistry) -> &ShuffleKernels<Self>;
}

/// Lane types with arithmetic, comparisons and reductions.
pub trait Numeric: Lane + PartialOrd {
    /// Additive identity.
    const ZERO: Self;

    /// `i` converted with `as` semantics (wrapping for narrow integers).
    fn from_index(i: usize) -> Self;

    /// Scalar add with the same semantics as the vector kernel (wrapping).
    fn add_lane(self, rhs: Self) -> Self;

    /// Scalar multiply with the same semantics as the vector kernel (wrapping).
    fn mul_lane(self, rhs: Self) -> Self;

    /// Arithmetic kernels for this type.
    fn arith(reg: &KernelRegistry) -> &ArithKernels<Self>;
}

/// Signed integers and floats.
pub trait Signed: Numeric {
    /// Negation and absolute value kernels.
    fn signed(reg: &KernelRegistry) -> &SignedKernels<Self>;
}

/// Integer lane types.
pub trait Integer: Numeric {
    /// Lane width in bits.
    const BITS: u32;

    /// Shift kernels.
    fn int(reg: &KernelRegistry) -> &IntKernels<Self>;
}

/// `f32` and `f64`.
pub trait Float: Signed {
    /// Division, square root and multiply-add kernels.
    fn float(reg: &KernelRegistry) -> &FloatKernels<Self>;
}

/// 32/64-bit lanes that support gather and scatter with same-width indices.
pub trait Indexable: Numeric {
    /// Signed index lane type (`i32` or `i64`).
    type Index: Integer + Into<i64>;

    /// Gather/scatter kernels.
    fn gather(reg: &KernelRegistry) -> &GatherKernels<Self, Self::Index>;
}

/// Integer narrowing from `Self` to `N` (half the width).
pub trait DemoteInt<N: Integer>: Integer {
    /// Saturating and truncating kernels.
    fn narrowing(reg: &KernelRegistry) -> &NarrowingKernels<Self, N>;
}

/// Float narrowing from `Self` to `N`, rounding to nearest even.
pub trait DemoteFloat<N: Lane>: Float {
    /// Conversion kernel.
    fn demote(reg: &KernelRegistry) -> ConvertFn<Self, N>;
}

/// Exact widening from `Self` to `W` (twice the width).
pub trait Promote<W: Lane>: Lane {
    /// Conversion kernel.
    fn promote(reg: &KernelRegistry) -> ConvertFn<Self, W>;
}

/// Same-width conversion between integer and float lanes.
pub trait ConvertLanes<D: Lane>: Numeric {
    /// Conversion kernel.
    fn convert(reg: &KernelRegistry) -> ConvertFn<Self, D>;
}

// =============================================================================
// Implementations
// =============================================================================

macro_rules! impl_lane {
    ($t:ty, $field:ident) => {
        impl sealed::Sealed for $t {}

        impl Lane for $t {
            #[inline]
            fn shuffle(reg: &KernelRegistry) -> &ShuffleKernels<Self> {
                &reg.shuffle.$field
            }
        }
    };
}

macro_rules! impl_int {
    ($t:ty, $field:ident) => {
        impl_lane!($t, $field);

        impl Numeric for $t {
            const ZERO: Self = 0;

            #[inline]
            fn from_index(i: usize) -> Self {
                i as $t
            }

            #[inline]
            fn add_lane(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn mul_lane(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn arith(reg: &KernelRegistry) -> &ArithKernels<Self> {
                &reg.arith.$field
            }
        }

        impl Integer for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn int(reg: &KernelRegistry) -> &IntKernels<Self> {
                &reg.int.$field
            }
        }
    };
}

macro_rules! impl_float {
    ($t:ty, $field:ident) => {
        impl_lane!($t, $field);

        impl Numeric for $t {
            const ZERO: Self = 0.0;

            #[inline]
            fn from_index(i: usize) -> Self {
                i as $t
            }

            #[inline]
            fn add_lane(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn mul_lane(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn arith(reg: &KernelRegistry) -> &ArithKernels<Self> {
                &reg.arith.$field
            }
        }

        impl Float for $t {
            #[inline]
            fn float(reg: &KernelRegistry) -> &FloatKernels<Self> {
                &reg.float.$field
            }
        }
    };
}

macro_rules! impl_signed {
    ($($t:ty => $field:ident),* $(,)?) => {
        $(
            impl Signed for $t {
                #[inline]
                fn signed(reg: &KernelRegistry) -> &SignedKernels<Self> {
                    &reg.signed.$field
                }
            }
        )*
    };
}

macro_rules! impl_indexable {
    ($($t:ty => $idx:ty, $field:ident),* $(,)?) => {
        $(
            impl Indexable for $t {
                type Index = $idx;

                #[inline]
                fn gather(reg: &KernelRegistry) -> &GatherKernels<Self, $idx> {
                    &reg.gather.$field
                }
            }
        )*
    };
}

macro_rules! impl_demote_int {
    ($($w:ty => $n:ty, $field:ident),* $(,)?) => {
        $(
            impl DemoteInt<$n> for $w {
                #[inline]
                fn narrowing(reg: &KernelRegistry) -> &NarrowingKernels<Self, $n> {
                    &reg.convert.$field
                }
            }
        )*
    };
}

macro_rules! impl_promote {
    ($($n:ty => $w:ty, $field:ident),* $(,)?) => {
        $(
            impl Promote<$w> for $n {
                #[inline]
                fn promote(reg: &KernelRegistry) -> ConvertFn<Self, $w> {
                    reg.convert.$field
                }
            }
        )*
    };
}

impl_int!(i8, i8);
impl_int!(i16, i16);
impl_int!(i32, i32);
impl_int!(i64, i64);
impl_int!(u8, u8);
impl_int!(u16, u16);
impl_int!(u32, u32);
impl_int!(u64, u64);
impl_float!(f32, f32);
impl_float!(f64, f64);
impl_lane!(f16, f16);
impl_lane!(bf16, bf16);

impl_signed!(i8 => i8, i16 => i16, i32 => i32, i64 => i64, f32 => f32, f64 => f64);

impl_indexable!(
    i32 => i32, i32,
    u32 => i32, u32,
    f32 => i32, f32,
    i64 => i64, i64,
    u64 => i64, u64,
    f64 => i64, f64,
);

impl_demote_int!(
    i16 => i8, demote_i16_i8,
    i16 => u8, demote_i16_u8,
    i32 => i16, demote_i32_i16,
    i32 => u16, demote_i32_u16,
    i64 => i32, demote_i64_i32,
    u16 => u8, demote_u16_u8,
    u32 => u16, demote_u32_u16,
    u64 => u32, demote_u64_u32,
);

impl_promote!(
    i8 => i16, promote_i8_i16,
    u8 => u16, promote_u8_u16,
    i16 => i32, promote_i16_i32,
    u16 => u32, promote_u16_u32,
    i32 => i64, promote_i32_i64,
    u32 => u64, promote_u32_u64,
    f32 => f64, promote_f32_f64,
    f16 => f32, promote_f16_f32,
    bf16 => f32, promote_bf16_f32,
);

impl DemoteFloat<f32> for f64 {
    #[inline]
    fn demote(reg: &KernelRegistry) -> ConvertFn<Self, f32> {
        reg.convert.demote_f64_f32
    }
}

impl DemoteFloat<f16> for f32 {
    #[inline]
    fn demote(reg: &KernelRegistry) -> ConvertFn<Self, f16> {
        reg.convert.demote_f32_f16
    }
}

impl DemoteFloat<bf16> for f32 {
    #[inline]
    fn demote(reg: &KernelRegistry) -> ConvertFn<Self, bf16> {
        reg.convert.demote_f32_bf16
    }
}

impl ConvertLanes<f32> for i32 {
    #[inline]
    fn convert(reg: &KernelRegistry) -> ConvertFn<Self, f32> {
        reg.convert.i32_to_f32
    }
}

impl ConvertLanes<i32> for f32 {
    #[inline]
    fn convert(reg: &KernelRegistry) -> ConvertFn<Self, i32> {
        reg.convert.f32_to_i32
    }
}

impl ConvertLanes<f64> for i64 {
    #[inline]
    fn convert(reg: &KernelRegistry) -> ConvertFn<Self, f64> {
        reg.convert.i64_to_f64
    }
}

impl ConvertLanes<i64> for f64 {
    #[inline]
    fn convert(reg: &KernelRegistry) -> ConvertFn<Self, i64> {
        reg.convert.f64_to_i64
    }
}
