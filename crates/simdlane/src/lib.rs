//! # simdlane
//!
//! Portable SIMD vectors with runtime kernel dispatch.
//!
//! Generic code is written once against [`SimdVec<T>`] and runs on the best
//! instruction set the host supports, chosen once per process:
//!
//! - **AVX-512** (64-byte registers, F + BW)
//! - **AVX2 + FMA** (32-byte registers, F16C for float16 when present)
//! - **NEON** (16-byte registers, aarch64)
//! - **Scalar** (emulated 16-byte registers, always available)
//!
//! ## Features
//!
//! - **12 lane types**: `i8..i64`, `u8..u64`, `f32`, `f64`, `f16`, `bf16`
//! - **Masks**: comparisons yield [`Mask<T>`] for `merge`, counting and search
//! - **Conversions**: saturating/truncating demotion, promotion, int/float
//! - **Float16 / BFloat16**: bit-exact round-to-nearest-even emulation on f32
//!   lanes ([`narrow`])
//! - **Configuration**: cap the dispatch level from TOML or `SIMDLANE_*`
//!   environment variables ([`SimdConfig`])
//!
//! ## Quick Start
//!
//! ```rust
//! use simdlane::SimdVec;
//!
//! fn main() -> Result<(), simdlane::SimdError> {
//!     let n = SimdVec::<f32>::lanes();
//!     let a = SimdVec::<f32>::iota();
//!     let b = SimdVec::broadcast(10.0f32);
//!
//!     let mask = a.simd_lt(SimdVec::broadcast(2.0));
//!     let picked = SimdVec::merge(a + b, b, mask);
//!
//!     let mut out = vec![0.0f32; n];
//!     picked.store(&mut out)?;
//!     assert_eq!(&out[..3], &[10.0, 11.0, 10.0]);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::large_stack_arrays,
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::cast_lossless,
        clippy::manual_assert
    )
)]

mod batch;
#[cfg(test)]
mod batch_tests;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod lane;
pub mod narrow;
pub mod simd_native;
pub mod vector;

pub use config::SimdConfig;
pub use error::{Result, SimdError};
pub use lane::{
    ConvertLanes, DemoteFloat, DemoteInt, Float, Indexable, Integer, Lane, Numeric, Promote,
    Signed,
};
pub use simd_native::{current_level, detect_and_bind, KernelRegistry, SimdLevel};
pub use vector::{Mask, SimdVec};

pub use half::{bf16, f16};
