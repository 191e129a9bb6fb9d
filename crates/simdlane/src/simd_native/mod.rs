//! Runtime-dispatched SIMD kernels.
//!
//! # Module Structure
//!
//! - `kernels`: kernel signatures and the per-type tables
//! - `scalar`: portable kernels every table starts from
//! - `lane_loop`: register-loop macros shared by the hardware backends
//! - `x86_avx2` / `x86_avx2_convert`: AVX2+FMA(+F16C) kernels (x86_64 only)
//! - `x86_avx512`: AVX-512F/BW kernels layered over AVX2 (x86_64 only)
//! - `neon` / `neon_convert`: ARM NEON kernels (aarch64 only)
//! - `dispatch`: feature detection, level selection and the process-wide registry
//!
//! | level | register | selected when |
//! |---|---|---|
//! | AVX-512 | 64 bytes | `avx512f`, `avx2` and `fma` detected |
//! | AVX2 | 32 bytes | `avx2` and `fma` detected |
//! | NEON | 16 bytes | aarch64 |
//! | Scalar | 16 bytes | always |
#![allow(clippy::doc_markdown)] // Contains ISA/architecture nomenclature in docs.
#![allow(clippy::missing_panics_doc)] // Kernels only `debug_assert!` their step contract.

// =============================================================================
// Shared submodules
// =============================================================================

pub mod kernels;
mod lane_loop;
mod scalar;

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: Kernels only touch `lanes` elements behind each pointer; callers pass
//   register blocks or slices proven to hold that many.
// - Condition 2: Target-featured functions are only reachable through a registry built
//   for a level that `CpuFeatures::supports`; optional features (f16c, avx512bw) are
//   checked again before their kernels are bound.
// - Condition 3: All loads and stores use unaligned intrinsics (`*_loadu_*`, `vld1q_*`).
// Reason: Intrinsics and raw pointers are required to reach every ISA from one
// generic façade.

// =============================================================================
// ISA kernel submodules
// =============================================================================

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "x86_64")]
mod x86_avx2_convert;

#[cfg(target_arch = "x86_64")]
mod x86_avx512;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "aarch64")]
mod neon_convert;

// =============================================================================
// Dispatch module (public API)
// =============================================================================

mod dispatch;

pub(crate) use dispatch::scalar_registry;
pub use dispatch::{
    bind_with_config, cpu_features, current_level, detect_and_bind, warmup, CpuFeatures,
    KernelRegistry, SimdLevel,
};

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================


#[cfg(test)]
mod scalar_tests;
