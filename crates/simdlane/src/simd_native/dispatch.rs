//! Runtime SIMD level detection and kernel binding.
//!
//! This module provides:
//! - `SimdLevel` for representing a dispatch level
//! - `CpuFeatures` / `cpu_features()` for the cached feature probe
//! - `KernelRegistry`, the per-level table of kernel function pointers
//! - `detect_and_bind()` for the process-wide registry, bound exactly once

use std::fmt;
use std::mem::size_of;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::kernels::{
    ArithSet, ByteKernels, ConvertSet, FloatSet, GatherSet, IntSet, ShuffleSet, SignedSet,
};
use super::scalar;
use crate::config::SimdConfig;
use crate::error::{Result, SimdError};
use crate::lane::{Float, Lane};

// =============================================================================
// Dispatch level
// =============================================================================

/// SIMD capability level a registry is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    /// Portable fallback emulating a 128-bit register.
    Scalar,
    /// 128-bit ARM NEON (aarch64).
    Neon,
    /// 256-bit AVX2 + FMA (x86_64).
    Avx2,
    /// 512-bit AVX-512F (x86_64).
    Avx512,
}

impl SimdLevel {
    /// Every level, best first.
    pub const ALL: [Self; 4] = [Self::Avx512, Self::Avx2, Self::Neon, Self::Scalar];

    /// Ordering used for capping: `Scalar < Neon = Avx2 < Avx512`.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Scalar => 0,
            Self::Neon | Self::Avx2 => 1,
            Self::Avx512 => 2,
        }
    }

    /// Register width in bytes.
    #[inline]
    #[must_use]
    pub const fn vector_bytes(self) -> usize {
        match self {
            Self::Scalar | Self::Neon => 16,
            Self::Avx2 => 32,
            Self::Avx512 => 64,
        }
    }

    /// Lowercase name, as accepted by configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Neon => "neon",
            Self::Avx2 => "avx2",
            Self::Avx512 => "avx512",
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CPU feature probe
// =============================================================================

/// CPU features relevant to kernel selection.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    /// AVX2 integer and float 256-bit operations.
    pub avx2: bool,
    /// Fused multiply-add.
    pub fma: bool,
    /// Hardware f32 <-> f16 conversion.
    pub f16c: bool,
    /// AVX-512 Foundation.
    pub avx512f: bool,
    /// AVX-512 byte/word operations.
    pub avx512bw: bool,
    /// ARM Advanced SIMD.
    pub neon: bool,
}

impl CpuFeatures {
    /// Probes the running CPU. Unknown architectures report no features.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = Self::default();

        #[cfg(target_arch = "x86_64")]
        {
            features.avx2 = is_x86_feature_detected!("avx2");
            features.fma = is_x86_feature_detected!("fma");
            features.f16c = is_x86_feature_detected!("f16c");
            features.avx512f = is_x86_feature_detected!("avx512f");
            features.avx512bw = is_x86_feature_detected!("avx512bw");
        }

        #[cfg(target_arch = "aarch64")]
        {
            features.neon = std::arch::is_aarch64_feature_detected!("neon");
        }

        features
    }

    /// Whether every kernel of `level` can run with these features.
    #[must_use]
    pub const fn supports(&self, level: SimdLevel) -> bool {
        match level {
            SimdLevel::Scalar => true,
            SimdLevel::Neon => self.neon,
            SimdLevel::Avx2 => self.avx2 && self.fma,
            SimdLevel::Avx512 => self.avx512f && self.avx2 && self.fma,
        }
    }

    /// Best level these features support, not ranked above `rank_cap`.
    #[must_use]
    pub fn best_level(&self, rank_cap: u8) -> SimdLevel {
        SimdLevel::ALL
            .into_iter()
            .find(|level| level.rank() <= rank_cap && self.supports(*level))
            .unwrap_or(SimdLevel::Scalar)
    }
}

static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Cached CPU feature probe.
#[inline]
#[must_use]
pub fn cpu_features() -> CpuFeatures {
    *CPU_FEATURES.get_or_init(CpuFeatures::detect)
}

// =============================================================================
// Kernel registry
// =============================================================================

/// Kernel function pointers for every `{operation, element type}` pair.
///
/// Tables start out fully scalar; a backend then overwrites the entries it
/// implements. An entry is therefore never unbound, and any operation a
/// backend lacks silently runs on the scalar kernel.
#[derive(Clone)]
pub struct KernelRegistry {
    level: SimdLevel,
    features: CpuFeatures,
    /// Arithmetic, comparison and reduction kernels.
    pub arith: ArithSet,
    /// Negation and absolute value.
    pub signed: SignedSet,
    /// Integer shifts.
    pub int: IntSet,
    /// Division, square root, multiply-add.
    pub float: FloatSet,
    /// Reverse and interleave.
    pub shuffle: ShuffleSet,
    /// Gather and scatter.
    pub gather: GatherSet,
    /// Width and representation changes.
    pub convert: ConvertSet,
    /// Bitwise operations, blends and mask queries.
    pub bytes: ByteKernels,
}

impl KernelRegistry {
    /// Registry with only portable kernels. Always available.
    #[must_use]
    pub fn scalar() -> Self {
        Self {
            level: SimdLevel::Scalar,
            features: cpu_features(),
            arith: scalar::arith_set(),
            signed: scalar::signed_set(),
            int: scalar::int_set(),
            float: scalar::float_set(),
            shuffle: scalar::shuffle_set(),
            gather: scalar::gather_set(),
            convert: scalar::convert_set(),
            bytes: scalar::byte_kernels(),
        }
    }

    /// Registry bound to `level`, independent of the process-wide one.
    ///
    /// # Errors
    ///
    /// Returns [`SimdError::UnsupportedLevel`] if this CPU cannot run `level`.
    pub fn for_level(level: SimdLevel) -> Result<Self> {
        let features = cpu_features();
        if !features.supports(level) {
            return Err(SimdError::UnsupportedLevel(level));
        }
        Ok(Self::build(level, features, false))
    }

    /// Registry for the best level this CPU supports within `config`.
    #[must_use]
    pub fn detect(config: &SimdConfig) -> Self {
        let features = cpu_features();
        let level = features.best_level(config.rank_cap());
        Self::build(level, features, config.log_bindings)
    }

    /// Levels this CPU can run, best first.
    #[must_use]
    pub fn supported_levels() -> Vec<SimdLevel> {
        let features = cpu_features();
        SimdLevel::ALL
            .into_iter()
            .filter(|level| features.supports(*level))
            .collect()
    }

    #[allow(unused_variables)]
    fn build(level: SimdLevel, features: CpuFeatures, log_bindings: bool) -> Self {
        let mut reg = Self::scalar();
        reg.level = level;
        reg.features = features;

        match level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => {
                // Callers only pass levels `features.supports()`.
                super::x86_avx2::bind(&mut reg);
                super::x86_avx2_convert::bind(&mut reg);
            }
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx512 => {
                super::x86_avx2::bind(&mut reg);
                super::x86_avx2_convert::bind(&mut reg);
                super::x86_avx512::bind(&mut reg);
            }
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => {
                super::neon::bind(&mut reg);
                super::neon_convert::bind(&mut reg);
            }
            _ => {}
        }

        if log_bindings {
            reg.log_fallbacks();
        }
        reg
    }

    fn log_fallbacks(&self) {
        let level = self.level;
        match level {
            SimdLevel::Scalar => {}
            SimdLevel::Neon => {
                debug!(%level, op = "promote/demote f16", "Using scalar kernel");
                debug!(%level, op = "mul i64/u64", "Using scalar kernel");
            }
            SimdLevel::Avx2 | SimdLevel::Avx512 => {
                if !self.features.f16c {
                    debug!(%level, op = "promote/demote f16", "Using scalar kernel: f16c missing");
                }
                if level == SimdLevel::Avx512 && !self.features.avx512bw {
                    debug!(%level, op = "8/16-bit lanes", "Using AVX2 kernels: avx512bw missing");
                }
                debug!(%level, op = "convert i64/f64", "Using scalar kernel");
                debug!(%level, op = "scatter", "Using scalar kernel");
            }
        }
    }

    /// Dispatch level the kernels were bound for.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> SimdLevel {
        self.level
    }

    /// Feature probe the registry was built from.
    #[inline]
    #[must_use]
    pub const fn features(&self) -> CpuFeatures {
        self.features
    }

    /// Register width in bytes.
    #[inline]
    #[must_use]
    pub const fn vector_bytes(&self) -> usize {
        self.level.vector_bytes()
    }

    /// Lanes of `T` per register.
    #[inline]
    #[must_use]
    pub const fn lanes<T: Lane>(&self) -> usize {
        self.level.vector_bytes() / size_of::<T>()
    }

    /// Whether `mul_add` / `mul_sub` / `neg_mul_add` on `T` round once.
    #[inline]
    #[must_use]
    pub fn fused_mul_add<T: Float>(&self) -> bool {
        T::float(self).fused
    }
}

impl fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelRegistry")
            .field("level", &self.level)
            .field("vector_bytes", &self.vector_bytes())
            .field("fused_mul_add", &self.float.f32.fused)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

static REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();

static SCALAR_REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();

fn bind(config: &SimdConfig) -> KernelRegistry {
    let reg = KernelRegistry::detect(config);
    info!(
        level = %reg.level(),
        vector_bytes = reg.vector_bytes(),
        fused_mul_add = reg.float.f32.fused,
        "SIMD kernels bound"
    );
    reg
}

/// Returns the process-wide registry, binding it on first use.
///
/// The first call reads [`SimdConfig::load`]; an invalid configuration is
/// logged and replaced by the defaults.
#[inline]
pub fn detect_and_bind() -> &'static KernelRegistry {
    REGISTRY.get_or_init(|| {
        let config = SimdConfig::load().unwrap_or_else(|err| {
            warn!(error = %err, "Invalid SIMD configuration, using defaults");
            SimdConfig::default()
        });
        bind(&config)
    })
}

/// Binds the process-wide registry with an explicit configuration.
///
/// Has no effect once the registry is bound; the existing one is returned.
pub fn bind_with_config(config: &SimdConfig) -> &'static KernelRegistry {
    REGISTRY.get_or_init(|| bind(config))
}

/// Level of the process-wide registry.
#[inline]
#[must_use]
pub fn current_level() -> SimdLevel {
    detect_and_bind().level()
}

/// Shared scalar-only registry, used for tails of slice operations.
#[inline]
pub(crate) fn scalar_registry() -> &'static KernelRegistry {
    SCALAR_REGISTRY.get_or_init(KernelRegistry::scalar)
}

/// Binds the registry and runs a few vector operations.
///
/// Call at startup so the first real operation does not pay for binding.
///
/// # Example
///
/// ```
/// simdlane::simd_native::warmup();
/// assert!(simdlane::SimdVec::<f32>::lanes() >= 4);
/// ```
pub fn warmup() {
    use crate::vector::SimdVec;

    let reg = detect_and_bind();
    let a = SimdVec::<f32>::iota();
    let b = SimdVec::<f32>::broadcast(0.5);
    for _ in 0..3 {
        let c = a.mul_add(b, a);
        let _ = c.reduce_sum();
    }
    debug!(level = %reg.level(), "SIMD warmup done");
}
