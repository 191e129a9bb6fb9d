//! Dispatch configuration.
//!
//! Sources are merged in increasing priority:
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. `SIMDLANE_*` environment variables.
//!
//! ```toml
//! # simdlane.toml
//! max_level = "avx2"
//! log_bindings = true
//! ```
//!
//! ```text
//! SIMDLANE_MAX_LEVEL=scalar cargo test
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimdError};
use crate::simd_native::SimdLevel;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SIMDLANE_";

/// Settings read once, when the kernel registry is bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimdConfig {
    /// Highest dispatch level the registry may bind. `None` binds the best
    /// level the CPU supports.
    pub max_level: Option<SimdLevel>,
    /// Emit a `debug` event for every operation that falls back to a slower
    /// kernel than the bound level.
    pub log_bindings: bool,
}

impl SimdConfig {
    /// Defaults merged with `SIMDLANE_*` environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self::base().merge(Env::prefixed(ENV_PREFIX)).extract()?)
    }

    /// Defaults, then the TOML file at `path`, then environment variables.
    ///
    /// A missing file is not an error; it contributes nothing.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::base()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?)
    }

    /// Defaults merged with an inline TOML document. Ignores the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::base().merge(Toml::string(toml)).extract()?)
    }

    /// Renders the configuration as a TOML document `from_toml_str` accepts.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| SimdError::Config(err.to_string()))
    }

    /// Highest level rank the registry may bind.
    ///
    /// Ranks rather than levels, so `max_level = "avx2"` on an aarch64 host
    /// still permits NEON (both rank 1).
    #[must_use]
    pub fn rank_cap(&self) -> u8 {
        self.max_level.map_or(u8::MAX, SimdLevel::rank)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }
}
