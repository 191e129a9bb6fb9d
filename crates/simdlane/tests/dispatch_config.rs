//! Binding the process-wide registry from an explicit configuration.
//!
//! Lives in its own test binary: the registry binds once per process.

use simdlane::simd_native::bind_with_config;
use simdlane::{current_level, SimdConfig, SimdLevel, SimdVec};

#[test]
fn test_capped_config_binds_scalar_registry() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = SimdConfig {
        max_level: Some(SimdLevel::Scalar),
        log_bindings: true,
    };
    let reg = bind_with_config(&config);

    assert_eq!(reg.level(), SimdLevel::Scalar);
    assert_eq!(current_level(), SimdLevel::Scalar);
    assert_eq!(SimdVec::<f32>::lanes(), 4);
    assert_eq!(SimdVec::<u8>::lanes(), 16);
    assert!(!reg.fused_mul_add::<f32>());

    // Later configurations do not rebind.
    let again = bind_with_config(&SimdConfig::default());
    assert!(std::ptr::eq(reg, again));
}
