//! Tests for `SimdError` display strings and helpers.

use super::error::{ensure_len, ensure_same_len, SimdError};
use crate::simd_native::SimdLevel;

#[test]
fn test_error_display_insufficient_length() {
    let err = SimdError::InsufficientLength {
        needed: 8,
        available: 3,
    };
    assert_eq!(err.to_string(), "Buffer too short: need 8 lanes, got 3");
}

#[test]
fn test_error_display_unsupported_level() {
    let err = SimdError::UnsupportedLevel(SimdLevel::Avx512);
    assert_eq!(err.to_string(), "SIMD level avx512 is not supported on this CPU");
}

#[test]
fn test_error_display_index_out_of_bounds() {
    let err = SimdError::IndexOutOfBounds { index: -1, len: 4 };
    assert_eq!(
        err.to_string(),
        "Index -1 out of bounds for slice of length 4"
    );
}

#[test]
fn test_ensure_len() {
    assert!(ensure_len(4, 4).is_ok());
    assert!(ensure_len(4, 9).is_ok());
    assert_eq!(
        ensure_len(4, 2),
        Err(SimdError::InsufficientLength {
            needed: 4,
            available: 2
        })
    );
}

#[test]
fn test_ensure_same_len() {
    assert!(ensure_same_len(5, 5).is_ok());
    assert_eq!(
        ensure_same_len(5, 6),
        Err(SimdError::LengthMismatch { left: 5, right: 6 })
    );
}

#[test]
fn test_error_from_figment() {
    let err: SimdError = figment::Error::from("bad value".to_string()).into();
    assert!(matches!(err, SimdError::Config(msg) if msg.contains("bad value")));
}
