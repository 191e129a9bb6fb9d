//! Widening dot products and 2x2 matmul tiles over 16-bit float inputs.
//!
//! Products and sums run in f32. Lanes are summed per accumulator and
//! folded at the end, so results can differ in the last bits from a scalar
//! left-to-right loop.

use super::NarrowFloat;
use crate::error::{ensure_same_len, Result};
use crate::vector::SimdVec;

/// Widens both halves of `a` and `b`, accumulating the lower-half products
/// into the returned vector (`sum0 + a_lo * b_lo`) and the upper-half
/// products into `sum1`.
///
/// The two accumulators hold an unspecified interleaving of the products;
/// only `(sum0 + sum1).reduce_sum()` is meaningful.
#[must_use]
pub fn widen_mul_accumulate<N: NarrowFloat>(
    a: SimdVec<N>,
    b: SimdVec<N>,
    sum0: SimdVec<f32>,
    sum1: &mut SimdVec<f32>,
) -> SimdVec<f32> {
    let hi = a.promote_upper::<f32>().mul_add(b.promote_upper::<f32>(), *sum1);
    *sum1 = hi;
    a.promote_lower::<f32>().mul_add(b.promote_lower::<f32>(), sum0)
}

/// `sum(a[i] * b[i])` accumulated in f32.
///
/// # Errors
///
/// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
/// if the slices differ in length.
pub fn dot<N: NarrowFloat>(a: &[N], b: &[N]) -> Result<f32> {
    ensure_same_len(a.len(), b.len())?;
    let step = SimdVec::<N>::lanes();
    let mut sum0 = SimdVec::<f32>::zero();
    let mut sum1 = SimdVec::<f32>::zero();

    let mut a_chunks = a.chunks_exact(step);
    let mut b_chunks = b.chunks_exact(step);
    for (ca, cb) in a_chunks.by_ref().zip(b_chunks.by_ref()) {
        sum0 = widen_mul_accumulate(
            SimdVec::load_prefix(ca),
            SimdVec::load_prefix(cb),
            sum0,
            &mut sum1,
        );
    }

    let tail: f32 = a_chunks
        .remainder()
        .iter()
        .zip(b_chunks.remainder())
        .map(|(x, y)| x.to_f32_exact() * y.to_f32_exact())
        .sum();
    Ok((sum0 + sum1).reduce_sum() + tail)
}

/// `c[i][j] += dot(a[i], b[j])` for a 2x2 output tile.
///
/// `b` holds the two columns of the right-hand operand, each stored
/// contiguously.
///
/// # Errors
///
/// Returns [`SimdError::LengthMismatch`](crate::SimdError::LengthMismatch)
/// if the four rows and columns are not all the same length. `c` is left
/// untouched in that case.
pub fn matmul_2x2_accumulate<N: NarrowFloat>(
    a: [&[N]; 2],
    b: [&[N]; 2],
    c: &mut [[f32; 2]; 2],
) -> Result<()> {
    let k = a[0].len();
    for row in a.iter().chain(&b) {
        ensure_same_len(k, row.len())?;
    }

    let mut tile = [[0.0f32; 2]; 2];
    for (i, row) in a.iter().enumerate() {
        for (j, col) in b.iter().enumerate() {
            tile[i][j] = dot(row, col)?;
        }
    }
    for (c_row, t_row) in c.iter_mut().zip(tile) {
        for (out, t) in c_row.iter_mut().zip(t_row) {
            *out += t;
        }
    }
    Ok(())
}
