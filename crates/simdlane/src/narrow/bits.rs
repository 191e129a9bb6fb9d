//! Bit-exact scalar conversions between f32 and the 16-bit float formats.
//!
//! These are the reference every vector kernel must reproduce:
//!
//! | conversion | rule |
//! |---|---|
//! | f32 → f16 | round to nearest even on the 13 dropped bits, overflow → ±inf, below half the smallest subnormal → ±0, NaN → quiet NaN with truncated payload |
//! | f16 → f32 | exact; subnormals renormalized, NaN payload kept with the quiet bit set |
//! | f32 → bf16 | `(bits + 0x7FFF + lsb) >> 16`; NaN → `(bits >> 16) \| 0x0040` |
//! | bf16 → f32 | `bits << 16` |

// Reason: every cast below extracts a bit field that fits the target width.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

const F32_EXP_MASK: u32 = 0x7F80_0000;
const F32_MAN_MASK: u32 = 0x007F_FFFF;
const F16_INF: u16 = 0x7C00;
const F16_QUIET_NAN: u16 = 0x7E00;

/// Rounds `value` to the nearest IEEE binary16 and returns its bit pattern.
#[must_use]
pub const fn f32_to_f16_bits(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = ((x >> 16) & 0x8000) as u16;
    let exp = (x & F32_EXP_MASK) >> 23;
    let man = x & F32_MAN_MASK;

    if exp == 0xFF {
        if man == 0 {
            return sign | F16_INF;
        }
        return sign | F16_QUIET_NAN | (man >> 13) as u16;
    }

    let half_exp = exp as i32 - 127 + 15;
    if half_exp >= 0x1F {
        return sign | F16_INF;
    }

    if half_exp <= 0 {
        // Below half the smallest subnormal.
        if half_exp < -10 {
            return sign;
        }
        let m = man | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let round_bit = 1u32 << (shift - 1);
        let mut half_man = m >> shift;
        // Round bit set and (sticky bits or odd result).
        if (m & round_bit) != 0 && (m & (3 * round_bit - 1)) != 0 {
            half_man += 1;
        }
        return sign | half_man as u16;
    }

    let bits = ((half_exp as u32) << 10) | (man >> 13);
    let round_bit = 0x0000_1000;
    if (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0 {
        // A carry out of the mantissa bumps the exponent; 0x7BFF + 1 is inf.
        sign | (bits + 1) as u16
    } else {
        sign | bits as u16
    }
}

/// Widens an IEEE binary16 bit pattern to f32. Exact for every input.
#[must_use]
pub const fn f16_bits_to_f32(h: u16) -> f32 {
    let sign = ((h & 0x8000) as u32) << 16;
    let exp = ((h >> 10) & 0x1F) as u32;
    let man = (h & 0x03FF) as u32;

    if h & 0x7FFF == 0 {
        return f32::from_bits(sign);
    }

    if exp == 0x1F {
        if man == 0 {
            return f32::from_bits(sign | F32_EXP_MASK);
        }
        return f32::from_bits(sign | 0x7FC0_0000 | (man << 13));
    }

    if exp == 0 {
        // Subnormal: shift the leading one into the implicit position.
        let e = man.leading_zeros() - 22;
        let exp32 = (127 - 15 - e) << 23;
        let man32 = (man << (14 + e)) & F32_MAN_MASK;
        return f32::from_bits(sign | exp32 | man32);
    }

    f32::from_bits(sign | ((exp + 127 - 15) << 23) | (man << 13))
}

/// Rounds `value` to the nearest bfloat16 and returns its bit pattern.
#[must_use]
pub const fn f32_to_bf16_bits(value: f32) -> u16 {
    let x = value.to_bits();
    if (x & 0x7FFF_FFFF) > F32_EXP_MASK {
        return ((x >> 16) | 0x0040) as u16;
    }
    let lsb = (x >> 16) & 1;
    ((x + 0x7FFF + lsb) >> 16) as u16
}

/// Widens a bfloat16 bit pattern to f32.
#[inline]
#[must_use]
pub const fn bf16_bits_to_f32(b: u16) -> f32 {
    f32::from_bits((b as u32) << 16)
}
