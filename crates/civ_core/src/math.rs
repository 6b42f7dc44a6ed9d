//! Fixed-point math utilities for deterministic simulation.
//!
//! Combat resolution runs entirely in fixed-point arithmetic so the
//! same inputs round to the same integer damage on every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// One quarter, the step size of terrain and building defense bonuses.
pub const QUARTER: Fixed = Fixed::from_bits(1 << 30);

/// Build a defense modifier from a count of quarter steps.
#[must_use]
pub fn quarters(steps: u32) -> Fixed {
    QUARTER.saturating_mul(Fixed::saturating_from_num(steps))
}

/// Round to the nearest integer (half away from zero) and clamp into `u32`.
///
/// Negative values clamp to zero.
#[must_use]
pub fn round_to_u32(value: Fixed) -> u32 {
    value.saturating_round().saturating_to_num::<u32>()
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}
