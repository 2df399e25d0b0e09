//! Rounding shared by every derived watt value, TSS and zone bound.
//!
//! All rounding in the crate goes through [`round_half_up`] so that a value
//! like `385.5` lands on `386` no matter which calculation produced it.

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round a watt value, saturating at zero for negative or non-finite input.
pub fn round_watts(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    round_half_up(value) as u32
}
