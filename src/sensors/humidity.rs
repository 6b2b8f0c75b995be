//! Resistive soil humidity probe.
//!
//! The probe voltage rises with moisture; the averaged count is rescaled
//! linearly from `[0, 1023]` to `[0, 100]` percent.

use super::{ADC_MAX, map_range};

/// Convert an averaged raw count to percent, truncating.
pub fn to_percent(raw: u16) -> u8 {
    map_range(i32::from(raw.min(ADC_MAX)), 0, i32::from(ADC_MAX), 0, 100) as u8
}
