//! Linear analog temperature sensor (TMP36 class).
//!
//! 0.5 V offset at 0 °C, 10 mV/°C slope, read against a 5 V reference
//! on the 10-bit scale.

const V_REF: f32 = 5.0;
const ADC_FULL_SCALE: f32 = 1023.0;
const OFFSET_V: f32 = 0.5;
const DEGREES_PER_VOLT: f32 = 100.0;

/// Convert an averaged raw count to °C.
pub fn to_celsius(raw: u16) -> f32 {
    let voltage = f32::from(raw) * (V_REF / ADC_FULL_SCALE);
    (voltage - OFFSET_V) * DEGREES_PER_VOLT
}
