//! Single-ended analog input on ADC1.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the oneshot ADC channel configured by `hw_init`,
//! rescaled to the 10-bit `[0, 1023]` domain.
//! On host/test: reads the per-channel simulation value, injectable via
//! [`crate::drivers::hw_init::sim_set_adc`].

use crate::drivers::hw_init;

use super::ADC_MAX;

pub struct AnalogInput {
    channel: u32,
}

impl AnalogInput {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    /// Sample the channel.  Values are clamped to the 10-bit domain.
    pub fn read(&mut self) -> u16 {
        hw_init::adc_read(self.channel).min(ADC_MAX)
    }
}
