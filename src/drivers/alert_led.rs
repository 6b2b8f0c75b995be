//! Alert LED driver (single discrete LED, active HIGH).
//!
//! Lit while the alert monitor reports low water or over-temperature.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct AlertLed<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> AlertLed<P> {
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, lit: true };
        led.set(false);
        led
    }

    pub fn set(&mut self, lit: bool) {
        let res = if lit { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.lit = lit,
            Err(_) => warn!("alert_led: pin write failed"),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
