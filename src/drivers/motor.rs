//! Irrigation pump motor driver.
//!
//! The motor is switched through a logic-level MOSFET or relay on one
//! digital output: HIGH = running.  No speed control.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator.  Whether the motor may run is decided
//! by the control FSM; this module only mirrors the commanded level.
//!
//! Generic over any `embedded-hal` output pin so the same driver runs on
//! an `esp-idf-hal` `PinDriver` and on a host-side mock.

use embedded_hal::digital::OutputPin;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running,
}

pub struct MotorDriver<P: OutputPin> {
    pin: P,
    state: MotorState,
}

impl<P: OutputPin> MotorDriver<P> {
    /// Take ownership of the pin and drive it LOW.
    pub fn new(pin: P) -> Self {
        let mut driver = Self {
            pin,
            state: MotorState::Running,
        };
        driver.stop();
        driver
    }

    pub fn start(&mut self) {
        if self.pin.set_high().is_err() {
            warn!("motor: failed to drive pin HIGH");
            return;
        }
        self.state = MotorState::Running;
    }

    pub fn stop(&mut self) {
        if self.pin.set_low().is_err() {
            warn!("motor: failed to drive pin LOW");
            return;
        }
        self.state = MotorState::Stopped;
    }

    pub fn set(&mut self, on: bool) {
        if on {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MotorState::Running
    }
}
