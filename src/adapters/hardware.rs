//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  On non-espidf targets
//! the ADC reads come from the `hw_init` simulation atomics, and the
//! pins can be any `embedded-hal` output.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::alert_led::AlertLed;
use crate::drivers::motor::MotorDriver;
use crate::sensors::{SensorHub, SensorSample};

pub struct HardwareAdapter<M: OutputPin, L: OutputPin> {
    sensor_hub: SensorHub,
    motor: MotorDriver<M>,
    alert: AlertLed<L>,
}

impl<M: OutputPin, L: OutputPin> HardwareAdapter<M, L> {
    pub fn new(sensor_hub: SensorHub, motor: MotorDriver<M>, alert: AlertLed<L>) -> Self {
        Self {
            sensor_hub,
            motor,
            alert,
        }
    }

    pub fn motor(&self) -> &MotorDriver<M> {
        &self.motor
    }

    pub fn alert_led(&self) -> &AlertLed<L> {
        &self.alert
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<M: OutputPin, L: OutputPin> SensorPort for HardwareAdapter<M, L> {
    fn read_raw(&mut self) -> SensorSample {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<M: OutputPin, L: OutputPin> ActuatorPort for HardwareAdapter<M, L> {
    fn set_motor(&mut self, on: bool) {
        if on != self.motor.is_running() {
            self.motor.set(on);
        }
    }

    fn set_alert(&mut self, on: bool) {
        if on != self.alert.is_lit() {
            self.alert.set(on);
        }
    }

    fn all_off(&mut self) {
        self.motor.stop();
        self.alert.set(false);
    }
}
