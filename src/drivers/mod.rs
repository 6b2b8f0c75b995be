//! Actuator drivers, hardware initialisation, and input helpers.

pub mod alert_led;
pub mod button;
pub mod hw_init;
pub mod motor;
