//! Alert monitor.
//!
//! Runs **every control cycle**, independent of the FSM and the motor
//! state, and keeps an alert bitmask.  The alert LED is lit while any
//! bit is set.  There is no latching and no hysteresis: each condition
//! is recomputed from the current averaged reading and thresholds.
//!
//! | Bit | Condition                                    |
//! |-----|----------------------------------------------|
//! | `WaterLow`        | `water_level <= water_level_threshold` |
//! | `OverTemperature` | `temperature_c > temp_max`             |

use core::fmt;

use log::{info, warn};

use crate::config::Thresholds;
use crate::sensors::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertKind {
    WaterLow = 0x01,
    OverTemperature = 0x02,
}

impl AlertKind {
    pub const ALL: [AlertKind; 2] = [Self::WaterLow, Self::OverTemperature];

    pub fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaterLow => write!(f, "water level low"),
            Self::OverTemperature => write!(f, "over temperature"),
        }
    }
}

/// Alert condition as a pure function of one reading.
pub fn alert_mask(reading: &Reading, thresholds: &Thresholds) -> u8 {
    let mut mask = 0;
    if reading.water_level <= thresholds.water_level_raw() {
        mask |= AlertKind::WaterLow.mask();
    }
    if reading.temperature_c > f32::from(thresholds.temp_max_c()) {
        mask |= AlertKind::OverTemperature.mask();
    }
    mask
}

#[derive(Debug, Default)]
pub struct AlertMonitor {
    flags: u8,
}

impl AlertMonitor {
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Recompute the bitmask and log every bit that changed.
    /// Returns the new bitmask.
    pub fn evaluate(&mut self, reading: &Reading, thresholds: &Thresholds) -> u8 {
        let next = alert_mask(reading, thresholds);
        for kind in AlertKind::ALL {
            let was = self.flags & kind.mask() != 0;
            let now = next & kind.mask() != 0;
            if now && !was {
                warn!("ALERT SET: {kind}");
            } else if was && !now {
                info!("ALERT CLEARED: {kind}");
            }
        }
        self.flags = next;
        next
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn is_active(&self) -> bool {
        self.flags != 0
    }

    pub fn has(&self, kind: AlertKind) -> bool {
        self.flags & kind.mask() != 0
    }
}
