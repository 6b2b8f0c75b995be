//! System configuration parameters
//!
//! Two layers:
//! - [`Thresholds`]: the runtime-tunable trigger values, changed only by
//!   validated setters and persisted to byte storage.
//! - [`SystemConfig`]: compiled-in timing constants and persistence policy.

use serde::{Deserialize, Serialize};

use crate::error::{ThresholdField, ValidationError};

// ---------------------------------------------------------------------------
// Threshold domains
// ---------------------------------------------------------------------------

pub const HUMIDITY_MIN: i32 = 0;
pub const HUMIDITY_MAX: i32 = 100;
pub const WATER_LEVEL_MIN: i32 = 0;
pub const WATER_LEVEL_MAX: i32 = 1023;
pub const TEMP_MAX_MIN: i32 = 10;
pub const TEMP_MAX_MAX: i32 = 80;

pub const DEFAULT_HUMIDITY_THRESHOLD: u8 = 45;
pub const DEFAULT_WATER_LEVEL_THRESHOLD: u16 = 200;
pub const DEFAULT_TEMP_MAX: u8 = 60;

/// Trigger thresholds.  Every field is kept inside its domain by the
/// `set_*` methods; the fields are read-only outside this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    /// Irrigate when soil humidity (%) drops below this.
    humidity_pct: u8,
    /// Water reservoir must read above this (raw ADC) to irrigate.
    water_level_raw: u16,
    /// Irrigation is blocked and the alert raised above this (°C).
    temp_max_c: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            humidity_pct: DEFAULT_HUMIDITY_THRESHOLD,
            water_level_raw: DEFAULT_WATER_LEVEL_THRESHOLD,
            temp_max_c: DEFAULT_TEMP_MAX,
        }
    }
}

impl Thresholds {
    /// Build a validated set of thresholds.
    pub fn new(humidity: i32, water_level: i32, temp_max: i32) -> Result<Self, ValidationError> {
        let mut t = Self::default();
        t.set_humidity(humidity)?;
        t.set_water_level(water_level)?;
        t.set_temp_max(temp_max)?;
        Ok(t)
    }

    pub fn humidity_pct(&self) -> u8 {
        self.humidity_pct
    }

    pub fn water_level_raw(&self) -> u16 {
        self.water_level_raw
    }

    pub fn temp_max_c(&self) -> u8 {
        self.temp_max_c
    }

    /// Accepts 0–100.  On rejection the stored value is untouched.
    pub fn set_humidity(&mut self, value: i32) -> Result<(), ValidationError> {
        check(ThresholdField::Humidity, value, HUMIDITY_MIN, HUMIDITY_MAX)?;
        self.humidity_pct = value as u8;
        Ok(())
    }

    /// Accepts 0–1023.
    pub fn set_water_level(&mut self, value: i32) -> Result<(), ValidationError> {
        check(ThresholdField::WaterLevel, value, WATER_LEVEL_MIN, WATER_LEVEL_MAX)?;
        self.water_level_raw = value as u16;
        Ok(())
    }

    /// Accepts 10–80.
    pub fn set_temp_max(&mut self, value: i32) -> Result<(), ValidationError> {
        check(ThresholdField::TempMax, value, TEMP_MAX_MIN, TEMP_MAX_MAX)?;
        self.temp_max_c = value as u8;
        Ok(())
    }
}

fn check(field: ThresholdField, value: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError {
            field,
            value,
            min,
            max,
        })
    }
}

// ---------------------------------------------------------------------------
// Persistence policy
// ---------------------------------------------------------------------------

/// Byte layout used for thresholds in non-volatile storage.
/// See [`crate::persist`] for the exact offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersistLayout {
    /// Water level as a 2-byte little-endian field.  Lossless.
    #[default]
    Wide,
    /// One byte per field; the water threshold keeps only its low byte.
    SingleByte,
    /// One byte per field; the water threshold is stored divided by 4.
    Quarter,
}

/// Where thresholds come from at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdSource {
    /// Load what was last persisted (defaults for missing/invalid fields).
    #[default]
    Stored,
    /// Ignore storage, use defaults and write them back.
    ForceDefaults,
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control cycle period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Minimum spacing of trigger evaluations while idle (milliseconds).
    pub check_interval_ms: u32,
    /// How long an irrigation run keeps the motor on (milliseconds).
    pub motor_duration_ms: u32,
    /// How long the `testmotor` maintenance override runs (milliseconds).
    pub override_duration_ms: u32,
    /// Status report period (milliseconds).
    pub status_interval_ms: u32,

    // --- Persistence ---
    pub persist_layout: PersistLayout,
    pub threshold_source: ThresholdSource,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            control_loop_interval_ms: 1000,
            check_interval_ms: 10_000,
            motor_duration_ms: 5000,
            override_duration_ms: 5000,
            status_interval_ms: 5000,

            persist_layout: PersistLayout::Wide,
            threshold_source: ThresholdSource::Stored,
        }
    }
}
