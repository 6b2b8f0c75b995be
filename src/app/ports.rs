//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IrrigationService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks, storage) implement these
//! traits.  The [`IrrigationService`](super::service::IrrigationService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::Thresholds;
use crate::sensors::SensorSample;

pub use crate::error::StorageError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw sample of every analog channel per cycle.
/// Reads always succeed; there is no sensor fault detection.
pub trait SensorPort {
    fn read_raw(&mut self) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    /// Switch the irrigation motor.
    fn set_motor(&mut self, on: bool);

    /// Switch the alert LED.
    fn set_alert(&mut self, on: bool);

    /// Motor and LED off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → serial console / log)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Byte storage port (driven adapter: domain ↔ EEPROM-style area)
// ───────────────────────────────────────────────────────────────

/// Small byte-addressed non-volatile area, EEPROM style.
///
/// Writes are synchronous.  Bytes never written read back as `0xFF`
/// (erased flash); callers validate what they load.
pub trait ByteStorage {
    /// Size of the addressable area in bytes.
    fn capacity(&self) -> usize;

    /// Fill `buf` from `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    fn read_u8(&self, offset: usize) -> Result<u8, StorageError> {
        let mut b = [0u8; 1];
        self.read(offset, &mut b)?;
        Ok(b[0])
    }

    fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), StorageError> {
        self.write(offset, &[value])
    }

    /// Two bytes, little-endian (low byte at `offset`).
    fn read_u16_le(&self, offset: usize) -> Result<u16, StorageError> {
        let mut b = [0u8; 2];
        self.read(offset, &mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    fn write_u16_le(&mut self, offset: usize, value: u16) -> Result<(), StorageError> {
        self.write(offset, &value.to_le_bytes())
    }
}

// ───────────────────────────────────────────────────────────────
// Threshold store port (domain ↔ persisted configuration)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the trigger thresholds.
///
/// Implementations only ever receive validated [`Thresholds`]; on load
/// they must return values inside every field's domain.
pub trait ThresholdStore {
    fn load(&self) -> Result<Thresholds, StorageError>;

    fn save(&mut self, thresholds: &Thresholds) -> Result<(), StorageError>;
}
