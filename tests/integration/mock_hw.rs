//! Mock adapters for integration tests.
//!
//! Records every actuator call and every emitted event so tests can
//! assert on the full history without touching real GPIO or flash.

use irrigation::app::events::AppEvent;
use irrigation::app::ports::{ActuatorPort, ByteStorage, EventSink, SensorPort, StorageError};
use irrigation::sensors::SensorSample;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetMotor(bool),
    SetAlert(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensor and actuator side of the board.  `sample` is returned on
/// every read until the test changes it.
pub struct MockHardware {
    pub sample: SensorSample,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(humidity: u16, temperature: u16, water_level: u16) -> Self {
        Self {
            sample: SensorSample {
                humidity,
                temperature,
                water_level,
            },
            calls: Vec::new(),
        }
    }

    pub fn motor_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetMotor(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetAlert(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn alert_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetAlert(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetMotor(_) => None,
            })
            .unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> SensorSample {
        self.sample
    }
}

impl ActuatorPort for MockHardware {
    fn set_motor(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetMotor(on));
    }

    fn set_alert(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetAlert(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockEeprom ────────────────────────────────────────────────

/// 64-byte erased area.  `fail_writes` makes every write return
/// [`StorageError::IoError`].
pub struct MockEeprom {
    pub bytes: [u8; 64],
    pub writes: usize,
    pub fail_writes: bool,
}

impl MockEeprom {
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; 64],
            writes: 0,
            fail_writes: false,
        }
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStorage for MockEeprom {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let src = self
            .bytes
            .get(offset..offset + buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        let dst = self
            .bytes
            .get_mut(offset..offset + data.len())
            .ok_or(StorageError::OutOfBounds)?;
        dst.copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
