//! Outbound application events.
//!
//! The [`IrrigationService`](super::service::IrrigationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (serial console, log).

use core::fmt;

use crate::config::Thresholds;
use crate::counter::CounterEvent;
use crate::error::{CommandError, ThresholdField};
use crate::fsm::StateId;
use crate::sensors::Reading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state and thresholds).
    Started {
        state: StateId,
        thresholds: Thresholds,
    },

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The trigger policy switched the motor on.
    IrrigationStarted { humidity_pct: u8 },

    /// A timed irrigation run finished.
    IrrigationStopped,

    /// Maintenance motor test started.
    OverrideStarted { duration_ms: u32 },

    /// Maintenance motor test ended (`cancelled` = by `stopmotor`).
    OverrideFinished { cancelled: bool },

    /// Alert bitmask changed (0 = cleared).
    AlertChanged(u8),

    /// Periodic status line.
    Status(StatusReport),

    /// A threshold setter accepted a new value.
    ThresholdChanged { field: ThresholdField, value: i32 },

    /// Current thresholds, in reply to `show`.
    Configuration(Thresholds),

    /// A command line was rejected.  Nothing changed.
    CommandRejected(CommandError),

    /// Passenger counter activity.
    Counter(CounterEvent),
}

/// A point-in-time status snapshot, rendered like
/// `Humidity: 58% | Temp: 12.3 C (Max: 60) | Water Level: 300`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub state: StateId,
    pub reading: Reading,
    pub temp_max_c: u8,
    pub motor_on: bool,
    pub alert_flags: u8,
    /// `false` while the averaging window still holds startup zeros.
    pub warm: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Humidity: {}% | Temp: {:.1} C (Max: {}) | Water Level: {}",
            self.reading.humidity_pct,
            self.reading.temperature_c,
            self.temp_max_c,
            self.reading.water_level
        )
    }
}
