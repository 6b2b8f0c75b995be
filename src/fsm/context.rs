//! Shared mutable context threaded through every FSM handler.
//!
//! `ControlContext` is the "blackboard" the state handlers read from and
//! write to: the current averaged reading, the live thresholds, timing
//! bookkeeping, and the actuator commands the service applies after
//! each tick.

use crate::config::{SystemConfig, Thresholds};
use crate::sensors::Reading;

/// Why the motor is running under the trigger policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    LowHumidity,
}

/// Commands written by state handlers and the alert monitor; the
/// service applies them to the actuator port after every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    pub motor_on: bool,
    pub alert_led: bool,
}

impl ActuatorCommands {
    /// Everything off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

/// Irrigation trigger: dry soil, enough water, not too hot.
pub fn should_irrigate(reading: &Reading, thresholds: &Thresholds) -> bool {
    reading.humidity_pct < thresholds.humidity_pct()
        && reading.water_level > thresholds.water_level_raw()
        && reading.temperature_c <= f32::from(thresholds.temp_max_c())
}

pub struct ControlContext {
    // -- Timing --
    /// Uptime at the current tick (ms).  Set before every `Fsm::tick`.
    pub now_ms: u32,
    /// Uptime when the current state was entered.
    pub state_entered_ms: u32,
    /// Uptime of the last idle trigger evaluation.
    pub last_check_ms: u32,
    /// Uptime when the current (or last) irrigation run started.
    pub run_started_ms: u32,

    // -- Inputs --
    pub reading: Reading,
    /// `false` until the averaging window has been filled once.
    pub warm: bool,
    pub thresholds: Thresholds,
    pub config: SystemConfig,
    /// Set by `stopmotor`; consumed by the override state.
    pub cancel_override: bool,

    // -- Outputs --
    pub commands: ActuatorCommands,
    pub trigger: Option<TriggerReason>,
    /// Alert bitmask (see [`crate::alert::AlertKind`]).
    pub alert_flags: u8,
}

impl ControlContext {
    pub fn new(config: SystemConfig, thresholds: Thresholds) -> Self {
        Self {
            now_ms: 0,
            state_entered_ms: 0,
            last_check_ms: 0,
            run_started_ms: 0,
            reading: Reading::default(),
            warm: false,
            thresholds,
            config,
            cancel_override: false,
            commands: ActuatorCommands::all_off(),
            trigger: None,
            alert_flags: 0,
        }
    }

    /// Milliseconds since the current state was entered.
    pub fn ms_in_state(&self) -> u32 {
        self.now_ms.wrapping_sub(self.state_entered_ms)
    }

    /// `true` once a full check interval has passed since the last
    /// idle evaluation.
    pub fn check_due(&self) -> bool {
        self.now_ms.wrapping_sub(self.last_check_ms) >= self.config.check_interval_ms
    }

    pub fn alert_active(&self) -> bool {
        self.alert_flags != 0
    }
}
