//! Application service: the hexagonal core.
//!
//! [`IrrigationService`] owns the FSM, the averaging window, the alert
//! monitor, and the shared context.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │      IrrigationService       │
//! ActuatorPort ◀──│  Window · Alerts · FSM       │ ◀─▶ ThresholdStore
//!                 └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::alert::AlertMonitor;
use crate::config::{SystemConfig, Thresholds};
use crate::error::{CommandError, ThresholdField, ValidationError};
use crate::fsm::context::ControlContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::schedule::Interval;
use crate::sensors::averaging::SampleWindow;
use crate::sensors::Reading;

use super::commands::{parse_command, AppCommand};
use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, SensorPort, ThresholdStore};

pub struct IrrigationService {
    fsm: Fsm,
    ctx: ControlContext,
    window: SampleWindow,
    alerts: AlertMonitor,
    status: Interval,
}

impl IrrigationService {
    /// Construct the service.  Does **not** start the FSM; call
    /// [`start`](Self::start) next.
    pub fn new(config: SystemConfig, thresholds: Thresholds) -> Self {
        let status = Interval::new(config.status_interval_ms, 0);
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: ControlContext::new(config, thresholds),
            window: SampleWindow::new(),
            alerts: AlertMonitor::new(),
            status,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Idle`.  The first trigger evaluation is due one check
    /// interval after `now_ms`.
    pub fn start(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.ctx.last_check_ms = now_ms;
        self.status = Interval::new(self.ctx.config.status_interval_ms, now_ms);
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started {
            state: self.fsm.current_state(),
            thresholds: self.ctx.thresholds,
        });
        info!("IrrigationService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample → average → convert → alerts →
    /// FSM → actuators → periodic status.
    ///
    /// `hw` satisfies **both** [`SensorPort`] and [`ActuatorPort`]; this
    /// avoids a double mutable borrow while keeping the port boundary
    /// explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now_ms;

        // 1. Sample and smooth
        let averaged = self.window.push(hw.read_raw());
        self.ctx.reading = Reading::from_averaged(averaged);
        self.ctx.warm = self.window.is_warm();

        // 2. Alerts, independent of motor state
        let prev_flags = self.ctx.alert_flags;
        let flags = self.alerts.evaluate(&self.ctx.reading, &self.ctx.thresholds);
        self.ctx.alert_flags = flags;
        self.ctx.commands.alert_led = flags != 0;
        if flags != prev_flags {
            sink.emit(&AppEvent::AlertChanged(flags));
        }

        // 3. Trigger policy
        self.advance_fsm(sink);

        // 4. Outputs
        self.apply_actuators(hw);

        // 5. Status line
        if self.status.due(now_ms) {
            sink.emit(&AppEvent::Status(self.status_report()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Parse and execute one console line.  Any rejection is reported
    /// through `sink` as [`AppEvent::CommandRejected`] and returned.
    pub fn handle_line(
        &mut self,
        line: &str,
        now_ms: u32,
        hw: &mut impl ActuatorPort,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        match parse_command(line) {
            Ok(cmd) => self.handle_command(cmd, now_ms, hw, store, sink),
            Err(e) => {
                sink.emit(&AppEvent::CommandRejected(e));
                Err(e)
            }
        }
    }

    /// Execute a parsed command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        hw: &mut impl ActuatorPort,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        self.ctx.now_ms = now_ms;
        let result = match cmd {
            AppCommand::TestMotor => {
                self.start_override(sink);
                Ok(())
            }
            AppCommand::CancelOverride => {
                if self.fsm.current_state() == StateId::Override {
                    self.ctx.cancel_override = true;
                    self.advance_fsm(sink);
                } else {
                    info!("stopmotor: no motor test running");
                }
                Ok(())
            }
            AppCommand::SetHumidityThreshold(v) => self
                .set_humidity_threshold(v, store, sink)
                .map_err(CommandError::from),
            AppCommand::SetWaterLevelThreshold(v) => self
                .set_water_level_threshold(v, store, sink)
                .map_err(CommandError::from),
            AppCommand::SetTempMax(v) => self.set_temp_max(v, store, sink).map_err(CommandError::from),
            AppCommand::Show => {
                sink.emit(&AppEvent::Configuration(self.describe_configuration()));
                Ok(())
            }
        };

        if let Err(e) = result {
            sink.emit(&AppEvent::CommandRejected(e));
        }
        self.apply_actuators(hw);
        result
    }

    // ── Threshold configuration ───────────────────────────────

    /// Accepts 0–100; persisted immediately.
    pub fn set_humidity_threshold(
        &mut self,
        value: i32,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) -> Result<(), ValidationError> {
        self.ctx.thresholds.set_humidity(value)?;
        self.threshold_accepted(ThresholdField::Humidity, value, store, sink);
        Ok(())
    }

    /// Accepts 0–1023; persisted immediately.
    pub fn set_water_level_threshold(
        &mut self,
        value: i32,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) -> Result<(), ValidationError> {
        self.ctx.thresholds.set_water_level(value)?;
        self.threshold_accepted(ThresholdField::WaterLevel, value, store, sink);
        Ok(())
    }

    /// Accepts 10–80; persisted immediately.
    pub fn set_temp_max(
        &mut self,
        value: i32,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) -> Result<(), ValidationError> {
        self.ctx.thresholds.set_temp_max(value)?;
        self.threshold_accepted(ThresholdField::TempMax, value, store, sink);
        Ok(())
    }

    /// Snapshot of the live thresholds.
    pub fn describe_configuration(&self) -> Thresholds {
        self.ctx.thresholds
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Latest averaged reading in engineering units.
    pub fn reading(&self) -> Reading {
        self.ctx.reading
    }

    pub fn motor_on(&self) -> bool {
        self.ctx.commands.motor_on
    }

    pub fn alert_active(&self) -> bool {
        self.ctx.alert_active()
    }

    pub fn alert_flags(&self) -> u8 {
        self.ctx.alert_flags
    }

    /// `true` once the averaging window has been filled.
    pub fn is_warm(&self) -> bool {
        self.ctx.warm
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            state: self.fsm.current_state(),
            reading: self.ctx.reading,
            temp_max_c: self.ctx.thresholds.temp_max_c(),
            motor_on: self.ctx.commands.motor_on,
            alert_flags: self.ctx.alert_flags,
            warm: self.ctx.warm,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_override(&mut self, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        if prev == StateId::Override {
            info!("testmotor: motor test already running");
            return;
        }
        self.fsm.force_transition(StateId::Override, &mut self.ctx);
        sink.emit(&AppEvent::StateChanged {
            from: prev,
            to: StateId::Override,
        });
        if prev == StateId::Running {
            sink.emit(&AppEvent::IrrigationStopped);
        }
        sink.emit(&AppEvent::OverrideStarted {
            duration_ms: self.ctx.config.override_duration_ms,
        });
    }

    /// Tick the FSM at `ctx.now_ms` and report what changed.
    fn advance_fsm(&mut self, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        let cancelled = self.ctx.cancel_override;
        let Some(next) = self.fsm.tick(&mut self.ctx) else {
            return;
        };

        sink.emit(&AppEvent::StateChanged { from: prev, to: next });
        match (prev, next) {
            (StateId::Idle, StateId::Running) => sink.emit(&AppEvent::IrrigationStarted {
                humidity_pct: self.ctx.reading.humidity_pct,
            }),
            (StateId::Running, _) => sink.emit(&AppEvent::IrrigationStopped),
            (StateId::Override, _) => sink.emit(&AppEvent::OverrideFinished { cancelled }),
            _ => {}
        }
    }

    fn threshold_accepted(
        &mut self,
        field: ThresholdField,
        value: i32,
        store: &mut impl ThresholdStore,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = store.save(&self.ctx.thresholds) {
            warn!("{field}: saved in memory only, storage write failed ({e})");
        }
        sink.emit(&AppEvent::ThresholdChanged { field, value });
    }

    /// Translate context commands into port calls.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        hw.set_motor(self.ctx.commands.motor_on);
        hw.set_alert(self.ctx.commands.alert_led);
    }
}
