//! IrrigationService driven end-to-end through mock adapters.
//!
//! Default timing: control tick 1 s, trigger check every 10 s, irrigation
//! run 5 s, motor test 5 s, status line every 5 s.

use irrigation::alert::AlertKind;
use irrigation::app::events::AppEvent;
use irrigation::app::ports::ThresholdStore;
use irrigation::app::service::IrrigationService;
use irrigation::config::{PersistLayout, SystemConfig, ThresholdSource, Thresholds};
use irrigation::error::{CommandError, ThresholdField, ValidationError};
use irrigation::fsm::StateId;
use irrigation::persist::{self, StoredThresholds};

use crate::mock_hw::{MockEeprom, MockHardware, RecordingSink};

// Raw counts: 300 → 29 %, 600 → 58 %; 150 → 23.3 °C, 400 → 145.5 °C.
const DRY: u16 = 300;
const WET: u16 = 600;
const MILD: u16 = 150;
const HOT: u16 = 400;
const FULL: u16 = 600;
const LOW: u16 = 150;

struct Rig {
    app: IrrigationService,
    hw: MockHardware,
    store: StoredThresholds<MockEeprom>,
    sink: RecordingSink,
}

impl Rig {
    fn new(humidity: u16, temperature: u16, water_level: u16) -> Self {
        Self::with_layout(humidity, temperature, water_level, PersistLayout::Wide)
    }

    fn with_layout(humidity: u16, temperature: u16, water_level: u16, layout: PersistLayout) -> Self {
        let mut rig = Self {
            app: IrrigationService::new(SystemConfig::default(), Thresholds::default()),
            hw: MockHardware::new(humidity, temperature, water_level),
            store: StoredThresholds::new(MockEeprom::new(), layout),
            sink: RecordingSink::new(),
        };
        rig.app.start(0, &mut rig.sink);
        rig
    }

    /// Tick once per second over `(from, to]`.
    fn run_until(&mut self, from_ms: u32, to_ms: u32) {
        let mut now = from_ms + 1000;
        while now <= to_ms {
            self.app.tick(now, &mut self.hw, &mut self.sink);
            now += 1000;
        }
    }

    fn line(&mut self, line: &str, now_ms: u32) -> Result<(), CommandError> {
        self.app
            .handle_line(line, now_ms, &mut self.hw, &mut self.store, &mut self.sink)
    }
}

// ── Trigger policy ────────────────────────────────────────────

#[test]
fn dry_soil_runs_the_motor_for_one_run() {
    let mut rig = Rig::new(DRY, MILD, FULL);

    rig.run_until(0, 9000);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());

    rig.run_until(9000, 10_000);
    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.motor_on());
    assert!(rig.sink.contains(&AppEvent::IrrigationStarted { humidity_pct: 29 }));

    rig.run_until(10_000, 14_000);
    assert!(rig.hw.motor_on());

    rig.run_until(14_000, 15_000);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert!(rig.sink.contains(&AppEvent::IrrigationStopped));
}

#[test]
fn next_evaluation_counts_from_the_trigger() {
    let mut rig = Rig::new(DRY, MILD, FULL);
    rig.run_until(0, 19_000);
    assert_eq!(rig.app.state(), StateId::Idle);

    rig.run_until(19_000, 20_000);
    assert_eq!(rig.app.state(), StateId::Running);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::IrrigationStarted { .. })),
        2
    );
}

#[test]
fn wet_soil_never_irrigates() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.run_until(0, 60_000);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert_eq!(rig.app.reading().humidity_pct, 58);
    assert!(!rig.sink.events.iter().any(|e| matches!(e, AppEvent::IrrigationStarted { .. })));
}

#[test]
fn low_reservoir_blocks_irrigation_and_raises_the_alert() {
    let mut rig = Rig::new(DRY, MILD, LOW);
    rig.run_until(0, 30_000);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert!(rig.hw.alert_on());
    assert_eq!(rig.app.alert_flags(), AlertKind::WaterLow.mask());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertChanged(_))), 1);
}

#[test]
fn heat_blocks_irrigation_and_raises_the_alert() {
    let mut rig = Rig::new(DRY, HOT, FULL);
    rig.run_until(0, 30_000);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert!(rig.hw.alert_on());
    assert_eq!(rig.app.alert_flags(), AlertKind::OverTemperature.mask());
}

#[test]
fn alert_clears_when_the_reservoir_is_refilled() {
    let mut rig = Rig::new(WET, MILD, LOW);
    rig.run_until(0, 5000);
    assert!(rig.app.alert_active());

    rig.hw.sample.water_level = FULL;
    rig.run_until(5000, 10_000);
    assert!(!rig.app.alert_active());
    assert!(!rig.hw.alert_on());
    assert!(rig.sink.contains(&AppEvent::AlertChanged(0)));
}

#[test]
fn raising_the_humidity_threshold_starts_irrigation() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.run_until(0, 2000);
    assert_eq!(rig.line("setUmi 60", 2500), Ok(()));

    rig.run_until(2000, 10_000);
    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.motor_on());
}

// ── Status output ─────────────────────────────────────────────

#[test]
fn status_line_every_five_seconds() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.run_until(0, 20_000);

    let lines: Vec<String> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Status(report) => Some(report.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[3],
        "Humidity: 58% | Temp: 23.3 C (Max: 60) | Water Level: 600"
    );
}

#[test]
fn first_status_line_is_flagged_cold() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.run_until(0, 4000);
    assert!(!rig.app.is_warm());
    rig.run_until(4000, 5000);
    assert!(rig.app.is_warm());
    assert!(rig.app.status_report().warm);
}

// ── Motor test ────────────────────────────────────────────────

#[test]
fn testmotor_runs_for_the_override_duration() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.run_until(0, 3000);

    assert_eq!(rig.line("testmotor", 3500), Ok(()));
    assert_eq!(rig.app.state(), StateId::Override);
    assert!(rig.hw.motor_on());

    rig.run_until(3000, 8000);
    assert_eq!(rig.app.state(), StateId::Override);

    rig.run_until(8000, 9000);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert!(rig.sink.contains(&AppEvent::OverrideFinished { cancelled: false }));
}

#[test]
fn stopmotor_cancels_the_test_immediately() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.line("testmotor", 1000).unwrap();
    rig.line("stopmotor", 1500).unwrap();

    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.hw.motor_on());
    assert!(rig.sink.contains(&AppEvent::OverrideFinished { cancelled: true }));
}

#[test]
fn stopmotor_without_a_test_is_a_no_op() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.sink.clear();

    assert_eq!(rig.line("stopmotor", 1000), Ok(()));
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.sink.events.iter().any(|e| matches!(e, AppEvent::StateChanged { .. })));
}

#[test]
fn repeated_testmotor_does_not_extend_the_test() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.line("testmotor", 1000).unwrap();
    rig.run_until(1000, 4000);
    rig.line("testmotor", 4500).unwrap();

    rig.run_until(4000, 6000);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::OverrideStarted { .. })),
        1
    );
}

#[test]
fn testmotor_preempts_a_running_irrigation() {
    let mut rig = Rig::new(DRY, MILD, FULL);
    rig.run_until(0, 10_000);
    assert_eq!(rig.app.state(), StateId::Running);
    rig.sink.clear();

    rig.line("testmotor", 12_000).unwrap();
    assert_eq!(rig.app.state(), StateId::Override);
    assert!(rig.hw.motor_on());
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::StateChanged {
                from: StateId::Running,
                to: StateId::Override
            },
            AppEvent::IrrigationStopped,
            AppEvent::OverrideStarted { duration_ms: 5000 },
        ]
    );
}

#[test]
fn alert_tracks_sensors_during_a_motor_test() {
    let mut rig = Rig::new(WET, HOT, FULL);
    rig.line("testmotor", 500).unwrap();
    rig.run_until(0, 4000);

    assert_eq!(rig.app.state(), StateId::Override);
    assert!(rig.hw.motor_on());
    assert!(rig.hw.alert_on());
}

// ── Thresholds and persistence ────────────────────────────────

#[test]
fn out_of_range_temperature_is_rejected_without_side_effects() {
    let mut rig = Rig::new(WET, MILD, FULL);

    let err = rig.line("setTemp 5", 1000).unwrap_err();
    assert_eq!(
        err,
        CommandError::Validation(ValidationError {
            field: ThresholdField::TempMax,
            value: 5,
            min: 10,
            max: 80,
        })
    );
    assert_eq!(rig.app.describe_configuration().temp_max_c(), 60);
    assert_eq!(rig.store.storage().writes, 0);
    assert!(rig.sink.contains(&AppEvent::CommandRejected(err)));
}

#[test]
fn accepted_temperature_is_persisted() {
    let mut rig = Rig::new(WET, MILD, FULL);

    assert_eq!(rig.line("setTemp 70", 1000), Ok(()));
    assert_eq!(rig.app.describe_configuration().temp_max_c(), 70);
    assert!(rig.sink.contains(&AppEvent::ThresholdChanged {
        field: ThresholdField::TempMax,
        value: 70,
    }));
    assert_eq!(rig.store.storage().bytes[3], 70);

    let reloaded = rig.store.load().unwrap();
    assert_eq!(reloaded.temp_max_c(), 70);
    assert_eq!(reloaded.humidity_pct(), 45);
}

#[test]
fn range_edges_are_accepted() {
    let mut rig = Rig::new(WET, MILD, FULL);
    for line in ["setUmi 0", "setUmi 100", "setWater 0", "setWater 1023", "setTemp 10", "setTemp 80"] {
        assert_eq!(rig.line(line, 1000), Ok(()), "{line}");
    }
    for line in ["setUmi -1", "setUmi 101", "setWater 1024", "setTemp 9", "setTemp 81"] {
        assert!(matches!(rig.line(line, 1000), Err(CommandError::Validation(_))), "{line}");
    }
    let t = rig.app.describe_configuration();
    assert_eq!((t.humidity_pct(), t.water_level_raw(), t.temp_max_c()), (100, 1023, 80));
}

#[test]
fn water_threshold_survives_a_reboot_in_each_layout() {
    for (layout, expected) in [
        (PersistLayout::Wide, 999),
        (PersistLayout::SingleByte, 999 & 0xFF),
        (PersistLayout::Quarter, 996),
    ] {
        let mut rig = Rig::with_layout(WET, MILD, FULL, layout);
        rig.line("setWater 999", 1000).unwrap();
        assert_eq!(rig.app.describe_configuration().water_level_raw(), 999);

        let mut rebooted = StoredThresholds::new(rig.store.into_inner(), layout);
        let t = persist::boot_thresholds(&mut rebooted, ThresholdSource::Stored);
        assert_eq!(t.water_level_raw(), expected, "{layout:?}");
    }
}

#[test]
fn storage_failure_keeps_the_new_value_in_memory() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.store.storage_mut().fail_writes = true;

    assert_eq!(rig.line("setUmi 30", 1000), Ok(()));
    assert_eq!(rig.app.describe_configuration().humidity_pct(), 30);
    assert!(rig.sink.contains(&AppEvent::ThresholdChanged {
        field: ThresholdField::Humidity,
        value: 30,
    }));
}

#[test]
fn erased_storage_boots_with_defaults() {
    let mut store = StoredThresholds::new(MockEeprom::new(), PersistLayout::Wide);
    let t = persist::boot_thresholds(&mut store, ThresholdSource::Stored);
    assert_eq!(t, Thresholds::default());
}

#[test]
fn forced_defaults_overwrite_stored_values() {
    let mut eeprom = MockEeprom::new();
    eeprom.bytes[..4].copy_from_slice(&[10, 0x20, 0x03, 30]);
    let mut store = StoredThresholds::new(eeprom, PersistLayout::Wide);

    let t = persist::boot_thresholds(&mut store, ThresholdSource::ForceDefaults);
    assert_eq!(t, Thresholds::default());
    assert_eq!(store.storage().bytes[..4], [45, 200, 0, 60]);
}

// ── Console ───────────────────────────────────────────────────

#[test]
fn show_reports_the_live_thresholds() {
    let mut rig = Rig::new(WET, MILD, FULL);
    rig.line("setWater 321", 1000).unwrap();
    rig.sink.clear();

    rig.line("show", 2000).unwrap();
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::Configuration(Thresholds::new(45, 321, 60).unwrap())]
    );
}

#[test]
fn malformed_lines_are_rejected_and_reported() {
    let mut rig = Rig::new(WET, MILD, FULL);
    let cases = [
        ("", CommandError::Empty),
        ("water", CommandError::Unknown),
        ("TESTMOTOR", CommandError::Unknown),
        ("setUmi", CommandError::MissingArgument("setUmi")),
        ("setUmi abc", CommandError::InvalidArgument("setUmi")),
        ("setTemp 20 30", CommandError::InvalidArgument("setTemp")),
    ];
    for (line, expected) in cases {
        rig.sink.clear();
        assert_eq!(rig.line(line, 1000), Err(expected), "{line:?}");
        assert_eq!(rig.sink.events, vec![AppEvent::CommandRejected(expected)]);
    }
    assert_eq!(rig.app.describe_configuration(), Thresholds::default());
    assert_eq!(rig.app.state(), StateId::Idle);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let mut rig = Rig::new(WET, MILD, FULL);
    assert_eq!(rig.line("  setUmi   50 \r", 1000), Ok(()));
    assert_eq!(rig.app.describe_configuration().humidity_pct(), 50);
}
