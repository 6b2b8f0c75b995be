//! Irrigation controller firmware: main entry point.
//!
//! Hexagonal architecture with a cooperative, event-driven loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   EepromAdapter   UptimeClock  │
//! │  (Sensor+Actuator) (EventSink)    (ByteStorage)                │
//! │  UART + LineAssembler (console commands)                       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           IrrigationService (pure logic)               │    │
//! │  │  SampleWindow · AlertMonitor · FSM · Thresholds        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{FreeRtos, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use heapless::{Deque, String};
use log::{info, warn};

use irrigation::adapters::eeprom::EepromAdapter;
use irrigation::adapters::hardware::HardwareAdapter;
use irrigation::adapters::log_sink::LogEventSink;
use irrigation::adapters::serial::{LineAssembler, LINE_CAP};
use irrigation::adapters::time::UptimeClock;
use irrigation::app::commands::USAGE;
use irrigation::app::ports::ActuatorPort;
use irrigation::app::service::IrrigationService;
use irrigation::config::SystemConfig;
use irrigation::drivers::alert_led::AlertLed;
use irrigation::drivers::hw_init::{self, ADC_CH_HUMIDITY, ADC_CH_TEMPERATURE, ADC_CH_WATER};
use irrigation::drivers::motor::MotorDriver;
use irrigation::events::{Event, EventQueue};
use irrigation::persist::{self, StoredThresholds};
use irrigation::pins;
use irrigation::schedule::Interval;
use irrigation::sensors::analog::AnalogInput;
use irrigation::sensors::SensorHub;

/// Loop events; filled by the timers and the console poll below.
static EVENTS: EventQueue<16> = EventQueue::new();

/// Pause between loop iterations.  Keeps the console responsive while
/// the control cycle runs on its own interval.
const POLL_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Irrigation controller v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    let peripherals = Peripherals::take()?;

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_adc()?;
    let motor = MotorDriver::new(PinDriver::output(peripherals.pins.gpio6)?);
    let alert = AlertLed::new(PinDriver::output(peripherals.pins.gpio5)?);
    info!(
        "pins: motor=GPIO{} alert=GPIO{} adc=GPIO{}/{}/{}",
        pins::MOTOR_GPIO,
        pins::ALERT_LED_GPIO,
        pins::HUMIDITY_ADC_GPIO,
        pins::TEMP_ADC_GPIO,
        pins::WATER_ADC_GPIO
    );

    let uart = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio43,
        peripherals.pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(pins::UART_BAUD)),
    )?;

    let sensor_hub = SensorHub::new(
        AnalogInput::new(ADC_CH_HUMIDITY),
        AnalogInput::new(ADC_CH_TEMPERATURE),
        AnalogInput::new(ADC_CH_WATER),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, motor, alert);
    hw.all_off();

    // ── 3. Thresholds from storage ────────────────────────────
    let mut store = StoredThresholds::new(EepromAdapter::new(c"irrigation")?, config.persist_layout);
    let thresholds = persist::boot_thresholds(&mut store, config.threshold_source);

    // ── 4. Service ────────────────────────────────────────────
    let clock = UptimeClock::new();
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(config.clone(), thresholds);
    app.start(clock.uptime_ms(), &mut sink);
    info!("{USAGE}");

    // ── 5. Event loop ─────────────────────────────────────────
    let mut control = Interval::new(config.control_loop_interval_ms, clock.uptime_ms());
    let mut assembler: LineAssembler = LineAssembler::new();
    let mut lines: Deque<String<LINE_CAP>, 4> = Deque::new();
    let mut rx = [0u8; 32];

    loop {
        let now = clock.uptime_ms();

        // Console bytes → complete lines.
        match uart.read(&mut rx, NON_BLOCK) {
            Ok(n) => {
                for &byte in &rx[..n] {
                    match assembler.push(byte) {
                        Some(Ok(line)) => {
                            if lines.push_back(line).is_ok() {
                                EVENTS.post(Event::LineReceived);
                            } else {
                                warn!("CMD | console backlog full, line dropped");
                            }
                        }
                        Some(Err(e)) => warn!("CMD | {e}"),
                        None => {}
                    }
                }
            }
            Err(e) => warn!("uart: read failed ({e})"),
        }

        if control.due(now) {
            EVENTS.post(Event::ControlTick);
        }

        EVENTS.drain(|event| match event {
            Event::ControlTick => app.tick(now, &mut hw, &mut sink),
            Event::LineReceived => {
                if let Some(line) = lines.pop_front() {
                    // Rejections are already reported through the sink.
                    let _ = app.handle_line(&line, now, &mut hw, &mut store, &mut sink);
                }
            }
            other => warn!("unexpected event {other:?}"),
        });

        FreeRtos::delay_ms(POLL_MS);
    }
}
