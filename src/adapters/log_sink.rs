//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event as one
//! tagged line to the logger, which `esp_idf_logger` routes to the UART
//! console in production.

use log::{info, warn};

use crate::alert::AlertKind;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::counter::CounterEvent;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state, thresholds } => {
                info!(
                    "START | state={:?} | humidity<{}% water>{} temp<={}C",
                    state,
                    thresholds.humidity_pct(),
                    thresholds.water_level_raw(),
                    thresholds.temp_max_c()
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::IrrigationStarted { humidity_pct } => {
                info!("MOTOR | irrigation on: low humidity ({}%)", humidity_pct);
            }
            AppEvent::IrrigationStopped => info!("MOTOR | irrigation off"),
            AppEvent::OverrideStarted { duration_ms } => {
                info!("MOTOR | test on ({} ms)", duration_ms);
            }
            AppEvent::OverrideFinished { cancelled } => {
                info!("MOTOR | test off{}", if *cancelled { " (cancelled)" } else { "" });
            }
            AppEvent::AlertChanged(0) => info!("ALERT | cleared"),
            AppEvent::AlertChanged(flags) => {
                let water = flags & AlertKind::WaterLow.mask() != 0;
                let temp = flags & AlertKind::OverTemperature.mask() != 0;
                warn!(
                    "ALERT | water_low={} over_temp={} flags=0b{:02b}",
                    water, temp, flags
                );
            }
            AppEvent::Status(report) => {
                if report.warm {
                    info!("STATUS | {}", report);
                } else {
                    info!("STATUS | {} (warming up)", report);
                }
            }
            AppEvent::ThresholdChanged { field, value } => {
                info!("CONFIG | {} set to {}", field, value);
            }
            AppEvent::Configuration(t) => {
                info!(
                    "CONFIG | humidity threshold: {} | water level threshold: {} | max temp: {}",
                    t.humidity_pct(),
                    t.water_level_raw(),
                    t.temp_max_c()
                );
            }
            AppEvent::CommandRejected(e) => warn!("CMD | {}", e),
            AppEvent::Counter(c) => log_counter(c),
        }
    }
}

fn log_counter(event: &CounterEvent) {
    match event {
        CounterEvent::Restored {
            today,
            yesterday,
            station,
        } => info!("COUNT | today={} yesterday={} station={:?}", today, yesterday, station),
        CounterEvent::Arrived { today } => info!("COUNT | train arrived, passengers={}", today),
        CounterEvent::Departed { today } => {
            info!("COUNT | train departing, boarded today={}", today);
        }
        CounterEvent::PassengerCounted { today } => info!("COUNT | passenger, today={}", today),
        CounterEvent::NewDay {
            yesterday,
            difference,
        } => info!("COUNT | new day, yesterday={} difference={:+}", yesterday, difference),
    }
}
