//! Station passenger counter: firmware entry point.
//!
//! Three active-low buttons (station, passenger, new day), two indicator
//! LEDs, counts kept in NVS-backed byte storage.  Same cooperative loop
//! as the irrigation controller: poll inputs, queue events, drain.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, IOPin, Input, Output, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use irrigation::adapters::eeprom::EepromAdapter;
use irrigation::adapters::log_sink::LogEventSink;
use irrigation::adapters::time::UptimeClock;
use irrigation::counter::{PassengerCounter, DAY_CHECK_INTERVAL_MS};
use irrigation::drivers::button::{ButtonEvent, DebouncedButton};
use irrigation::events::{Event, EventQueue};
use irrigation::pins;
use irrigation::schedule::Interval;

static EVENTS: EventQueue<16> = EventQueue::new();

const POLL_MS: u32 = 10;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Passenger counter v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let p = peripherals.pins;

    let mut station_btn = DebouncedButton::new(pulled_up(PinDriver::input(p.gpio10.downgrade())?)?);
    let mut passenger_btn = DebouncedButton::new(pulled_up(PinDriver::input(p.gpio11.downgrade())?)?);
    let mut new_day_btn = DebouncedButton::new(pulled_up(PinDriver::input(p.gpio12.downgrade())?)?);
    let mut station_led = PinDriver::output(p.gpio13)?;
    let mut moving_led = PinDriver::output(p.gpio14)?;
    info!(
        "pins: buttons=GPIO{}/{}/{} leds=GPIO{}/{}",
        pins::STATION_BUTTON_GPIO,
        pins::PASSENGER_BUTTON_GPIO,
        pins::NEW_DAY_BUTTON_GPIO,
        pins::STATION_LED_GPIO,
        pins::MOVING_LED_GPIO
    );

    let mut storage = EepromAdapter::new(c"counter")?;
    let mut sink = LogEventSink::new();
    let mut counter = PassengerCounter::load(&storage, &mut sink);
    show(&counter, &mut station_led, &mut moving_led);

    let clock = UptimeClock::new();
    let mut day_check = Interval::new(DAY_CHECK_INTERVAL_MS, clock.uptime_ms());

    loop {
        let now = clock.uptime_ms();

        for (button, event) in [
            (&mut station_btn, Event::StationPressed),
            (&mut passenger_btn, Event::PassengerPressed),
            (&mut new_day_btn, Event::NewDayPressed),
        ] {
            match button.poll(now) {
                Ok(Some(ButtonEvent::Pressed)) => {
                    EVENTS.post(event);
                }
                Ok(None) => {}
                Err(e) => warn!("button read failed ({e})"),
            }
        }
        if day_check.due(now) {
            EVENTS.post(Event::DayCheck);
        }

        EVENTS.drain(|event| {
            let changed = match event {
                Event::StationPressed => {
                    counter.station_pressed(&mut storage, &mut sink);
                    true
                }
                Event::PassengerPressed => counter.passenger_pressed(&mut sink),
                Event::NewDayPressed => {
                    info!("new day requested");
                    counter.request_new_day();
                    counter.check_for_new_day(&mut storage, &mut sink)
                }
                Event::DayCheck => counter.check_for_new_day(&mut storage, &mut sink),
                other => {
                    warn!("unexpected event {other:?}");
                    false
                }
            };
            if changed {
                show(&counter, &mut station_led, &mut moving_led);
            }
        });

        FreeRtos::delay_ms(POLL_MS);
    }
}

/// Buttons are active-low against the internal pull-up.
fn pulled_up(mut pin: PinDriver<'_, AnyIOPin, Input>) -> Result<PinDriver<'_, AnyIOPin, Input>> {
    pin.set_pull(Pull::Up)?;
    Ok(pin)
}

/// Drive the indicator LEDs and log the summary line.
fn show<S, M>(counter: &PassengerCounter, station: &mut PinDriver<'_, S, Output>, moving: &mut PinDriver<'_, M, Output>)
where
    S: OutputPin,
    M: OutputPin,
{
    let (at_station, in_transit) = counter.leds();
    if let Err(e) = station.set_level(at_station.into()) {
        warn!("station LED write failed ({e})");
    }
    if let Err(e) = moving.set_level(in_transit.into()) {
        warn!("moving LED write failed ({e})");
    }
    info!("DISPLAY | {}", counter.summary());
}
