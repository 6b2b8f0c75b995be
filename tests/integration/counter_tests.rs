//! Passenger counter against mock storage, including a simulated reboot.

use irrigation::adapters::eeprom::EepromAdapter;
use irrigation::app::events::AppEvent;
use irrigation::app::ports::ByteStorage;
use irrigation::counter::{
    CounterEvent, PassengerCounter, StationState, ADDR_DAY_FLAG, ADDR_STATION, ADDR_TODAY,
    ADDR_YESTERDAY,
};

use crate::mock_hw::{MockEeprom, RecordingSink};

fn board_with(storage: &MockEeprom) -> (PassengerCounter, RecordingSink) {
    let mut sink = RecordingSink::new();
    let counter = PassengerCounter::load(storage, &mut sink);
    (counter, sink)
}

#[test]
fn fresh_flash_starts_at_zero_in_transit() {
    let storage = MockEeprom::new();
    let (counter, sink) = board_with(&storage);

    assert_eq!((counter.today(), counter.yesterday()), (0, 0));
    assert_eq!(counter.station(), StationState::InTransit);
    assert_eq!(counter.leds(), (false, true));
    assert!(sink.contains(&AppEvent::Counter(CounterEvent::Restored {
        today: 0,
        yesterday: 0,
        station: StationState::InTransit,
    })));
}

#[test]
fn a_day_of_service_survives_a_reboot() {
    let mut storage = MockEeprom::new();
    let (mut counter, mut sink) = board_with(&storage);

    // Two stops, five passengers.
    counter.station_pressed(&mut storage, &mut sink);
    for _ in 0..3 {
        assert!(counter.passenger_pressed(&mut sink));
    }
    counter.station_pressed(&mut storage, &mut sink);
    assert!(!counter.passenger_pressed(&mut sink));
    counter.station_pressed(&mut storage, &mut sink);
    counter.passenger_pressed(&mut sink);
    counter.passenger_pressed(&mut sink);
    counter.station_pressed(&mut storage, &mut sink);

    assert_eq!(counter.today(), 5);
    assert_eq!(storage.read_u16_le(ADDR_TODAY), Ok(5));
    assert_eq!(storage.read_u8(ADDR_STATION), Ok(0));

    let (rebooted, _) = board_with(&storage);
    assert_eq!(rebooted.today(), 5);
    assert_eq!(rebooted.station(), StationState::InTransit);
}

#[test]
fn passengers_at_a_stop_are_lost_without_a_departure() {
    let mut storage = MockEeprom::new();
    let (mut counter, mut sink) = board_with(&storage);

    counter.station_pressed(&mut storage, &mut sink);
    counter.passenger_pressed(&mut sink);
    assert_eq!(counter.today(), 1);

    let (rebooted, _) = board_with(&storage);
    assert_eq!(rebooted.today(), 0);
}

#[test]
fn new_day_rolls_counts_and_reports_the_difference() {
    let mut storage = MockEeprom::new();
    storage.write_u16_le(ADDR_TODAY, 12).unwrap();
    storage.write_u16_le(ADDR_YESTERDAY, 9).unwrap();
    storage.write_u8(ADDR_DAY_FLAG, 0).unwrap();
    let (mut counter, mut sink) = board_with(&storage);
    assert_eq!(counter.summary().to_string(), "Today: 12 +3");

    assert!(!counter.check_for_new_day(&mut storage, &mut sink));

    counter.request_new_day();
    assert!(counter.check_for_new_day(&mut storage, &mut sink));
    assert!(sink.contains(&AppEvent::Counter(CounterEvent::NewDay {
        yesterday: 12,
        difference: 3,
    })));
    assert_eq!((counter.today(), counter.yesterday()), (0, 12));
    assert_eq!(counter.summary().to_string(), "Yesterday: 12");
    assert!(!counter.new_day_pending());

    assert_eq!(storage.read_u16_le(ADDR_TODAY), Ok(0));
    assert_eq!(storage.read_u16_le(ADDR_YESTERDAY), Ok(12));
    assert_eq!(storage.read_u8(ADDR_DAY_FLAG), Ok(1));
}

#[test]
fn day_flag_toggles_on_every_rollover() {
    let mut storage = MockEeprom::new();
    storage.write_u8(ADDR_DAY_FLAG, 0).unwrap();
    let (mut counter, mut sink) = board_with(&storage);

    for expected in [1, 0, 1] {
        counter.request_new_day();
        counter.check_for_new_day(&mut storage, &mut sink);
        assert_eq!(storage.read_u8(ADDR_DAY_FLAG), Ok(expected));
    }
}

#[test]
fn counter_runs_on_the_nvs_backed_area() {
    let mut storage = EepromAdapter::new(c"counter").unwrap();
    let mut sink = RecordingSink::new();
    let mut counter = PassengerCounter::load(&storage, &mut sink);

    counter.station_pressed(&mut storage, &mut sink);
    counter.passenger_pressed(&mut sink);
    counter.station_pressed(&mut storage, &mut sink);

    assert_eq!(storage.read_u16_le(ADDR_TODAY), Ok(1));
    assert_eq!(storage.contents()[ADDR_TODAY], 1);
}
