//! Station passenger counter.
//!
//! A second, smaller controller built from the same parts as the
//! irrigation firmware: debounced buttons, byte storage, event sink.
//!
//! ```text
//!   station button ──▶ toggle InTransit ⇄ AtStation
//!   passenger button ─▶ today += 1        (AtStation only)
//!   new-day button ───▶ pending = true ─▶ check_for_new_day()
//!                                        yesterday = today, today = 0
//! ```
//!
//! ## Storage layout
//!
//! | Offset | Size | Field                    |
//! |--------|------|--------------------------|
//! | 0      | 2    | today's count (u16 LE)   |
//! | 2      | 2    | yesterday's count (u16 LE)|
//! | 4      | 1    | day flag, toggled per day |
//! | 5      | 1    | station state (0 / 1)    |
//!
//! Today's count is written on departure and on rollover, not on every
//! passenger.

pub mod summary;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ByteStorage, EventSink, StorageError};

pub use summary::Summary;

pub const ADDR_TODAY: usize = 0;
pub const ADDR_YESTERDAY: usize = 2;
pub const ADDR_DAY_FLAG: usize = 4;
pub const ADDR_STATION: usize = 5;

/// Period of the background new-day check (ms).
pub const DAY_CHECK_INTERVAL_MS: u32 = 60_000;

/// Erased-flash marker for a 2-byte count.
const ERASED_U16: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationState {
    InTransit,
    AtStation,
}

impl StationState {
    fn toggled(self) -> Self {
        match self {
            Self::InTransit => Self::AtStation,
            Self::AtStation => Self::InTransit,
        }
    }

    fn as_byte(self) -> u8 {
        u8::from(self == Self::AtStation)
    }
}

/// Events emitted by the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    /// Counts restored from storage at boot.
    Restored {
        today: u16,
        yesterday: u16,
        station: StationState,
    },
    Arrived { today: u16 },
    /// Departure; `today` has been persisted.
    Departed { today: u16 },
    PassengerCounted { today: u16 },
    /// Day rollover.  `difference` is the closed day minus the day before.
    NewDay { yesterday: u16, difference: i32 },
}

#[derive(Debug)]
pub struct PassengerCounter {
    today: u16,
    yesterday: u16,
    station: StationState,
    new_day_pending: bool,
}

impl PassengerCounter {
    /// Restore counts and station state.  Erased or unreadable fields
    /// start from zero / in transit.
    pub fn load(storage: &impl ByteStorage, sink: &mut impl EventSink) -> Self {
        let today = read_count(storage, ADDR_TODAY, "today");
        let yesterday = read_count(storage, ADDR_YESTERDAY, "yesterday");
        let station = match storage.read_u8(ADDR_STATION) {
            Ok(0) | Ok(0xFF) => StationState::InTransit,
            Ok(_) => StationState::AtStation,
            Err(e) => {
                warn!("counter: station state unreadable ({e})");
                StationState::InTransit
            }
        };

        info!("counter: today={today} yesterday={yesterday} station={station:?}");
        sink.emit(&AppEvent::Counter(CounterEvent::Restored {
            today,
            yesterday,
            station,
        }));

        Self {
            today,
            yesterday,
            station,
            new_day_pending: false,
        }
    }

    /// Debounced press of the station button.
    pub fn station_pressed(&mut self, storage: &mut impl ByteStorage, sink: &mut impl EventSink) {
        self.station = self.station.toggled();
        match self.station {
            StationState::AtStation => {
                sink.emit(&AppEvent::Counter(CounterEvent::Arrived { today: self.today }));
            }
            StationState::InTransit => {
                persist(storage.write_u16_le(ADDR_TODAY, self.today), "today");
                persist(storage.write_u8(ADDR_STATION, self.station.as_byte()), "station");
                sink.emit(&AppEvent::Counter(CounterEvent::Departed { today: self.today }));
            }
        }
    }

    /// Debounced press of the passenger sensor.  Ignored in transit.
    /// Returns `true` if the passenger was counted.
    pub fn passenger_pressed(&mut self, sink: &mut impl EventSink) -> bool {
        if self.station != StationState::AtStation {
            return false;
        }
        self.today = self.today.saturating_add(1);
        sink.emit(&AppEvent::Counter(CounterEvent::PassengerCounted { today: self.today }));
        true
    }

    /// Mark that a new day has begun; applied by the next
    /// [`check_for_new_day`](Self::check_for_new_day).
    pub fn request_new_day(&mut self) {
        self.new_day_pending = true;
    }

    /// Apply a pending rollover.  Called periodically and right after a
    /// new-day request.  Returns `true` if a rollover happened.
    pub fn check_for_new_day(
        &mut self,
        storage: &mut impl ByteStorage,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.new_day_pending {
            return false;
        }
        let difference = i32::from(self.today) - i32::from(self.yesterday);
        self.yesterday = self.today;
        self.today = 0;

        persist(storage.write_u16_le(ADDR_YESTERDAY, self.yesterday), "yesterday");
        persist(storage.write_u16_le(ADDR_TODAY, self.today), "today");
        match storage.read_u8(ADDR_DAY_FLAG) {
            Ok(flag) => persist(storage.write_u8(ADDR_DAY_FLAG, flag ^ 1), "day flag"),
            Err(e) => warn!("counter: day flag unreadable ({e})"),
        }

        self.new_day_pending = false;
        sink.emit(&AppEvent::Counter(CounterEvent::NewDay {
            yesterday: self.yesterday,
            difference,
        }));
        true
    }

    pub fn today(&self) -> u16 {
        self.today
    }

    pub fn yesterday(&self) -> u16 {
        self.yesterday
    }

    pub fn station(&self) -> StationState {
        self.station
    }

    pub fn new_day_pending(&self) -> bool {
        self.new_day_pending
    }

    /// `(station_led, moving_led)`.
    pub fn leds(&self) -> (bool, bool) {
        let at = self.station == StationState::AtStation;
        (at, !at)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self.station, self.today, self.yesterday)
    }
}

fn read_count(storage: &impl ByteStorage, offset: usize, what: &str) -> u16 {
    match storage.read_u16_le(offset) {
        Ok(ERASED_U16) => 0,
        Ok(v) => v,
        Err(e) => {
            warn!("counter: {what} count unreadable ({e})");
            0
        }
    }
}

fn persist(res: Result<(), StorageError>, what: &str) {
    if let Err(e) = res {
        warn!("counter: writing {what} failed ({e})");
    }
}
