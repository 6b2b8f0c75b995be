//! One-line counter summary, as shown on the station display.

use core::fmt;

use super::StationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    /// At the station, or in transit with no history yet.
    Passengers(u16),
    /// In transit, nobody counted yet today.
    Yesterday(u16),
    /// In transit during the day, with the change against yesterday.
    Today { today: u16, difference: i32 },
}

impl Summary {
    pub fn of(station: StationState, today: u16, yesterday: u16) -> Self {
        if station == StationState::AtStation || yesterday == 0 {
            Self::Passengers(today)
        } else if today == 0 {
            Self::Yesterday(yesterday)
        } else {
            Self::Today {
                today,
                difference: i32::from(today) - i32::from(yesterday),
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passengers(n) => write!(f, "Passengers: {n}"),
            Self::Yesterday(n) => write!(f, "Yesterday: {n}"),
            Self::Today { today, difference } => write!(f, "Today: {today} {difference:+}"),
        }
    }
}
