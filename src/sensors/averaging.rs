//! Lockstep moving-average window over the three analog channels.
//!
//! One ring of [`WINDOW`] slots per channel, all sharing a single write
//! cursor: every control cycle writes humidity, temperature and water
//! level at the same index, then the cursor advances once.
//!
//! The mean always divides by [`WINDOW`], including slots that are still
//! zero from startup.  For the first four cycles after boot the averages
//! therefore read low; [`SampleWindow::is_warm`] tells callers when that
//! pre-fill period is over.

use super::{Channel, SensorSample};

/// Number of samples averaged per channel.
pub const WINDOW: usize = 5;

pub struct SampleWindow {
    slots: [[u16; WINDOW]; Channel::COUNT],
    cursor: usize,
    writes: usize,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleWindow {
    pub const fn new() -> Self {
        Self {
            slots: [[0; WINDOW]; Channel::COUNT],
            cursor: 0,
            writes: 0,
        }
    }

    /// Write one raw sample per channel and return the averaged sample.
    pub fn push(&mut self, raw: SensorSample) -> SensorSample {
        for channel in Channel::ALL {
            self.slots[channel as usize][self.cursor] = raw.get(channel);
        }
        self.advance();
        self.averaged()
    }

    /// Write a single channel at the shared cursor and advance it.
    ///
    /// Only meaningful when one channel is sampled; mixing this with
    /// [`push`](Self::push) desynchronises the other channels' windows.
    pub fn push_channel(&mut self, channel: Channel, raw: u16) -> u16 {
        self.slots[channel as usize][self.cursor] = raw;
        self.advance();
        self.average(channel)
    }

    /// Integer-truncated mean of all [`WINDOW`] slots for `channel`.
    pub fn average(&self, channel: Channel) -> u16 {
        let sum: u32 = self.slots[channel as usize].iter().map(|&v| u32::from(v)).sum();
        (sum / WINDOW as u32) as u16
    }

    /// Averaged value of every channel.
    pub fn averaged(&self) -> SensorSample {
        SensorSample {
            humidity: self.average(Channel::Humidity),
            temperature: self.average(Channel::Temperature),
            water_level: self.average(Channel::WaterLevel),
        }
    }

    /// `true` once every slot has been written at least once.
    pub fn is_warm(&self) -> bool {
        self.writes >= WINDOW
    }

    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % WINDOW;
        self.writes = self.writes.saturating_add(1);
    }
}
