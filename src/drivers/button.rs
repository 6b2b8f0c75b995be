//! Polled, debounced push-button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled.  The
//! main loop samples the pin once per iteration through [`poll`].
//!
//! ## Debounce rule
//!
//! A sampled level is accepted as a change when it differs from the
//! previous sample *and* more than [`DEBOUNCE_MS`] have passed since the
//! last accepted change.  Only the falling edge (press) is reported; the
//! release is accepted silently so the next press can be seen.
//!
//! [`poll`]: DebouncedButton::poll

use embedded_hal::digital::InputPin;

pub const DEBOUNCE_MS: u32 = 100;

/// Classified edge reported by [`DebouncedButton::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

pub struct DebouncedButton<P: InputPin> {
    pin: P,
    /// Level seen at the previous poll (`true` = HIGH = released).
    last_level: bool,
    last_change_ms: u32,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_level: true,
            last_change_ms: 0,
        }
    }

    /// Sample the pin.  `now_ms` is monotonic uptime in milliseconds.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<ButtonEvent>, P::Error> {
        let level = self.pin.is_high()?;
        Ok(self.on_sample(level, now_ms))
    }

    fn on_sample(&mut self, level: bool, now_ms: u32) -> Option<ButtonEvent> {
        let mut event = None;
        if level != self.last_level && now_ms.wrapping_sub(self.last_change_ms) > DEBOUNCE_MS {
            if !level {
                event = Some(ButtonEvent::Pressed);
            }
            self.last_change_ms = now_ms;
        }
        self.last_level = level;
        event
    }
}
