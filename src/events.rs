//! Lock-free main-loop event queue.
//!
//! Events are produced by:
//! - the loop's own timers (control tick, day check)
//! - input polling (debounced button presses, completed console lines)
//!
//! and consumed by the same loop, one at a time, in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timers      │────▶│              │     │              │
//! │ Buttons     │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ UART lines  │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The queue is single-producer / single-consumer and safe to share as a
//! `static`: slots, head and tail are all atomics.

use core::sync::atomic::{AtomicU8, Ordering};

use log::warn;

/// Loop events.  Discriminants are the queued byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Irrigation controller ─────────────────────────────
    /// Control cycle timer fired.
    ControlTick = 0,
    /// A complete line is waiting in the console line assembler.
    LineReceived = 1,

    // ── Passenger counter ─────────────────────────────────
    StationPressed = 10,
    PassengerPressed = 11,
    NewDayPressed = 12,
    /// Periodic new-day check timer fired.
    DayCheck = 13,
}

impl Event {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::ControlTick),
            1 => Some(Self::LineReceived),
            10 => Some(Self::StationPressed),
            11 => Some(Self::PassengerPressed),
            12 => Some(Self::NewDayPressed),
            13 => Some(Self::DayCheck),
            _ => None,
        }
    }
}

/// Fixed-capacity SPSC ring of [`Event`]s.  One slot is kept free, so
/// `N - 1` events fit.  `N` must be at most 255.
pub struct EventQueue<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicU8,
    tail: AtomicU8,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
        }
    }

    /// Enqueue `event`.  Returns `false` (event dropped) when full.
    #[must_use = "a full queue drops the event"]
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Acquire) as usize;
        let next = (head + 1) % N;
        if next == tail {
            return false;
        }
        self.slots[head].store(event as u8, Ordering::Relaxed);
        self.head.store(next as u8, Ordering::Release);
        true
    }

    /// [`push`](Self::push), logging a warning when the event is dropped.
    pub fn post(&self, event: Event) -> bool {
        let queued = self.push(event);
        if !queued {
            warn!("event queue full, {event:?} dropped");
        }
        queued
    }

    /// Dequeue the oldest event.
    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        let head = self.head.load(Ordering::Acquire) as usize;
        if tail == head {
            return None;
        }
        let raw = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store(((tail + 1) % N) as u8, Ordering::Release);
        Event::from_u8(raw)
    }

    /// Pop every pending event into `handler`, oldest first.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + N - tail) % N
    }
}
