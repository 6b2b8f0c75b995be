//! Irrigation controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and for the
//! two firmware binaries (`irrigation`, `passenger-counter`).  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, so the library builds and tests on the host.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod config;
pub mod counter;
pub mod error;
pub mod events;
pub mod fsm;
pub mod persist;
pub mod pins;
pub mod schedule;

pub mod adapters;
pub mod drivers;
pub mod sensors;
