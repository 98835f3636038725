#![cfg_attr(not(test), no_std)]
//! Minute-resolution alarm clock time keeper.
//!
//! [`Clock`] tracks wall-clock time from a real-time clock chip or from the
//! millisecond tick, reports minute/hour/day boundaries and manages a single
//! daily alarm with snooze. [`startup::start`] picks the time source once at
//! boot.

// MUST be the first module
mod fmt;

pub mod alarm;
pub mod clock;
pub mod config;
pub mod ds1307;
pub mod startup;
pub mod storage;
pub mod timebase;

#[cfg(test)]
mod testutil;

pub use alarm::{AlarmLabel, AlarmTime, AlarmTimeError};
pub use clock::{AlarmText, Boundary, Clock};
pub use config::{Config, ConfigError};
pub use storage::{AlarmLayout, StoredAlarm};
pub use timebase::{Backend, EmulatedClock, HardwareClock, TimeBase};
