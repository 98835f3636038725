//! Traits for datetime-based clocks (e.g. real-time clocks).

use super::datetime::{Datetime, DatetimeError};

#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum DatetimeClockError {
    /// The clock is halted and cannot report the time.
    NotEnabled,
    /// The bus transaction with the clock device failed.
    Bus,
    /// The device returned a value that is not a valid date/time.
    InvalidDatetime(DatetimeError),
    /// A memory address outside the device's backup RAM was requested.
    OutOfRange,
    Unknown,
}

impl From<DatetimeError> for DatetimeClockError {
    fn from(value: DatetimeError) -> Self {
        Self::InvalidDatetime(value)
    }
}

impl core::fmt::Display for DatetimeClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotEnabled => write!(f, "clock is not running"),
            Self::Bus => write!(f, "bus transaction with the clock failed"),
            Self::InvalidDatetime(e) => write!(f, "clock reported an invalid date/time: {e}"),
            Self::OutOfRange => write!(f, "clock memory address out of range"),
            Self::Unknown => write!(f, "unknown clock error"),
        }
    }
}

/// Trait for datetime-based clock (e.g. real-time clock).
/// This trait provides methods to get and set the current wall-clock date and time in a structured format,
/// and to halt or start the oscillator of battery-backed devices.
///
/// Methods take `&mut self` because a read is usually a bus transaction.
pub trait DatetimeClock {
    /// Returns the current structured date and time.
    fn get_current_datetime(&mut self) -> Result<Datetime, DatetimeClockError>;

    /// Sets the current structured date and time.
    fn set_current_datetime(&mut self, datetime: &Datetime) -> Result<(), DatetimeClockError>;

    /// Returns true while the oscillator is running and the time advances.
    fn is_running(&mut self) -> Result<bool, DatetimeClockError>;

    /// Starts or halts the oscillator.
    fn set_running(&mut self, running: bool) -> Result<(), DatetimeClockError>;

    /// The resolution of the RTC in Hz.  Typical values are 1hz and 1000hz.
    const MAX_RESOLUTION_HZ: u32;
}

/// Battery-backed scratch memory that many real-time clock chips carry next to
/// their time registers. Addresses are relative to the start of that memory.
pub trait ClockMemory {
    /// Number of addressable bytes.
    fn memory_size(&self) -> usize;

    /// Reads one byte.
    fn read_memory(&mut self, address: u8) -> Result<u8, DatetimeClockError>;

    /// Writes one byte.
    fn write_memory(&mut self, address: u8, value: u8) -> Result<(), DatetimeClockError>;
}
