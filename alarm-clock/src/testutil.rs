//! Test doubles shared by the unit tests.

use clock_hal::time::{ClockMemory, Datetime, DatetimeClock, DatetimeClockError, DatetimeError, UncheckedDatetime};

pub(crate) fn datetime(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Datetime {
    Datetime::new(UncheckedDatetime {
        year,
        month,
        day,
        hour,
        minute,
        second,
        ..Default::default()
    })
    .expect("Datetime should be valid")
}

/// In-memory real-time clock. Time only changes when a test sets `now`.
pub(crate) struct FakeRtc {
    pub now: Datetime,
    pub running: bool,
    /// Chip halts again right after being started.
    pub stuck: bool,
    /// Every read fails as if the chip were absent.
    pub fail_reads: bool,
    /// Registers hold no valid date until the time is set.
    pub garbled: bool,
    pub memory: [u8; 8],
    pub reads: usize,
}

impl FakeRtc {
    pub fn running_at(now: Datetime) -> Self {
        Self {
            now,
            running: true,
            stuck: false,
            fail_reads: false,
            garbled: false,
            memory: [0; 8],
            reads: 0,
        }
    }
}

impl DatetimeClock for FakeRtc {
    fn get_current_datetime(&mut self) -> Result<Datetime, DatetimeClockError> {
        if self.fail_reads {
            return Err(DatetimeClockError::Bus);
        }
        self.reads += 1;
        if self.garbled {
            return Err(DatetimeClockError::InvalidDatetime(DatetimeError::Day));
        }
        Ok(self.now)
    }

    fn set_current_datetime(&mut self, datetime: &Datetime) -> Result<(), DatetimeClockError> {
        self.now = *datetime;
        self.garbled = false;
        Ok(())
    }

    fn is_running(&mut self) -> Result<bool, DatetimeClockError> {
        if self.fail_reads {
            return Err(DatetimeClockError::Bus);
        }
        Ok(self.running)
    }

    fn set_running(&mut self, running: bool) -> Result<(), DatetimeClockError> {
        self.running = running && !self.stuck;
        Ok(())
    }

    const MAX_RESOLUTION_HZ: u32 = 1;
}

impl ClockMemory for FakeRtc {
    fn memory_size(&self) -> usize {
        self.memory.len()
    }

    fn read_memory(&mut self, address: u8) -> Result<u8, DatetimeClockError> {
        if self.fail_reads {
            return Err(DatetimeClockError::Bus);
        }
        self.memory
            .get(usize::from(address))
            .copied()
            .ok_or(DatetimeClockError::OutOfRange)
    }

    fn write_memory(&mut self, address: u8, value: u8) -> Result<(), DatetimeClockError> {
        let cell = self
            .memory
            .get_mut(usize::from(address))
            .ok_or(DatetimeClockError::OutOfRange)?;
        *cell = value;
        Ok(())
    }
}
