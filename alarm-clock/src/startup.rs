//! Start-up: decide once whether the real-time clock chip can be trusted.

use clock_hal::time::{ClockMemory, Datetime, DatetimeClock, DatetimeClockError};
use clock_hal::Nvram;

use crate::clock::Clock;
use crate::config::Config;
use crate::timebase::{Backend, EmulatedClock, HardwareClock};

/// Checks the chip and brings it up if needed.
///
/// A chip that reports an invalid time, or a time before `build_timestamp`,
/// has lost its backup power and is reset to the build timestamp. A halted
/// chip is started. The chip is trusted only if it then runs and reports a
/// time strictly later than the build timestamp; that time is returned. Any
/// bus error means no usable chip.
pub fn probe<R: DatetimeClock>(rtc: &mut R, build_timestamp: &Datetime) -> Option<Datetime> {
    match bring_up(rtc, build_timestamp) {
        Ok(Some(now)) => {
            info!("real-time clock running");
            Some(now)
        }
        Ok(None) => {
            warn!("real-time clock not usable");
            None
        }
        Err(e) => {
            warn!("no real-time clock: {:?}", e);
            None
        }
    }
}

fn bring_up<R: DatetimeClock>(rtc: &mut R, build_timestamp: &Datetime) -> Result<Option<Datetime>, DatetimeClockError> {
    let lost = match rtc.get_current_datetime() {
        Ok(now) => now < *build_timestamp,
        // Registers of a chip that lost backup power need not hold a valid date.
        Err(DatetimeClockError::InvalidDatetime(e)) => {
            warn!("real-time clock holds an invalid time: {:?}", e);
            true
        }
        Err(e) => return Err(e),
    };
    if lost {
        warn!("real-time clock lost its time, resetting to build timestamp");
        rtc.set_current_datetime(build_timestamp)?;
    }

    if !rtc.is_running()? {
        warn!("real-time clock halted, starting");
        rtc.set_running(true)?;
        if !rtc.is_running()? {
            return Ok(None);
        }
    }

    let now = rtc.get_current_datetime()?;
    Ok((now > *build_timestamp).then_some(now))
}

/// Builds the clock on the real-time clock chip if [`probe`] accepts it,
/// otherwise on an emulated clock seeded with the build timestamp and backed
/// by `nvram`. The persisted alarm is loaded from whichever medium is chosen.
pub fn start<R, N>(mut rtc: R, nvram: N, config: Config, now_ms: u32) -> Clock<Backend<R, N>>
where
    R: DatetimeClock + ClockMemory,
    N: Nvram,
{
    let base = match probe(&mut rtc, config.build_timestamp()) {
        Some(now) => Backend::Hardware(HardwareClock::new(rtc, config.clock_memory_layout(), now)),
        None => {
            info!("emulating clock from tick counter");
            Backend::Emulated(EmulatedClock::new(
                nvram,
                config.nvram_layout(),
                *config.build_timestamp(),
            ))
        }
    };
    Clock::new(base, config, now_ms)
}
