//! Where the clock's time comes from and where its alarm is kept.
//!
//! A [`HardwareClock`] trusts a battery-backed real-time clock chip and stores
//! the alarm in the chip's memory. An [`EmulatedClock`] counts time from the
//! millisecond tick and stores the alarm in NVRAM. [`Backend`] holds whichever
//! one start-up probing selected.

use clock_hal::time::{ClockMemory, Datetime, DatetimeClock};
use clock_hal::Nvram;

use crate::storage::{AlarmLayout, StoredAlarm};

/// Time and alarm persistence capability used by [`crate::Clock`].
///
/// Implementations absorb device errors: they log and fall back rather than
/// fail, so the clock keeps running.
pub trait TimeBase {
    /// True when time comes from a real-time clock chip.
    fn has_hardware_clock(&self) -> bool;

    /// The current time when the clock starts.
    fn startup_time(&mut self) -> Datetime;

    /// The time at the end of a polling cycle that started at `now` and was
    /// planned to last `elapsed_secs`.
    fn advance(&mut self, now: &Datetime, elapsed_secs: u32) -> Datetime;

    /// Re-reads the authoritative time at coarse boundaries. Sources without
    /// an independent reference return `now` unchanged.
    fn resync(&mut self, now: &Datetime) -> Datetime;

    /// Adopts `now` as the current time.
    fn write_time(&mut self, now: &Datetime);

    /// Reads the persisted alarm configuration.
    fn load_alarm(&mut self) -> StoredAlarm;

    /// Persists the alarm configuration before returning.
    fn save_alarm(&mut self, alarm: &StoredAlarm);
}

/// Time base backed by a real-time clock chip.
pub struct HardwareClock<R> {
    rtc: R,
    layout: AlarmLayout,
    last_read: Datetime,
}

impl<R: DatetimeClock + ClockMemory> HardwareClock<R> {
    /// Wraps a chip that is known to be running. `last_read` is the time it
    /// reported most recently.
    pub fn new(rtc: R, layout: AlarmLayout, last_read: Datetime) -> Self {
        if !layout.fits(rtc.memory_size()) {
            warn!("alarm layout exceeds {} bytes of clock memory", rtc.memory_size());
        }
        Self {
            rtc,
            layout,
            last_read,
        }
    }

    /// Returns the chip.
    pub fn rtc(&self) -> &R {
        &self.rtc
    }

    /// Returns the chip mutably.
    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    /// Releases the chip.
    pub fn release(self) -> R {
        self.rtc
    }

    fn read(&mut self) -> Option<Datetime> {
        match self.rtc.get_current_datetime() {
            Ok(now) => {
                self.last_read = now;
                Some(now)
            }
            Err(e) => {
                warn!("reading real-time clock failed: {:?}", e);
                None
            }
        }
    }

    fn read_memory(&mut self, address: u8) -> Option<u8> {
        self.rtc
            .read_memory(address)
            .map_err(|e| warn!("reading clock memory {} failed: {:?}", address, e))
            .ok()
    }

    fn write_memory(&mut self, address: u8, value: u8) {
        if let Err(e) = self.rtc.write_memory(address, value) {
            error!("writing clock memory {} failed: {:?}", address, e);
        }
    }
}

impl<R: DatetimeClock + ClockMemory> TimeBase for HardwareClock<R> {
    fn has_hardware_clock(&self) -> bool {
        true
    }

    fn startup_time(&mut self) -> Datetime {
        self.read().unwrap_or(self.last_read)
    }

    fn advance(&mut self, now: &Datetime, elapsed_secs: u32) -> Datetime {
        self.read().unwrap_or_else(|| now.add_seconds(elapsed_secs))
    }

    fn resync(&mut self, now: &Datetime) -> Datetime {
        debug!("resynchronizing with real-time clock");
        self.read().unwrap_or(*now)
    }

    fn write_time(&mut self, now: &Datetime) {
        match self.rtc.set_current_datetime(now) {
            Ok(()) => self.last_read = *now,
            Err(e) => error!("setting real-time clock failed: {:?}", e),
        }
    }

    fn load_alarm(&mut self) -> StoredAlarm {
        let layout = self.layout;
        match (
            self.read_memory(layout.hour),
            self.read_memory(layout.minute),
            self.read_memory(layout.enabled),
        ) {
            (Some(hour), Some(minute), Some(flag)) => StoredAlarm::decode(hour, minute, flag),
            _ => StoredAlarm::default(),
        }
    }

    fn save_alarm(&mut self, alarm: &StoredAlarm) {
        debug!("storing alarm in clock memory");
        let layout = self.layout;
        let (hour, minute, flag) = alarm.encode();
        self.write_memory(layout.hour, hour);
        self.write_memory(layout.minute, minute);
        self.write_memory(layout.enabled, flag);
    }
}

/// Time base that counts time itself, starting from a fixed seed such as the
/// firmware build timestamp.
pub struct EmulatedClock<N> {
    nvram: N,
    layout: AlarmLayout,
    seed: Datetime,
}

impl<N: Nvram> EmulatedClock<N> {
    /// Starts counting from `seed`, keeping the alarm at `layout` in `nvram`.
    pub fn new(nvram: N, layout: AlarmLayout, seed: Datetime) -> Self {
        if !layout.fits(nvram.len()) {
            warn!("alarm layout exceeds {} bytes of nvram", nvram.len());
        }
        Self { nvram, layout, seed }
    }

    /// Releases the NVRAM region.
    pub fn release(self) -> N {
        self.nvram
    }
}

impl<N: Nvram> TimeBase for EmulatedClock<N> {
    fn has_hardware_clock(&self) -> bool {
        false
    }

    fn startup_time(&mut self) -> Datetime {
        self.seed
    }

    fn advance(&mut self, now: &Datetime, elapsed_secs: u32) -> Datetime {
        now.add_seconds(elapsed_secs)
    }

    fn resync(&mut self, now: &Datetime) -> Datetime {
        *now
    }

    fn write_time(&mut self, now: &Datetime) {
        self.seed = *now;
    }

    fn load_alarm(&mut self) -> StoredAlarm {
        let layout = self.layout;
        StoredAlarm::decode(
            self.nvram.read(layout.hour.into()),
            self.nvram.read(layout.minute.into()),
            self.nvram.read(layout.enabled.into()),
        )
    }

    fn save_alarm(&mut self, alarm: &StoredAlarm) {
        debug!("storing alarm in nvram");
        let layout = self.layout;
        let (hour, minute, flag) = alarm.encode();
        self.nvram.write(layout.enabled.into(), flag);
        self.nvram.write(layout.hour.into(), hour);
        self.nvram.write(layout.minute.into(), minute);
        self.nvram.commit();
    }
}

/// The time base chosen at start-up.
pub enum Backend<R, N> {
    Hardware(HardwareClock<R>),
    Emulated(EmulatedClock<N>),
}

macro_rules! delegate {
    ($self:ident, $base:ident => $call:expr) => {
        match $self {
            Backend::Hardware($base) => $call,
            Backend::Emulated($base) => $call,
        }
    };
}

impl<R: DatetimeClock + ClockMemory, N: Nvram> TimeBase for Backend<R, N> {
    fn has_hardware_clock(&self) -> bool {
        delegate!(self, base => base.has_hardware_clock())
    }

    fn startup_time(&mut self) -> Datetime {
        delegate!(self, base => base.startup_time())
    }

    fn advance(&mut self, now: &Datetime, elapsed_secs: u32) -> Datetime {
        delegate!(self, base => base.advance(now, elapsed_secs))
    }

    fn resync(&mut self, now: &Datetime) -> Datetime {
        delegate!(self, base => base.resync(now))
    }

    fn write_time(&mut self, now: &Datetime) {
        delegate!(self, base => base.write_time(now))
    }

    fn load_alarm(&mut self) -> StoredAlarm {
        delegate!(self, base => base.load_alarm())
    }

    fn save_alarm(&mut self, alarm: &StoredAlarm) {
        delegate!(self, base => base.save_alarm(alarm))
    }
}
