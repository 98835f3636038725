//! Minute-resolution clock with a single daily alarm.
//!
//! The clock is polled from the main loop with the current millisecond tick.
//! It only does work once per minute: at the planned minute boundary it
//! updates the time from its [`TimeBase`], classifies which unit rolled over
//! and checks the alarm. The next boundary is planned `60 - second` seconds
//! ahead so evaluation stays aligned with whole minutes.

use core::fmt::Write;

use clock_hal::time::{ticks_since, Datetime, TickSource};

use crate::alarm::{Alarm, AlarmLabel, AlarmTime, AlarmTimeError};
use crate::config::Config;
use crate::storage::StoredAlarm;
use crate::timebase::TimeBase;

/// Alarm display text, see [`AlarmLabel`].
pub type AlarmText = heapless::String<{ AlarmLabel::WIDTH }>;

/// The most significant unit of time that rolled over during a poll.
/// A new day is also a new hour and minute; only the day is reported.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Boundary {
    /// A new minute within the same hour.
    Minute,
    /// A new hour within the same day.
    Hour,
    /// A new calendar day.
    Day,
}

/// One minute-polling cycle in tick-counter milliseconds.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
struct Cycle {
    start: u32,
    next: u32,
}

impl Cycle {
    fn begin(start: u32, now: &Datetime) -> Self {
        let remaining_secs = 60 - u32::from(now.second());
        Self {
            start,
            next: start.wrapping_add(remaining_secs * 1000),
        }
    }

    fn length_ms(&self) -> u32 {
        ticks_since(self.start, self.next)
    }

    fn is_due(&self, tick: u32) -> bool {
        ticks_since(self.start, tick) >= self.length_ms()
    }
}

/// Clock and alarm state machine.
pub struct Clock<T> {
    base: T,
    config: Config,
    now: Datetime,
    cycle: Cycle,
    alarm: Alarm,
}

impl<T: TimeBase> Clock<T> {
    /// Starts the clock at tick `now_ms`, reading the current time and the
    /// persisted alarm from `base`.
    pub fn new(mut base: T, config: Config, now_ms: u32) -> Self {
        let now = base.startup_time();
        let stored = base.load_alarm();
        match stored.time {
            Some(time) => info!(
                "alarm {:02}:{:02} restored, enabled: {}",
                time.hour(),
                time.minute(),
                stored.enabled
            ),
            None => info!("no valid alarm stored"),
        }

        let cycle = Cycle::begin(now_ms, &now);
        debug!(
            "clock started at {:02}:{:02}:{:02}, next check at {}",
            now.hour(),
            now.minute(),
            now.second(),
            cycle.next
        );

        Self {
            base,
            config,
            now,
            cycle,
            alarm: Alarm::restore(stored.time, stored.enabled),
        }
    }

    /// Advances the clock. Returns the boundary crossed, or `None` while the
    /// current minute has not yet elapsed.
    pub fn poll(&mut self, now_ms: u32) -> Option<Boundary> {
        if !self.cycle.is_due(now_ms) {
            return None;
        }

        let (day, hour) = (self.now.day(), self.now.hour());
        // Planned length, not the actual time since the last poll, so late
        // polls do not count the overshoot twice.
        self.now = self.base.advance(&self.now, self.cycle.length_ms() / 1000);

        let boundary = if day != self.now.day() {
            Boundary::Day
        } else if hour != self.now.hour() {
            Boundary::Hour
        } else {
            Boundary::Minute
        };
        trace!(
            "{:?} boundary at {:02}:{:02}:{:02}",
            boundary,
            self.now.hour(),
            self.now.minute(),
            self.now.second()
        );

        if self.alarm.is_enabled() && self.alarm.evaluate(&self.now) {
            info!("alarm at {:02}:{:02}", self.now.hour(), self.now.minute());
        }

        if boundary >= Boundary::Hour {
            self.now = self.base.resync(&self.now);
        }

        self.cycle = Cycle::begin(now_ms, &self.now);
        Some(boundary)
    }

    /// [`Clock::poll`] with the current reading of `ticks`.
    pub fn poll_source<S: TickSource>(&mut self, ticks: &S) -> Option<Boundary> {
        self.poll(ticks.now_millis())
    }

    /// Sets the current time, writing it to the real-time clock if there is one,
    /// and restarts the minute cycle at tick `now_ms`.
    pub fn set_datetime(&mut self, datetime: Datetime, now_ms: u32) {
        info!(
            "clock set to {:02}:{:02}:{:02}",
            datetime.hour(),
            datetime.minute(),
            datetime.second()
        );
        self.base.write_time(&datetime);
        self.now = datetime;
        self.cycle = Cycle::begin(now_ms, &self.now);
    }

    /// Enables or disables the alarm. Stops it firing and ends any snooze.
    /// Returns whether it was enabled before.
    pub fn set_alarm_enabled(&mut self, enable: bool) -> bool {
        let previous = self.alarm.set_enabled(enable);
        info!("alarm {}", if enable { "enabled" } else { "disabled" });
        self.save_alarm();
        previous
    }

    /// Sets the alarm time and enables the alarm. Out-of-range input is
    /// rejected before anything changes.
    pub fn set_alarm_time(&mut self, hour: u8, minute: u8) -> Result<(), AlarmTimeError> {
        let time = AlarmTime::new(hour, minute)?;
        self.alarm.set_time(time);
        if !self.alarm.is_enabled() {
            self.set_alarm_enabled(true);
        }
        self.save_alarm();
        Ok(())
    }

    /// Steps the alarm time by one minute and/or one hour, enabling the alarm
    /// if needed. Only the sign of each delta counts: a positive delta moves
    /// one unit later, a negative one one unit earlier, zero leaves the unit
    /// alone. The minute step carries into the hour. Returns the new time.
    pub fn set_alarm_relative(&mut self, hour_delta: i32, minute_delta: i32) -> AlarmTime {
        if !self.alarm.is_enabled() {
            self.set_alarm_enabled(true);
        }
        let time = self.alarm.step(hour_delta, minute_delta);
        debug!("alarm moved to {:02}:{:02}", time.hour(), time.minute());
        self.save_alarm();
        time
    }

    /// Moves the alarm one minute later.
    pub fn step_alarm(&mut self) -> AlarmTime {
        self.set_alarm_relative(0, 1)
    }

    /// Silences a firing alarm. Snoozing pushes the next firing by the
    /// configured snooze step; `for_24_hours` skips to the next daily occurrence.
    /// Snooze state is not persisted.
    pub fn snooze(&mut self, for_24_hours: bool) {
        match self.alarm.snooze(for_24_hours, self.config.snooze_minutes()) {
            Some(time) => info!("snoozing until {:02}:{:02}", time.hour(), time.minute()),
            None if self.alarm.is_enabled() => info!("alarm silenced until tomorrow"),
            None => {}
        }
    }

    /// Flips the alarm on or off. Returns the new state.
    pub fn toggle_alarm(&mut self) -> bool {
        let enable = !self.alarm.is_enabled();
        self.set_alarm_enabled(enable);
        enable
    }

    /// Six-character alarm text: blank when disabled, `*HH:MM` while
    /// snoozing, ` HH:MM` otherwise.
    pub fn format_alarm_time(&self) -> AlarmText {
        let mut text = AlarmText::new();
        // Every label is exactly `AlarmLabel::WIDTH` characters.
        let written = write!(text, "{}", self.alarm.label());
        debug_assert!(written.is_ok());
        text
    }

    /// Alarm state in display form, see [`AlarmLabel`].
    pub fn alarm_label(&self) -> AlarmLabel {
        self.alarm.label()
    }

    /// True from the configured start hour through the end hour, inclusive.
    pub fn is_daytime(&self) -> bool {
        (self.config.day_start_hour()..=self.config.day_end_hour()).contains(&self.now.hour())
    }

    /// The current time, updated once per minute.
    pub fn now(&self) -> &Datetime {
        &self.now
    }

    /// True when time comes from a real-time clock chip. Fixed at start-up.
    pub fn has_hardware_clock(&self) -> bool {
        self.base.has_hardware_clock()
    }

    /// True from the minute the alarm matches until it is silenced or the minute ends.
    pub fn is_alarm_firing(&self) -> bool {
        self.alarm.is_firing()
    }

    /// True if the alarm is switched on.
    pub fn is_alarm_enabled(&self) -> bool {
        self.alarm.is_enabled()
    }

    /// True once an alarm time was restored or configured.
    pub fn is_alarm_valid(&self) -> bool {
        self.alarm.is_valid()
    }

    /// The configured alarm time, `None` if never configured.
    pub fn alarm_time(&self) -> Option<AlarmTime> {
        self.alarm.time()
    }

    /// The time a snoozed alarm fires again.
    pub fn snooze_time(&self) -> Option<AlarmTime> {
        self.alarm.snooze_time()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the time base.
    pub fn time_base(&self) -> &T {
        &self.base
    }

    /// Returns the time base mutably.
    pub fn time_base_mut(&mut self) -> &mut T {
        &mut self.base
    }

    /// Stops the clock and hands back its time base.
    pub fn release(self) -> T {
        self.base
    }

    fn save_alarm(&mut self) {
        let stored = StoredAlarm {
            time: Some(self.alarm.materialize()),
            enabled: self.alarm.is_enabled(),
        };
        self.base.save_alarm(&stored);
    }
}
