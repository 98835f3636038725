//! Daily alarm: configured time, snooze and firing state.
//!
//! Everything here is pure state arithmetic. Persisting the configuration is
//! the caller's job, see [`crate::Clock`].

use core::cmp::Ordering;
use core::fmt;

use clock_hal::time::Datetime;

const HOURS_PER_DAY: u8 = 24;
const MINUTES_PER_HOUR: u8 = 60;
const MINUTES_PER_DAY: u16 = HOURS_PER_DAY as u16 * MINUTES_PER_HOUR as u16;

/// Reason an alarm time was rejected.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum AlarmTimeError {
    /// Hour outside 0-23.
    Hour,
    /// Minute outside 0-59.
    Minute,
}

impl fmt::Display for AlarmTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "alarm hour must be 0-23"),
            Self::Minute => write!(f, "alarm minute must be 0-59"),
        }
    }
}

/// A time of day with minute resolution, always in range.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Default, Copy, Clone)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Creates an alarm time, rejecting an hour above 23 or a minute above 59.
    pub const fn new(hour: u8, minute: u8) -> Result<Self, AlarmTimeError> {
        if hour >= HOURS_PER_DAY {
            return Err(AlarmTimeError::Hour);
        }
        if minute >= MINUTES_PER_HOUR {
            return Err(AlarmTimeError::Minute);
        }
        Ok(Self { hour, minute })
    }

    /// Returns the hour (0-23).
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// One minute later, carrying into the hour and wrapping 23:59 to 00:00.
    pub const fn next_minute(self) -> Self {
        if self.minute + 1 < MINUTES_PER_HOUR {
            Self {
                minute: self.minute + 1,
                ..self
            }
        } else {
            Self { minute: 0, ..self }.next_hour()
        }
    }

    /// One minute earlier, borrowing from the hour and wrapping 00:00 to 23:59.
    pub const fn previous_minute(self) -> Self {
        if self.minute > 0 {
            Self {
                minute: self.minute - 1,
                ..self
            }
        } else {
            Self {
                minute: MINUTES_PER_HOUR - 1,
                ..self
            }
            .previous_hour()
        }
    }

    /// One hour later, wrapping 23 to 0. The minute is kept.
    pub const fn next_hour(self) -> Self {
        let hour = if self.hour + 1 < HOURS_PER_DAY { self.hour + 1 } else { 0 };
        self.with_hour(hour)
    }

    /// One hour earlier, wrapping 0 to 23. The minute is kept.
    pub const fn previous_hour(self) -> Self {
        let hour = if self.hour > 0 { self.hour - 1 } else { HOURS_PER_DAY - 1 };
        self.with_hour(hour)
    }

    /// `minutes` later, wrapping past midnight.
    pub const fn add_minutes(self, minutes: u8) -> Self {
        let total = (self.minutes_of_day() + minutes as u16) % MINUTES_PER_DAY;
        Self {
            hour: (total / MINUTES_PER_HOUR as u16) as u8,
            minute: (total % MINUTES_PER_HOUR as u16) as u8,
        }
    }

    /// True if `now` falls within this minute of the day.
    pub const fn matches(&self, now: &Datetime) -> bool {
        self.hour == now.hour() && self.minute == now.minute()
    }

    const fn minutes_of_day(&self) -> u16 {
        self.hour as u16 * MINUTES_PER_HOUR as u16 + self.minute as u16
    }

    const fn with_hour(self, hour: u8) -> Self {
        Self { hour, ..self }
    }
}

/// Steps `time` by the sign of `minute_delta` and then of `hour_delta`.
/// Magnitudes are ignored: each non-zero delta moves exactly one unit.
pub(crate) fn step(time: AlarmTime, hour_delta: i32, minute_delta: i32) -> AlarmTime {
    let time = match minute_delta.cmp(&0) {
        Ordering::Greater => time.next_minute(),
        Ordering::Less => time.previous_minute(),
        Ordering::Equal => time,
    };
    match hour_delta.cmp(&0) {
        Ordering::Greater => time.next_hour(),
        Ordering::Less => time.previous_hour(),
        Ordering::Equal => time,
    }
}

/// Alarm configuration plus the transient snooze and firing state.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Default, Copy, Clone)]
pub struct Alarm {
    /// Configured time; `None` until loaded from storage or set.
    time: Option<AlarmTime>,
    /// Next firing time while snoozing.
    snooze: Option<AlarmTime>,
    enabled: bool,
    firing: bool,
}

impl Alarm {
    /// Restores a persisted configuration. Nothing is snoozing or firing.
    pub const fn restore(time: Option<AlarmTime>, enabled: bool) -> Self {
        Self {
            time,
            snooze: None,
            enabled,
            firing: false,
        }
    }

    /// Returns the configured time.
    pub const fn time(&self) -> Option<AlarmTime> {
        self.time
    }

    /// Returns the next firing time while snoozing.
    pub const fn snooze_time(&self) -> Option<AlarmTime> {
        self.snooze
    }

    /// Returns whether the alarm is switched on.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the alarm is currently firing.
    pub const fn is_firing(&self) -> bool {
        self.firing
    }

    /// True once a time was restored or set.
    pub const fn is_valid(&self) -> bool {
        self.time.is_some()
    }

    /// The configured time, or midnight if none was ever configured.
    pub fn base_time(&self) -> AlarmTime {
        self.time.unwrap_or_default()
    }

    /// Pins the configured time, defaulting an unconfigured alarm to midnight.
    pub(crate) fn materialize(&mut self) -> AlarmTime {
        *self.time.get_or_insert_with(AlarmTime::default)
    }

    /// Updates the firing state for the minute `now`. A disabled alarm keeps
    /// its previous state; disabling clears it.
    pub fn evaluate(&mut self, now: &Datetime) -> bool {
        if self.enabled {
            self.firing = self.time.is_some_and(|t| t.matches(now)) || self.snooze.is_some_and(|t| t.matches(now));
        }
        self.firing
    }

    /// Enables or disables the alarm, ending any snooze. Returns the previous state.
    pub fn set_enabled(&mut self, enable: bool) -> bool {
        let previous = self.enabled;
        self.firing = false;
        self.snooze = None;
        self.enabled = enable;
        previous
    }

    /// Replaces the configured time and ends any snooze.
    pub fn set_time(&mut self, time: AlarmTime) {
        self.time = Some(time);
        self.snooze = None;
    }

    /// Moves the configured time one step in the direction of each delta.
    pub fn step(&mut self, hour_delta: i32, minute_delta: i32) -> AlarmTime {
        let time = step(self.base_time(), hour_delta, minute_delta);
        self.set_time(time);
        time
    }

    /// Silences the alarm. With `for_24_hours` the alarm waits for its next
    /// daily occurrence, otherwise it fires again `minutes` after the current
    /// snooze time, or after the configured time on the first snooze.
    pub fn snooze(&mut self, for_24_hours: bool, minutes: u8) -> Option<AlarmTime> {
        self.firing = false;
        if !self.enabled {
            return None;
        }

        self.snooze = if for_24_hours {
            None
        } else {
            let from = self.snooze.unwrap_or_else(|| self.base_time());
            Some(from.add_minutes(minutes))
        };
        self.snooze
    }

    /// Six-character display text for the alarm.
    pub fn label(&self) -> AlarmLabel {
        if !self.enabled {
            AlarmLabel::Off
        } else if let Some(snooze) = self.snooze {
            AlarmLabel::Snoozed(snooze)
        } else {
            AlarmLabel::Set(self.base_time())
        }
    }
}

/// Display form of the alarm state, always six characters wide:
/// blank when disabled, `*HH:MM` while snoozing, ` HH:MM` otherwise.
/// The hour is space padded and the minute zero padded.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum AlarmLabel {
    /// Alarm disabled.
    Off,
    /// Snoozed until the given time.
    Snoozed(AlarmTime),
    /// Enabled for the given time.
    Set(AlarmTime),
}

impl AlarmLabel {
    /// Characters in every label.
    pub const WIDTH: usize = 6;
}

impl fmt::Display for AlarmLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (marker, time) = match self {
            Self::Off => return f.write_str("      "),
            Self::Snoozed(time) => ('*', time),
            Self::Set(time) => (' ', time),
        };
        write!(f, "{}{:>2}:{:02}", marker, time.hour(), time.minute())
    }
}
