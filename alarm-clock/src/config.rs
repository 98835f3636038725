//! Start-up configuration.

use clock_hal::time::Datetime;

use crate::storage::AlarmLayout;

/// Snooze step used when none is configured.
pub const DEFAULT_SNOOZE_MINUTES: u8 = 5;

/// First hour (inclusive) shown as daytime.
pub const DEFAULT_DAY_START_HOUR: u8 = 6;

/// Last hour (inclusive) shown as daytime.
pub const DEFAULT_DAY_END_HOUR: u8 = 18;

/// Reason a configuration value was rejected.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ConfigError {
    /// Snooze step must be between 1 and 59 minutes.
    SnoozeMinutes,
    /// Daytime hours must be 0-23 with the start not after the end.
    Daytime,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SnoozeMinutes => write!(f, "snooze step must be 1-59 minutes"),
            Self::Daytime => write!(f, "daytime must be an ordered range of hours 0-23"),
        }
    }
}

/// Clock configuration, fixed for the lifetime of the process.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Config {
    build_timestamp: Datetime,
    snooze_minutes: u8,
    day_start_hour: u8,
    day_end_hour: u8,
    clock_memory_layout: AlarmLayout,
    nvram_layout: AlarmLayout,
}

impl Config {
    /// Creates a configuration with default settings.
    ///
    /// `build_timestamp` is the moment the firmware was built. A real-time clock
    /// reporting an earlier time is considered unset, and the emulated clock
    /// starts from it.
    pub const fn new(build_timestamp: Datetime) -> Self {
        Self {
            build_timestamp,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            clock_memory_layout: AlarmLayout::CLOCK_MEMORY,
            nvram_layout: AlarmLayout::NVRAM,
        }
    }

    /// Sets how far each snooze pushes the alarm.
    pub const fn with_snooze_minutes(mut self, minutes: u8) -> Result<Self, ConfigError> {
        if minutes == 0 || minutes > 59 {
            return Err(ConfigError::SnoozeMinutes);
        }
        self.snooze_minutes = minutes;
        Ok(self)
    }

    /// Sets the inclusive range of hours reported as daytime.
    pub const fn with_daytime(mut self, start_hour: u8, end_hour: u8) -> Result<Self, ConfigError> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(ConfigError::Daytime);
        }
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        Ok(self)
    }

    /// Sets where the alarm is kept in real-time-clock memory.
    pub const fn with_clock_memory_layout(mut self, layout: AlarmLayout) -> Self {
        self.clock_memory_layout = layout;
        self
    }

    /// Sets where the alarm is kept in the fallback NVRAM region.
    pub const fn with_nvram_layout(mut self, layout: AlarmLayout) -> Self {
        self.nvram_layout = layout;
        self
    }

    /// Returns the firmware build timestamp.
    pub const fn build_timestamp(&self) -> &Datetime {
        &self.build_timestamp
    }

    /// Returns the snooze step in minutes.
    pub const fn snooze_minutes(&self) -> u8 {
        self.snooze_minutes
    }

    /// Returns the first daytime hour.
    pub const fn day_start_hour(&self) -> u8 {
        self.day_start_hour
    }

    /// Returns the last daytime hour.
    pub const fn day_end_hour(&self) -> u8 {
        self.day_end_hour
    }

    /// Returns the alarm layout in real-time-clock memory.
    pub const fn clock_memory_layout(&self) -> AlarmLayout {
        self.clock_memory_layout
    }

    /// Returns the alarm layout in NVRAM.
    pub const fn nvram_layout(&self) -> AlarmLayout {
        self.nvram_layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(Datetime::default());
        assert_eq!(config.snooze_minutes(), 5);
        assert_eq!((config.day_start_hour(), config.day_end_hour()), (6, 18));
        assert_eq!(config.clock_memory_layout(), AlarmLayout::CLOCK_MEMORY);
        assert_eq!(config.nvram_layout(), AlarmLayout::NVRAM);
    }

    #[test]
    fn test_snooze_bounds() {
        let config = Config::new(Datetime::default());
        assert_eq!(config.with_snooze_minutes(0), Err(ConfigError::SnoozeMinutes));
        assert_eq!(config.with_snooze_minutes(60), Err(ConfigError::SnoozeMinutes));
        assert_eq!(
            config.with_snooze_minutes(9).map(|c| c.snooze_minutes()),
            Ok(9)
        );
    }

    #[test]
    fn test_daytime_bounds() {
        let config = Config::new(Datetime::default());
        assert_eq!(config.with_daytime(19, 7), Err(ConfigError::Daytime));
        assert_eq!(config.with_daytime(7, 24), Err(ConfigError::Daytime));
        let config = config.with_daytime(7, 19).expect("valid daytime");
        assert_eq!((config.day_start_hour(), config.day_end_hour()), (7, 19));
    }
}
