//! Persisted alarm record.
//!
//! Three bytes: hour, minute and an enable flag. The flag holds
//! [`ENABLED_MARKER`] when the alarm is on; any other value reads as off, so
//! blank or erased memory never enables an alarm.

use crate::alarm::AlarmTime;

/// Flag value for an enabled alarm.
pub const ENABLED_MARKER: u8 = 0xEA;

/// Flag value written for a disabled alarm.
pub const DISABLED_MARKER: u8 = 0x00;

/// Byte offsets of the alarm record within a storage region.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct AlarmLayout {
    /// Offset of the hour byte.
    pub hour: u8,
    /// Offset of the minute byte.
    pub minute: u8,
    /// Offset of the enable flag.
    pub enabled: u8,
}

impl AlarmLayout {
    /// Layout in the battery-backed memory of a real-time clock chip.
    pub const CLOCK_MEMORY: Self = Self {
        hour: 0x00,
        minute: 0x01,
        enabled: 0x02,
    };

    /// Layout in the fallback NVRAM region.
    pub const NVRAM: Self = Self {
        hour: 1,
        minute: 2,
        enabled: 0,
    };

    /// True if every field lies within a region of `size` bytes.
    pub fn fits(&self, size: usize) -> bool {
        [self.hour, self.minute, self.enabled]
            .iter()
            .all(|offset| usize::from(*offset) < size)
    }
}

/// Alarm configuration as it is kept across power cycles.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Default, Copy, Clone)]
pub struct StoredAlarm {
    /// `None` if the stored hour or minute was out of range.
    pub time: Option<AlarmTime>,
    /// True only if the flag byte held [`ENABLED_MARKER`].
    pub enabled: bool,
}

impl StoredAlarm {
    /// Decodes the raw record. Out-of-range values mean no alarm was ever
    /// configured, which also forces the alarm off.
    pub fn decode(hour: u8, minute: u8, flag: u8) -> Self {
        match AlarmTime::new(hour, minute) {
            Ok(time) => Self {
                time: Some(time),
                enabled: flag == ENABLED_MARKER,
            },
            Err(_) => Self::default(),
        }
    }

    /// Encodes the record as `(hour, minute, flag)`. An unset time is stored as midnight.
    pub fn encode(&self) -> (u8, u8, u8) {
        let time = self.time.unwrap_or_default();
        let flag = if self.enabled { ENABLED_MARKER } else { DISABLED_MARKER };
        (time.hour(), time.minute(), flag)
    }
}
