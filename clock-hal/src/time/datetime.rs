//! Wall-clock date/time value with second resolution.

#[cfg(feature = "chrono")]
use chrono::{Datelike, Timelike};

/// Represents a date and time without validation.
/// This struct is used to make it easier to construct a validated datetime.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub struct UncheckedDatetime {
    /// The year component of the date.
    pub year: u16,
    /// The month component of the date (1-12).
    pub month: u8,
    /// The day component of the date (1-31).
    pub day: u8,
    /// The hour component of the time (0-23).
    pub hour: u8,
    /// The minute component of the time (0-59).
    pub minute: u8,
    /// The second component of the time (0-59).
    pub second: u8,
    /// The nanosecond component of the time (0-999_999_999).
    pub nanosecond: u32,
}

#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
/// Represents errors that can occur when constructing a Datetime.
pub enum DatetimeError {
    /// The year is invalid.
    Year,
    /// The month is invalid.
    Month,
    /// The day is invalid.
    Day,
    /// The hour is invalid.
    Hour,
    /// The minute is invalid.
    Minute,
    /// The second is invalid.
    Second,
    /// The nanosecond is invalid.
    Nanosecond,
}

impl core::fmt::Display for DatetimeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let field = match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Nanosecond => "nanosecond",
        };
        write!(f, "{field} out of range")
    }
}

impl Default for UncheckedDatetime {
    fn default() -> Self {
        UncheckedDatetime {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            nanosecond: 0,
        }
    }
}

/// Represents a date and time.
/// Does not support leap seconds.
///
/// Ordering follows the calendar: year first, nanoseconds last.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Default, Copy, Clone)]
pub struct Datetime {
    data: UncheckedDatetime,
}

impl Datetime {
    // 1-based indexing number of days in each month.
    // Note that the last month here is November, not December.
    const DAYS_IN_MONTH: [u64; 12] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30];

    const SECONDS_PER_DAY: u64 = 86_400;

    /// Convert a datetime to seconds since 1970-01-01 00:00:00, ignoring leap seconds.
    pub const fn to_unix_time_seconds(&self) -> u64 {
        let mut days: u64 = 0;

        let mut year = 1970;
        while year < self.data.year {
            days += Self::days_in_year(year);
            year += 1;
        }

        let mut month = 1;
        while month < self.data.month {
            days += Self::days_in_month(self.data.year, month);
            month += 1;
        }

        days += self.data.day as u64 - 1;

        let secs = self.data.second as u64 + self.data.minute as u64 * 60 + self.data.hour as u64 * 3600;

        days * Self::SECONDS_PER_DAY + secs
    }

    /// Convert seconds since 1970-01-01 00:00:00 (ignoring leap seconds) to a datetime.
    pub const fn from_unix_time_seconds(secs: u64) -> Datetime {
        let mut days = secs / Self::SECONDS_PER_DAY;
        let mut secs = secs % Self::SECONDS_PER_DAY;

        let mut year = 1970;
        while days >= Self::days_in_year(year) {
            days -= Self::days_in_year(year);
            year += 1;
        }

        let mut month = 1;
        while days >= Self::days_in_month(year, month) {
            days -= Self::days_in_month(year, month);
            month += 1;
        }

        let hour = secs / 3600;
        secs %= 3600;
        let minute = secs / 60;
        let second = secs % 60;

        Datetime {
            data: UncheckedDatetime {
                year,
                month,
                day: (days + 1) as u8,
                hour: hour as u8,
                minute: minute as u8,
                second: second as u8,
                nanosecond: 0, // unix time does not have a nanosecond component
            },
        }
    }

    /// Creates a `Datetime` from the given time components.
    pub const fn new(data: UncheckedDatetime) -> Result<Datetime, DatetimeError> {
        if data.year < 1970 {
            return Err(DatetimeError::Year);
        }

        if data.month < 1 || data.month > 12 {
            return Err(DatetimeError::Month);
        }

        if data.day < 1 || data.day as u64 > Self::days_in_month(data.year, data.month) {
            return Err(DatetimeError::Day);
        }

        if data.hour > 23 {
            return Err(DatetimeError::Hour);
        }

        if data.minute > 59 {
            return Err(DatetimeError::Minute);
        }

        if data.second > 59 {
            return Err(DatetimeError::Second);
        }

        if data.nanosecond > 999_999_999 {
            return Err(DatetimeError::Nanosecond);
        }

        Ok(Datetime { data })
    }

    /// Returns the datetime `secs` seconds later, rolling over minutes, hours,
    /// days, months and years as needed. The nanosecond component is dropped.
    pub const fn add_seconds(&self, secs: u32) -> Datetime {
        Self::from_unix_time_seconds(self.to_unix_time_seconds() + secs as u64)
    }

    /// Day of the week, 0 = Sunday through 6 = Saturday.
    pub const fn day_of_week(&self) -> u8 {
        // 1970-01-01 was a Thursday.
        ((self.to_unix_time_seconds() / Self::SECONDS_PER_DAY + 4) % 7) as u8
    }

    /// Returns the year component of the date.
    pub const fn year(&self) -> u16 {
        self.data.year
    }
    /// Returns the month component of the date (1-12).
    pub const fn month(&self) -> u8 {
        self.data.month
    }
    /// Returns the day component of the date (1-31).
    pub const fn day(&self) -> u8 {
        self.data.day
    }
    /// Returns the hour component of the time (0-23).
    pub const fn hour(&self) -> u8 {
        self.data.hour
    }
    /// Returns the minute component of the time (0-59).
    pub const fn minute(&self) -> u8 {
        self.data.minute
    }
    /// Returns the second component of the time (0-59).
    pub const fn second(&self) -> u8 {
        self.data.second
    }
    /// Returns the nanosecond component of the time (0-999_999_999).
    /// Real-time clocks in this crate tick at 1 Hz, so this is normally zero.
    pub const fn nanoseconds(&self) -> u32 {
        self.data.nanosecond
    }

    const fn is_leap_year(year: u16) -> bool {
        (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
    }

    const fn days_in_year(year: u16) -> u64 {
        if Self::is_leap_year(year) {
            366
        } else {
            365
        }
    }

    const fn days_in_month(year: u16, month: u8) -> u64 {
        match month {
            2 if Self::is_leap_year(year) => 29,
            12 => 31,
            1..=11 => Self::DAYS_IN_MONTH[month as usize],
            _ => 0,
        }
    }
}

impl core::fmt::Display for Datetime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.data.year, self.data.month, self.data.day, self.data.hour, self.data.minute, self.data.second
        )
    }
}

#[cfg(feature = "chrono")]
impl TryFrom<chrono::NaiveDateTime> for Datetime {
    type Error = DatetimeError;

    fn try_from(date_time: chrono::NaiveDateTime) -> Result<Datetime, DatetimeError> {
        if date_time.year() < 1970 {
            return Err(DatetimeError::Year);
        }

        // chrono encodes a leap second as a nanosecond value >= 1_000_000_000.
        // Datetime has no leap seconds, so the overflow is dropped.
        let mut ns_without_leap = date_time.and_utc().timestamp_subsec_nanos();
        if ns_without_leap >= 1_000_000_000 {
            ns_without_leap -= 1_000_000_000;
        }

        Ok(Self {
            data: UncheckedDatetime {
                year: date_time.year() as u16,
                month: date_time.month() as u8,
                day: date_time.day() as u8,
                hour: date_time.hour() as u8,
                minute: date_time.minute() as u8,
                second: date_time.second() as u8,
                nanosecond: ns_without_leap,
            },
        })
    }
}

#[cfg(feature = "chrono")]
impl From<Datetime> for chrono::NaiveDateTime {
    fn from(date_time: Datetime) -> Self {
        // Datetime::new upholds a superset of chrono's invariants.
        chrono::NaiveDate::from_ymd_opt(
            date_time.data.year as i32,
            date_time.data.month as u32,
            date_time.data.day as u32,
        )
        .unwrap()
        .and_hms_nano_opt(
            date_time.data.hour as u32,
            date_time.data.minute as u32,
            date_time.data.second as u32,
            date_time.data.nanosecond,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Datetime {
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

    #[test]
    fn test_unix_timestamp_roundtrip() {
        for dt in [
            datetime(1979, 1, 1, 0, 0, 0),
            datetime(2024, 2, 29, 23, 59, 59),
            datetime(2024, 3, 1, 0, 0, 0),
            datetime(2024, 12, 31, 12, 30, 15),
            datetime(2100, 2, 28, 6, 0, 0),
        ] {
            assert_eq!(dt, Datetime::from_unix_time_seconds(dt.to_unix_time_seconds()));
        }
    }

    #[test]
    fn test_unix_time_conversion() {
        let dt = Datetime::from_unix_time_seconds(0);
        assert_eq!(dt, Datetime::default());

        let dt = Datetime::from_unix_time_seconds(86400);
        assert_eq!(dt, datetime(1970, 1, 2, 0, 0, 0));

        // 2020-01-01T00:00:00Z
        assert_eq!(datetime(2020, 1, 1, 0, 0, 0).to_unix_time_seconds(), 1_577_836_800);
    }

    #[test]
    fn test_datetime_bounds() {
        let base = UncheckedDatetime {
            year: 2023,
            month: 2,
            day: 28,
            ..Default::default()
        };

        assert_eq!(Datetime::new(UncheckedDatetime { year: 1969, ..base }), Err(DatetimeError::Year));
        assert_eq!(Datetime::new(UncheckedDatetime { month: 0, ..base }), Err(DatetimeError::Month));
        assert_eq!(Datetime::new(UncheckedDatetime { month: 13, ..base }), Err(DatetimeError::Month));
        assert_eq!(Datetime::new(UncheckedDatetime { day: 0, ..base }), Err(DatetimeError::Day));
        assert_eq!(Datetime::new(UncheckedDatetime { day: 29, ..base }), Err(DatetimeError::Day));
        assert!(Datetime::new(UncheckedDatetime { year: 2024, day: 29, ..base }).is_ok());
        assert_eq!(
            Datetime::new(UncheckedDatetime { month: 4, day: 31, ..base }),
            Err(DatetimeError::Day)
        );
        assert!(Datetime::new(UncheckedDatetime { month: 12, day: 31, ..base }).is_ok());
        assert_eq!(Datetime::new(UncheckedDatetime { hour: 24, ..base }), Err(DatetimeError::Hour));
        assert_eq!(Datetime::new(UncheckedDatetime { minute: 60, ..base }), Err(DatetimeError::Minute));
        assert_eq!(Datetime::new(UncheckedDatetime { second: 60, ..base }), Err(DatetimeError::Second));
        assert_eq!(
            Datetime::new(UncheckedDatetime {
                nanosecond: 1_000_000_000,
                ..base
            }),
            Err(DatetimeError::Nanosecond)
        );
    }

    #[test]
    fn test_add_seconds_rolls_over_calendar() {
        assert_eq!(datetime(2024, 5, 1, 7, 59, 30).add_seconds(30), datetime(2024, 5, 1, 8, 0, 0));
        assert_eq!(datetime(2024, 2, 28, 23, 59, 0).add_seconds(60), datetime(2024, 2, 29, 0, 0, 0));
        assert_eq!(datetime(2023, 2, 28, 23, 59, 0).add_seconds(60), datetime(2023, 3, 1, 0, 0, 0));
        assert_eq!(datetime(2024, 12, 31, 23, 59, 45).add_seconds(15), datetime(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(datetime(2024, 1, 1, 0, 0, 0) > datetime(2023, 12, 31, 23, 59, 59));
        assert!(datetime(2024, 6, 1, 10, 0, 0) < datetime(2024, 6, 1, 10, 0, 1));
        assert!(datetime(2024, 2, 1, 0, 0, 0) > datetime(2024, 1, 31, 0, 0, 0));
    }

    #[test]
    fn test_day_of_week() {
        assert_eq!(Datetime::default().day_of_week(), 4);
        // 2024-06-02 was a Sunday.
        assert_eq!(datetime(2024, 6, 2, 12, 0, 0).day_of_week(), 0);
        assert_eq!(datetime(2024, 6, 8, 12, 0, 0).day_of_week(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(datetime(2024, 3, 9, 7, 5, 0).to_string(), "2024-03-09 07:05:00");
    }

    #[test]
    #[cfg(feature = "chrono")]
    fn test_chrono_conversion() {
        use chrono::{NaiveDate, NaiveDateTime};

        let dt = Datetime::new(UncheckedDatetime {
            year: 2023,
            month: 10,
            day: 4,
            hour: 16,
            minute: 30,
            second: 45,
            nanosecond: 123_456_789,
        })
        .expect("Datetime should be valid");

        let chrono_dt: NaiveDateTime = dt.into();
        assert_eq!(
            chrono_dt,
            NaiveDate::from_ymd_opt(2023, 10, 4)
                .expect("Should be a valid NaiveDate")
                .and_hms_nano_opt(16, 30, 45, 123_456_789)
                .expect("Should be a valid NaiveTime")
        );
        assert_eq!(Datetime::try_from(chrono_dt), Ok(dt));

        let chrono_early_dt: NaiveDateTime = NaiveDate::from_ymd_opt(1969, 12, 31)
            .expect("Should be a valid NaiveDate")
            .and_hms_opt(23, 59, 59)
            .expect("Should be a valid NaiveTime");
        assert_eq!(Datetime::try_from(chrono_early_dt), Err(DatetimeError::Year));
    }
}
