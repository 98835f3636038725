//! DS1307 I²C real-time clock.
//!
//! Time is kept in BCD registers 0x00-0x06. Bit 7 of the seconds register is
//! the clock-halt flag. 56 bytes of battery-backed RAM follow at 0x08-0x3F.

use clock_hal::time::{ClockMemory, Datetime, DatetimeClock, DatetimeClockError, DatetimeError, UncheckedDatetime};
use embedded_hal::i2c::I2c;

/// Fixed bus address of the DS1307.
pub const ADDRESS: u8 = 0x68;

/// Size of the battery-backed RAM.
pub const RAM_SIZE: usize = 56;

const REG_SECONDS: u8 = 0x00;
const REG_RAM: u8 = 0x08;

const CLOCK_HALT: u8 = 0x80;
const HOUR_12H: u8 = 0x40;
const HOUR_PM: u8 = 0x20;

const BASE_YEAR: u16 = 2000;

fn bcd_decode(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn decode_hour(reg: u8) -> u8 {
    if reg & HOUR_12H == 0 {
        return bcd_decode(reg & 0x3F);
    }
    // 12 AM is midnight, 12 PM is noon.
    let hour = bcd_decode(reg & 0x1F) % 12;
    if reg & HOUR_PM != 0 {
        hour + 12
    } else {
        hour
    }
}

/// DS1307 driver owning its I²C bus.
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    /// Creates the driver. The chip is not accessed until first use.
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Releases the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), DatetimeClockError> {
        self.i2c
            .write_read(ADDRESS, &[start], buf)
            .map_err(|_| DatetimeClockError::Bus)
    }

    fn write_registers(&mut self, data: &[u8]) -> Result<(), DatetimeClockError> {
        self.i2c.write(ADDRESS, data).map_err(|_| DatetimeClockError::Bus)
    }

    fn read_seconds_register(&mut self) -> Result<u8, DatetimeClockError> {
        let mut reg = [0];
        self.read_registers(REG_SECONDS, &mut reg)?;
        Ok(reg[0])
    }
}

impl<I2C: I2c> DatetimeClock for Ds1307<I2C> {
    /// Reads the time. A halted chip still reports the time it stopped at.
    fn get_current_datetime(&mut self) -> Result<Datetime, DatetimeClockError> {
        let mut regs = [0; 7];
        self.read_registers(REG_SECONDS, &mut regs)?;

        let datetime = Datetime::new(UncheckedDatetime {
            second: bcd_decode(regs[0] & 0x7F),
            minute: bcd_decode(regs[1] & 0x7F),
            hour: decode_hour(regs[2]),
            day: bcd_decode(regs[4] & 0x3F),
            month: bcd_decode(regs[5] & 0x1F),
            year: BASE_YEAR + u16::from(bcd_decode(regs[6])),
            nanosecond: 0,
        })?;
        Ok(datetime)
    }

    /// Writes the time in 24-hour mode. Writing the seconds register clears
    /// the clock-halt flag, so this also starts the chip.
    fn set_current_datetime(&mut self, datetime: &Datetime) -> Result<(), DatetimeClockError> {
        let year = datetime
            .year()
            .checked_sub(BASE_YEAR)
            .filter(|year| *year < 100)
            .ok_or(DatetimeClockError::InvalidDatetime(DatetimeError::Year))?;

        self.write_registers(&[
            REG_SECONDS,
            bcd_encode(datetime.second()),
            bcd_encode(datetime.minute()),
            bcd_encode(datetime.hour()),
            datetime.day_of_week() + 1,
            bcd_encode(datetime.day()),
            bcd_encode(datetime.month()),
            bcd_encode(year as u8),
        ])
    }

    fn is_running(&mut self) -> Result<bool, DatetimeClockError> {
        Ok(self.read_seconds_register()? & CLOCK_HALT == 0)
    }

    fn set_running(&mut self, running: bool) -> Result<(), DatetimeClockError> {
        let seconds = self.read_seconds_register()?;
        let seconds = if running {
            seconds & !CLOCK_HALT
        } else {
            seconds | CLOCK_HALT
        };
        self.write_registers(&[REG_SECONDS, seconds])
    }

    const MAX_RESOLUTION_HZ: u32 = 1;
}

impl<I2C: I2c> ClockMemory for Ds1307<I2C> {
    fn memory_size(&self) -> usize {
        RAM_SIZE
    }

    fn read_memory(&mut self, address: u8) -> Result<u8, DatetimeClockError> {
        if usize::from(address) >= RAM_SIZE {
            return Err(DatetimeClockError::OutOfRange);
        }
        let mut value = [0];
        self.read_registers(REG_RAM + address, &mut value)?;
        Ok(value[0])
    }

    fn write_memory(&mut self, address: u8, value: u8) -> Result<(), DatetimeClockError> {
        if usize::from(address) >= RAM_SIZE {
            return Err(DatetimeClockError::OutOfRange);
        }
        self.write_registers(&[REG_RAM + address, value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::datetime;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    fn setup(expectations: &[I2cTrans]) -> Ds1307<I2cMock> {
        Ds1307::new(I2cMock::new(expectations))
    }

    fn finish(dev: Ds1307<I2cMock>) {
        dev.release().done();
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_encode(59), 0x59);
        assert_eq!(bcd_decode(0x59), 59);
        assert_eq!(bcd_encode(7), 0x07);
    }

    #[test]
    fn test_read_datetime() {
        let mut dev = setup(&[I2cTrans::write_read(
            ADDRESS,
            vec![REG_SECONDS],
            vec![0x05, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24],
        )]);

        assert_eq!(dev.get_current_datetime(), Ok(datetime(2024, 3, 14, 15, 30, 5)));
        finish(dev);
    }

    #[test]
    fn test_read_datetime_while_halted() {
        let mut dev = setup(&[I2cTrans::write_read(
            ADDRESS,
            vec![REG_SECONDS],
            vec![0x80 | 0x42, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00],
        )]);

        assert_eq!(dev.get_current_datetime(), Ok(datetime(2000, 1, 1, 0, 0, 42)));
        finish(dev);
    }

    #[test]
    fn test_decode_12_hour_mode() {
        assert_eq!(decode_hour(HOUR_12H | 0x12), 0);
        assert_eq!(decode_hour(HOUR_12H | HOUR_PM | 0x12), 12);
        assert_eq!(decode_hour(HOUR_12H | HOUR_PM | 0x11), 23);
        assert_eq!(decode_hour(HOUR_12H | 0x07), 7);
        assert_eq!(decode_hour(0x23), 23);
    }

    #[test]
    fn test_read_invalid_datetime() {
        let mut dev = setup(&[I2cTrans::write_read(
            ADDRESS,
            vec![REG_SECONDS],
            vec![0x00, 0x60, 0x15, 0x05, 0x14, 0x03, 0x24],
        )]);

        assert_eq!(
            dev.get_current_datetime(),
            Err(DatetimeClockError::InvalidDatetime(DatetimeError::Minute))
        );
        finish(dev);
    }

    #[test]
    fn test_read_bus_error() {
        let mut dev = setup(&[
            I2cTrans::write_read(ADDRESS, vec![REG_SECONDS], vec![0; 7]).with_error(ErrorKind::Other)
        ]);

        assert_eq!(dev.get_current_datetime(), Err(DatetimeClockError::Bus));
        finish(dev);
    }

    #[test]
    fn test_write_datetime() {
        // 2024-03-14 was a Thursday, stored as day 5.
        let mut dev = setup(&[I2cTrans::write(
            ADDRESS,
            vec![REG_SECONDS, 0x05, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24],
        )]);

        assert_eq!(dev.set_current_datetime(&datetime(2024, 3, 14, 15, 30, 5)), Ok(()));
        finish(dev);
    }

    #[test]
    fn test_write_datetime_out_of_range_year() {
        let mut dev = setup(&[]);
        assert_eq!(
            dev.set_current_datetime(&datetime(2100, 1, 1, 0, 0, 0)),
            Err(DatetimeClockError::InvalidDatetime(DatetimeError::Year))
        );
        assert_eq!(
            dev.set_current_datetime(&datetime(1999, 12, 31, 0, 0, 0)),
            Err(DatetimeClockError::InvalidDatetime(DatetimeError::Year))
        );
        finish(dev);
    }

    #[test]
    fn test_running_flag() {
        let mut dev = setup(&[
            I2cTrans::write_read(ADDRESS, vec![REG_SECONDS], vec![0x85]),
            I2cTrans::write_read(ADDRESS, vec![REG_SECONDS], vec![0x85]),
            I2cTrans::write(ADDRESS, vec![REG_SECONDS, 0x05]),
            I2cTrans::write_read(ADDRESS, vec![REG_SECONDS], vec![0x05]),
        ]);

        assert_eq!(dev.is_running(), Ok(false));
        assert_eq!(dev.set_running(true), Ok(()));
        assert_eq!(dev.is_running(), Ok(true));
        finish(dev);
    }

    #[test]
    fn test_halt() {
        let mut dev = setup(&[
            I2cTrans::write_read(ADDRESS, vec![REG_SECONDS], vec![0x17]),
            I2cTrans::write(ADDRESS, vec![REG_SECONDS, 0x97]),
        ]);

        assert_eq!(dev.set_running(false), Ok(()));
        finish(dev);
    }

    #[test]
    fn test_memory() {
        let mut dev = setup(&[
            I2cTrans::write_read(ADDRESS, vec![0x0A], vec![0xEA]),
            I2cTrans::write(ADDRESS, vec![0x09, 30]),
        ]);

        assert_eq!(dev.memory_size(), 56);
        assert_eq!(dev.read_memory(2), Ok(0xEA));
        assert_eq!(dev.write_memory(1, 30), Ok(()));
        assert_eq!(dev.read_memory(56), Err(DatetimeClockError::OutOfRange));
        assert_eq!(dev.write_memory(200, 0), Err(DatetimeClockError::OutOfRange));
        finish(dev);
    }
}
