//! Byte-addressed NVRAM (Non-Volatile Random Access Memory), e.g. an EEPROM or an
//! emulated EEPROM page in flash.

/// Value reported for cells outside the region, matching an erased EEPROM cell.
pub const ERASED: u8 = 0xFF;

/// A small byte-addressed non-volatile region.
///
/// Writes may be buffered until [`Nvram::commit`]. Accesses beyond [`Nvram::len`]
/// are ignored on write and read back as [`ERASED`].
pub trait Nvram {
    /// Size of the region in bytes.
    fn len(&self) -> usize;

    /// Returns true if the region has no cells.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the byte at `offset`.
    fn read(&self, offset: usize) -> u8;

    /// Writes the byte at `offset`.
    fn write(&mut self, offset: usize, value: u8);

    /// Flushes buffered writes to the medium.
    fn commit(&mut self);
}

/// RAM-backed region. Useful on targets without EEPROM and in tests.
impl<const N: usize> Nvram for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn read(&self, offset: usize) -> u8 {
        self.get(offset).copied().unwrap_or(ERASED)
    }

    fn write(&mut self, offset: usize, value: u8) {
        if let Some(cell) = self.get_mut(offset) {
            *cell = value;
        }
    }

    fn commit(&mut self) {}
}

impl<T: Nvram + ?Sized> Nvram for &mut T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, offset: usize) -> u8 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u8) {
        (**self).write(offset, value)
    }

    fn commit(&mut self) {
        (**self).commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_region() {
        let mut region = [ERASED; 4];
        region.write(1, 0xEA);
        region.write(9, 0x01);
        region.commit();

        assert_eq!(Nvram::len(&region), 4);
        assert_eq!(region.read(1), 0xEA);
        assert_eq!(region.read(0), ERASED);
        assert_eq!(region.read(9), ERASED);
    }
}
