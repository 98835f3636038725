//! Free-running millisecond counter.

/// A monotonically increasing millisecond counter that wraps at `u32::MAX`
/// (about 49.7 days). Callers must compare tick values with [`ticks_since`].
pub trait TickSource {
    /// Milliseconds since an arbitrary epoch, usually device reset.
    fn now_millis(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// Milliseconds elapsed from `earlier` to `later`, correct across one wrap of the counter.
#[inline]
pub const fn ticks_since(earlier: u32, later: u32) -> u32 {
    later.wrapping_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_since_wraps() {
        assert_eq!(ticks_since(1_000, 61_000), 60_000);
        assert_eq!(ticks_since(u32::MAX - 999, 500), 1_500);
        assert_eq!(ticks_since(42, 42), 0);
    }
}
