//! Logging macros.
//!
//! Forward to `defmt` or `log` depending on the enabled feature, and expand to
//! nothing when neither is enabled. Host tests never link a defmt logger, so
//! defmt output is compiled out under `cfg(test)`.
#![macro_use]
#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::trace!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::debug!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::info!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::info!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::warn!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::error!($s $(, $x)*);
            #[cfg(all(feature = "log", not(all(feature = "defmt", not(test)))))]
            ::log::error!($s $(, $x)*);
            #[cfg(not(any(all(feature = "defmt", not(test)), feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}
