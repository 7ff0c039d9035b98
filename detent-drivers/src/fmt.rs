//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Otherwise the
//! arguments are still evaluated by reference (no unused-variable warnings)
//! and nothing is emitted.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        let _ = ($(&$x),*);
    }};
}
