//! Motion math and axis state
//!
//! Pulse/duty conversion for servo drivers and the reference axis table.

pub mod axes;
pub mod mapping;

pub use axes::Axes;
pub use mapping::{homing_dwell_ms, map_constrain, PulseCounts, HOMING_TIME_MARGIN};
