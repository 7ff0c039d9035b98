//! Driver-facing traits
//!
//! These traits define the interface between motor drivers and the rest of
//! the motion system. Drivers implement [`MotorDriver`]; the motion system
//! provides [`AxisTranslator`] and [`Dwell`].

pub mod axis;
pub mod dwell;
pub mod motor;

pub use axis::{AxisIndex, AxisTranslator};
pub use dwell::{Dwell, DwellMode, DwellOutcome};
pub use motor::{MotorDriver, MotorError};
