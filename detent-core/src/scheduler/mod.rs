//! Update scheduler
//!
//! Keeps the registry of drivers that want periodic `update()` calls and
//! decides which of them are due on each tick.

pub mod update;

pub use update::{DriverId, ScheduleError, UpdateScheduler, MAX_DRIVERS};
