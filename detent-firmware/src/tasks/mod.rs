//! Embassy async tasks
//!
//! Each task runs independently and reaches the motors through the shared
//! `&'static` registry and axis table.

pub mod estop;
pub mod homing;
pub mod update;

pub use estop::estop_task;
pub use homing::homing_task;
pub use update::update_task;
