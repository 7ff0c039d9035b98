//! Motor driver implementations
//!
//! - RC servo: PWM pulse mapped from axis position, open-loop homing
//! - Null motor: no actuator, ignores everything
//!
//! [`Motor`] dispatches over the driver types and [`Motors`] owns them all.

pub mod null;
pub mod rc_servo;
pub mod registry;

pub use null::NullMotor;
pub use rc_servo::{RcServo, ServoSummary};
pub use registry::{HomingAborted, Motor, Motors};
