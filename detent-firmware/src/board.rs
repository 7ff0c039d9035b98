//! Board wiring
//!
//! GPIO assignments of the controller board. Servo outputs are taken from
//! the [`PwmBank`](detent_hal_rp2040::PwmBank) by the GPIO numbers in
//! machine.toml; only the pins wired up in `main` can be used.

/// PWM outputs wired up on this board
pub const PWM_OUTPUTS: usize = 2;

/// Servo header 1 (PWM slice 6, channel B)
pub const SERVO1_GPIO: u8 = 29;

/// Servo header 2 (PWM slice 4, channel A)
pub const SERVO2_GPIO: u8 = 24;

/// Emergency stop input, active low
pub const ESTOP_GPIO: u8 = 15;

/// Homing button, active low
pub const HOME_GPIO: u8 = 14;
