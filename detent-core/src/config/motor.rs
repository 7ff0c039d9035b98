//! Motor driver configuration
//!
//! Each axis can carry up to two motors (`motor0`, `motor1`). The driver
//! type is selected by the configuration key:
//!
//! ```toml
//! [axes.z.motor0.rc_servo]
//! output_pin = 29
//! pwm_hz = 50
//! min_pulse_us = 1000
//! max_pulse_us = 2000
//! ```
//!
//! Swapping `min_pulse_us` and `max_pulse_us` inverts the servo direction.

use super::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum servo PWM frequency (Hz)
pub const SERVO_PWM_HZ_MIN: u32 = 50;
/// Maximum servo PWM frequency (Hz)
pub const SERVO_PWM_HZ_MAX: u32 = 200;
/// Default servo PWM frequency (Hz)
pub const SERVO_PWM_HZ_DEFAULT: u32 = 50;

/// Shortest accepted servo pulse (µs)
pub const SERVO_PULSE_US_MIN: u32 = 500;
/// Longest accepted servo pulse (µs)
pub const SERVO_PULSE_US_MAX: u32 = 2500;
/// Default pulse at the minimum travel position (µs)
pub const SERVO_MIN_PULSE_US_DEFAULT: u32 = 1000;
/// Default pulse at the maximum travel position (µs)
pub const SERVO_MAX_PULSE_US_DEFAULT: u32 = 2000;

/// Shortest accepted update interval (ms)
pub const SERVO_TIMER_MS_MIN: u32 = 20;
/// Longest accepted update interval (ms)
pub const SERVO_TIMER_MS_MAX: u32 = 1000;
/// Default update interval (ms)
pub const SERVO_TIMER_MS_DEFAULT: u32 = 75;

/// RC servo driver configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RcServoConfig {
    /// GPIO number of the PWM output (`None` = no pin bound)
    #[cfg_attr(feature = "serde", serde(default))]
    pub output_pin: Option<u8>,
    /// PWM frequency in Hz
    #[cfg_attr(feature = "serde", serde(default = "default_pwm_hz"))]
    pub pwm_hz: u32,
    /// Pulse length at the minimum travel position (µs)
    #[cfg_attr(feature = "serde", serde(default = "default_min_pulse_us"))]
    pub min_pulse_us: u32,
    /// Pulse length at the maximum travel position (µs)
    #[cfg_attr(feature = "serde", serde(default = "default_max_pulse_us"))]
    pub max_pulse_us: u32,
    /// Update interval in ms
    #[cfg_attr(feature = "serde", serde(default = "default_timer_ms"))]
    pub timer_ms: u32,
}

#[cfg(feature = "serde")]
fn default_pwm_hz() -> u32 {
    SERVO_PWM_HZ_DEFAULT
}

#[cfg(feature = "serde")]
fn default_min_pulse_us() -> u32 {
    SERVO_MIN_PULSE_US_DEFAULT
}

#[cfg(feature = "serde")]
fn default_max_pulse_us() -> u32 {
    SERVO_MAX_PULSE_US_DEFAULT
}

#[cfg(feature = "serde")]
fn default_timer_ms() -> u32 {
    SERVO_TIMER_MS_DEFAULT
}

impl Default for RcServoConfig {
    fn default() -> Self {
        Self {
            output_pin: None,
            pwm_hz: SERVO_PWM_HZ_DEFAULT,
            min_pulse_us: SERVO_MIN_PULSE_US_DEFAULT,
            max_pulse_us: SERVO_MAX_PULSE_US_DEFAULT,
            timer_ms: SERVO_TIMER_MS_DEFAULT,
        }
    }
}

impl RcServoConfig {
    /// Create a config bound to a GPIO with default timing
    pub fn on_pin(pin: u8) -> Self {
        Self {
            output_pin: Some(pin),
            ..Self::default()
        }
    }

    /// Check if the pulse mapping is inverted (min pulse longer than max)
    pub fn is_inverted(&self) -> bool {
        self.min_pulse_us > self.max_pulse_us
    }

    /// Range-check all fields
    ///
    /// A missing `output_pin` is not a validation error: the driver handles
    /// it at `init()` by latching its fault flag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("pwm_hz", self.pwm_hz, SERVO_PWM_HZ_MIN, SERVO_PWM_HZ_MAX)?;
        check_range(
            "min_pulse_us",
            self.min_pulse_us,
            SERVO_PULSE_US_MIN,
            SERVO_PULSE_US_MAX,
        )?;
        check_range(
            "max_pulse_us",
            self.max_pulse_us,
            SERVO_PULSE_US_MIN,
            SERVO_PULSE_US_MAX,
        )?;
        check_range(
            "timer_ms",
            self.timer_ms,
            SERVO_TIMER_MS_MIN,
            SERVO_TIMER_MS_MAX,
        )
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field })
    }
}

/// Motor driver selection for one motor slot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotorConfig {
    /// Hobby servo driven by a PWM pulse
    RcServo(RcServoConfig),
    /// No physical actuator
    NullMotor,
}

impl MotorConfig {
    /// Driver type name as used in configuration
    pub fn driver_name(&self) -> &'static str {
        match self {
            MotorConfig::RcServo(_) => "rc_servo",
            MotorConfig::NullMotor => "null_motor",
        }
    }

    /// Range-check the driver configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MotorConfig::RcServo(servo) => servo.validate(),
            MotorConfig::NullMotor => Ok(()),
        }
    }
}
