//! RP2040-specific HAL for Detent firmware
//!
//! Implements the `detent-hal` traits on top of `embassy-rp`:
//!
//! - PWM output pins for servo drivers
//! - Config-driven lookup of PWM pins by GPIO number

#![cfg_attr(not(test), no_std)]

pub mod pwm;

pub use pwm::{PwmBank, PwmChannel, RpPwmPin};
