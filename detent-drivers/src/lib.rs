//! Motor driver implementations
//!
//! This crate provides concrete implementations of the
//! [`MotorDriver`](detent_core::traits::MotorDriver) contract:
//!
//! - RC servo: open-loop PWM hobby servo mapped onto an axis
//! - Null motor: placeholder for axes without an actuator
//!
//! plus the [`Motors`](motor::Motors) registry that owns the drivers and
//! dispatches scheduler ticks, disable requests and homing to them.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

#[cfg(test)]
mod mock;
pub mod motor;

pub use motor::{HomingAborted, Motor, Motors, NullMotor, RcServo};
