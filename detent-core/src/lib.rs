//! Board-agnostic core logic for the Detent motor-driver firmware
//!
//! This crate contains everything about motor control that does not depend
//! on a specific chip:
//!
//! - The motor driver contract ([`traits::MotorDriver`]) and the external
//!   collaborator interfaces it consumes (axis translation, dwell)
//! - The update scheduler registry that drives periodic `update()` calls
//! - Servo math: pulse-count derivation and clamped position mapping
//! - A reference axis table implementing step/position translation
//! - Configuration type definitions and validation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(feature = "toml")]
extern crate alloc;

pub mod config;
pub mod motion;
pub mod scheduler;
pub mod traits;
