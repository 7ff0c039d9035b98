//! Detent Hardware Abstraction Layer
//!
//! This crate defines the pin capability traits that chip-specific HALs
//! implement. Motor drivers in `detent-drivers` are written against these
//! traits only, so the same driver logic runs on the RP2040 and on the host
//! test harness.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Motor drivers (detent-drivers)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  detent-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  detent-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`pwm::PwmPin`] - A named pin that can be claimed as a PWM output

#![no_std]
#![deny(unsafe_code)]

pub mod pwm;

pub use pwm::{PwmError, PwmPin};
