//! TOML machine configuration loader
//!
//! Host-side only (needs `alloc`): used by the firmware build script to
//! validate `machine.toml` and embed it as postcard binary.
//!
//! ```toml
//! name = "pen plotter"
//!
//! [axes.z]
//! steps_per_mm = 100.0
//! max_rate_mm_per_min = 5000.0
//! max_travel_mm = 5.0
//!
//! [axes.z.homing]
//! mpos_mm = 5.0
//!
//! [axes.z.motor0.rc_servo]
//! output_pin = 29
//! min_pulse_us = 1000
//! max_pulse_us = 2000
//! ```
//!
//! Floating-point fields must be written with a decimal point.

use alloc::vec::Vec;

use super::{ConfigError, MachineConfig};

/// Parse and validate a TOML machine config
pub fn parse_machine_config(input: &str) -> Result<MachineConfig, ConfigError> {
    let config: MachineConfig = ::toml::from_str(input).map_err(|_| ConfigError::Syntax)?;
    config.validate()?;
    Ok(config)
}

impl MachineConfig {
    /// Serialize into the postcard blob embedded in firmware
    pub fn to_postcard(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Encoding)
    }
}
