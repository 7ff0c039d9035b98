//! Configuration types
//!
//! Board-agnostic configuration structures. On the host they are parsed from
//! TOML (feature `toml`); in firmware they are stored as postcard binary data.

pub mod motor;
#[cfg(feature = "toml")]
pub mod toml;
pub mod types;

pub use motor::*;
pub use types::*;

#[cfg(feature = "toml")]
pub use self::toml::parse_machine_config;

#[cfg(feature = "serde")]
impl MachineConfig {
    /// Decode a postcard-serialized machine config
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: MachineConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        config.validate()?;
        Ok(config)
    }
}
