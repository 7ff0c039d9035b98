//! Machine configuration type definitions
//!
//! These types describe the axes and the motors bound to them. They are
//! loaded from `machine.toml` on the host and stored in firmware as
//! postcard-serialized binary data.

use heapless::String;

use super::motor::MotorConfig;
use crate::traits::AxisIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum machine name length
pub const MAX_NAME_LEN: usize = 32;

/// Maximum number of axes (X, Y, Z, A, B, C)
pub const MAX_AXES: usize = 6;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A numeric field is outside its accepted range
    OutOfRange { field: &'static str },
    /// The TOML text could not be parsed into a machine config
    Syntax,
    /// The binary config blob could not be encoded or decoded
    Encoding,
}

/// Homing configuration of an axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingConfig {
    /// Machine position assigned to the axis once homed (mm)
    #[cfg_attr(feature = "serde", serde(default))]
    pub mpos_mm: f32,
    /// Home switch sits at the positive end of travel
    #[cfg_attr(feature = "serde", serde(default = "default_positive_direction"))]
    pub positive_direction: bool,
}

#[cfg(feature = "serde")]
fn default_positive_direction() -> bool {
    true
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            mpos_mm: 0.0,
            positive_direction: true,
        }
    }
}

/// Configuration of a single axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Steps per millimetre of travel
    #[cfg_attr(feature = "serde", serde(default = "default_steps_per_mm"))]
    pub steps_per_mm: f32,
    /// Maximum traverse rate (mm/min)
    #[cfg_attr(feature = "serde", serde(default = "default_max_rate"))]
    pub max_rate_mm_per_min: f32,
    /// Maximum travel distance (mm)
    #[cfg_attr(feature = "serde", serde(default = "default_max_travel"))]
    pub max_travel_mm: f32,
    /// Homing settings (absent = homing target is position zero)
    #[cfg_attr(feature = "serde", serde(default))]
    pub homing: Option<HomingConfig>,
    /// First motor on this axis
    #[cfg_attr(feature = "serde", serde(default))]
    pub motor0: Option<MotorConfig>,
    /// Second (ganged) motor on this axis
    #[cfg_attr(feature = "serde", serde(default))]
    pub motor1: Option<MotorConfig>,
}

#[cfg(feature = "serde")]
fn default_steps_per_mm() -> f32 {
    80.0
}

#[cfg(feature = "serde")]
fn default_max_rate() -> f32 {
    1000.0
}

#[cfg(feature = "serde")]
fn default_max_travel() -> f32 {
    1000.0
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            steps_per_mm: 80.0,
            max_rate_mm_per_min: 1000.0,
            max_travel_mm: 1000.0,
            homing: None,
            motor0: None,
            motor1: None,
        }
    }
}

impl AxisConfig {
    /// Machine position the axis is assigned when homed
    pub fn home_mpos(&self) -> f32 {
        self.homing.map_or(0.0, |h| h.mpos_mm)
    }

    /// Configured motors in slot order
    pub fn motors(&self) -> impl Iterator<Item = &MotorConfig> {
        self.motor0.iter().chain(self.motor1.iter())
    }

    /// Range-check the axis and its motors
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.steps_per_mm > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "steps_per_mm",
            });
        }
        if !(self.max_rate_mm_per_min > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_rate_mm_per_min",
            });
        }
        if !(self.max_travel_mm > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_travel_mm",
            });
        }
        for motor in self.motors() {
            motor.validate()?;
        }
        Ok(())
    }
}

/// Per-letter axis table
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxesConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: Option<AxisConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: Option<AxisConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: Option<AxisConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub a: Option<AxisConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub b: Option<AxisConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub c: Option<AxisConfig>,
}

impl AxesConfig {
    fn slots(&self) -> [&Option<AxisConfig>; MAX_AXES] {
        [&self.x, &self.y, &self.z, &self.a, &self.b, &self.c]
    }

    /// Look up an axis by index
    pub fn get(&self, axis: AxisIndex) -> Option<&AxisConfig> {
        match axis.index() {
            0 => self.x.as_ref(),
            1 => self.y.as_ref(),
            2 => self.z.as_ref(),
            3 => self.a.as_ref(),
            4 => self.b.as_ref(),
            5 => self.c.as_ref(),
            _ => None,
        }
    }

    /// Set (or clear) the axis at `axis`; out-of-range indices are ignored
    pub fn set(&mut self, axis: AxisIndex, config: Option<AxisConfig>) {
        let slot = match axis.index() {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.a,
            4 => &mut self.b,
            5 => &mut self.c,
            _ => return,
        };
        *slot = config;
    }

    /// Iterate over the configured axes
    pub fn iter(&self) -> impl Iterator<Item = (AxisIndex, &AxisConfig)> {
        self.slots()
            .into_iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (AxisIndex(i as u8), c)))
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    /// Machine name shown in the startup banner
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String<MAX_NAME_LEN>,
    /// Axis table
    #[cfg_attr(feature = "serde", serde(default))]
    pub axes: AxesConfig,
}

impl MachineConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Range-check every axis and motor
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (_, axis) in self.axes.iter() {
            axis.validate()?;
        }
        Ok(())
    }

    /// Number of configured motors across all axes
    pub fn motor_count(&self) -> usize {
        self.axes.iter().map(|(_, axis)| axis.motors().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RcServoConfig;

    #[test]
    fn test_home_mpos_defaults_to_zero() {
        let axis = AxisConfig::default();
        assert_eq!(axis.home_mpos(), 0.0);

        let axis = AxisConfig {
            homing: Some(HomingConfig {
                mpos_mm: 5.0,
                positive_direction: true,
            }),
            ..AxisConfig::default()
        };
        assert_eq!(axis.home_mpos(), 5.0);
    }

    #[test]
    fn test_axis_validation() {
        assert!(AxisConfig::default().validate().is_ok());

        let axis = AxisConfig {
            max_rate_mm_per_min: 0.0,
            ..AxisConfig::default()
        };
        assert_eq!(
            axis.validate(),
            Err(ConfigError::OutOfRange {
                field: "max_rate_mm_per_min"
            })
        );

        let axis = AxisConfig {
            steps_per_mm: f32::NAN,
            ..AxisConfig::default()
        };
        assert!(axis.validate().is_err());
    }

    #[test]
    fn test_axis_validation_checks_motors() {
        let axis = AxisConfig {
            motor1: Some(MotorConfig::RcServo(RcServoConfig {
                pwm_hz: 10,
                ..RcServoConfig::default()
            })),
            ..AxisConfig::default()
        };
        assert_eq!(
            axis.validate(),
            Err(ConfigError::OutOfRange { field: "pwm_hz" })
        );
    }

    #[test]
    fn test_axes_lookup() {
        let mut axes = AxesConfig::default();
        axes.set(AxisIndex::Z, Some(AxisConfig::default()));
        axes.set(AxisIndex(9), Some(AxisConfig::default()));

        assert!(axes.get(AxisIndex::X).is_none());
        assert!(axes.get(AxisIndex::Z).is_some());
        assert!(axes.get(AxisIndex(9)).is_none());

        let indices: heapless::Vec<AxisIndex, MAX_AXES> = axes.iter().map(|(i, _)| i).collect();
        assert_eq!(indices.as_slice(), &[AxisIndex::Z]);
    }

    #[test]
    fn test_motor_count() {
        let mut config = MachineConfig::new();
        config.axes.set(
            AxisIndex::X,
            Some(AxisConfig {
                motor0: Some(MotorConfig::RcServo(RcServoConfig::on_pin(29))),
                motor1: Some(MotorConfig::NullMotor),
                ..AxisConfig::default()
            }),
        );
        config.axes.set(AxisIndex::Y, Some(AxisConfig::default()));
        assert_eq!(config.motor_count(), 2);
        assert!(config.validate().is_ok());
    }
}
