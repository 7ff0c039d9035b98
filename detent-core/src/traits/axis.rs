//! Axis position translation
//!
//! Drivers never own axis state. They hold an [`AxisIndex`] handle and go
//! through an [`AxisTranslator`] to read and redefine the axis position.

use crate::config::AxisConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis letters in index order
pub const AXIS_LETTERS: [char; 6] = ['X', 'Y', 'Z', 'A', 'B', 'C'];

/// Handle to an axis in the axis table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisIndex(pub u8);

impl AxisIndex {
    pub const X: Self = Self(0);
    pub const Y: Self = Self(1);
    pub const Z: Self = Self(2);

    /// Table slot for this axis
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Axis letter (`X`, `Y`, `Z`, `A`, `B`, `C`), or `?` if out of range
    pub fn letter(self) -> char {
        AXIS_LETTERS.get(self.index()).copied().unwrap_or('?')
    }
}

/// Step-count and machine-position access for one axis table
///
/// All methods take `&self`: step counts are shared between the stepping
/// context, the update scheduler and the homing sequencer, so implementations
/// keep them in atomics.
pub trait AxisTranslator {
    /// Accumulated step count of the axis
    fn steps_for_axis(&self, axis: AxisIndex) -> i32;

    /// Redefine the accumulated step count of the axis
    ///
    /// This moves nothing; it changes where the firmware believes the axis is.
    fn set_steps_for_axis(&self, axis: AxisIndex, steps: i32);

    /// Convert a step count into machine position (mm)
    fn mpos_from_steps(&self, steps: i32, axis: AxisIndex) -> f32;

    /// Convert a machine position (mm) into a step count
    fn steps_from_mpos(&self, mpos: f32, axis: AxisIndex) -> i32;

    /// Travel limits `(min, max)` in machine position
    fn travel_limits(&self, axis: AxisIndex) -> (f32, f32);

    /// Static configuration of the axis, if it exists
    fn axis_config(&self, axis: AxisIndex) -> Option<&AxisConfig>;

    /// Current machine position of the axis
    fn mpos(&self, axis: AxisIndex) -> f32 {
        self.mpos_from_steps(self.steps_for_axis(axis), axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_letters() {
        assert_eq!(AxisIndex::X.letter(), 'X');
        assert_eq!(AxisIndex::Z.letter(), 'Z');
        assert_eq!(AxisIndex(5).letter(), 'C');
        assert_eq!(AxisIndex(6).letter(), '?');
    }
}
