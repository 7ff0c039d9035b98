//! Null motor
//!
//! Stands in for an axis with no physical actuator. It never registers for
//! updates and ignores every command.

use detent_core::scheduler::{DriverId, UpdateScheduler};
use detent_core::traits::{AxisIndex, AxisTranslator, Dwell, MotorDriver, MotorError};

/// Motor slot with nothing attached
#[derive(Debug, Clone)]
pub struct NullMotor {
    binding: AxisIndex,
    axis_index: Option<AxisIndex>,
    initialized: bool,
}

impl NullMotor {
    pub fn new(axis: AxisIndex) -> Self {
        Self {
            binding: axis,
            axis_index: None,
            initialized: false,
        }
    }

    /// Axis this motor was configured on, initialized or not
    pub fn binding(&self) -> AxisIndex {
        self.binding
    }
}

impl MotorDriver for NullMotor {
    fn name(&self) -> &'static str {
        "null_motor"
    }

    fn axis(&self) -> Option<AxisIndex> {
        self.axis_index
    }

    fn init<const N: usize>(
        &mut self,
        _id: DriverId,
        _scheduler: &mut UpdateScheduler<N>,
    ) -> Result<(), MotorError> {
        if self.initialized {
            return Err(MotorError::AlreadyInitialized);
        }
        self.initialized = true;
        self.axis_index = Some(self.binding);
        Ok(())
    }

    fn update<A: AxisTranslator>(&self, _axes: &A) {}

    fn set_disable(&self, _disable: bool) {}

    async fn set_homing_mode<A: AxisTranslator, D: Dwell>(
        &self,
        _homing: bool,
        _axes: &A,
        _dwell: &mut D,
    ) -> bool {
        false
    }

    fn has_errors(&self) -> bool {
        false
    }

    fn is_disabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingDwell;
    use detent_core::motion::Axes;
    use embassy_futures::block_on;

    #[test]
    fn test_init_does_not_register() {
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut motor = NullMotor::new(AxisIndex::Y);

        assert!(motor.init(DriverId(0), &mut scheduler).is_ok());
        assert_eq!(motor.axis(), Some(AxisIndex::Y));
        assert!(scheduler.is_empty());
        assert_eq!(
            motor.init(DriverId(0), &mut scheduler),
            Err(MotorError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_homing_is_inert() {
        let axes = Axes::new();
        let motor = NullMotor::new(AxisIndex::Y);
        let mut dwell = RecordingDwell::default();

        assert!(!block_on(motor.set_homing_mode(true, &axes, &mut dwell)));
        assert!(dwell.calls.is_empty());
    }
}
