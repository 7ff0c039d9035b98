//! Motor driver contract
//!
//! Every actuator type (RC servo, null motor, ...) implements [`MotorDriver`].
//! The contract is deliberately small:
//!
//! - `init()` acquires hardware once and registers for periodic updates
//! - `update()` is called by the update scheduler at a fixed interval
//! - `set_disable()` may be called from interrupt context at any time
//! - `set_homing_mode()` runs the driver's homing cycle
//!
//! Drivers own all of their state. Anything that crosses the interrupt
//! boundary (`disabled`, fault flag, duty cache) is atomic so that
//! `set_disable()` and `update()` only ever need `&self`.

use detent_hal::PwmError;

use super::{AxisIndex, AxisTranslator, Dwell};
use crate::scheduler::{DriverId, ScheduleError, UpdateScheduler};

/// Errors reported by motor driver initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// The output pin is not defined
    NoOutputPin,
    /// The output pin could not be claimed as a PWM output
    Pwm(PwmError),
    /// Registration with the update scheduler failed
    Schedule(ScheduleError),
    /// `init()` was already called on this driver
    AlreadyInitialized,
}

impl From<PwmError> for MotorError {
    fn from(e: PwmError) -> Self {
        match e {
            PwmError::Undefined => MotorError::NoOutputPin,
            e => MotorError::Pwm(e),
        }
    }
}

impl From<ScheduleError> for MotorError {
    fn from(e: ScheduleError) -> Self {
        MotorError::Schedule(e)
    }
}

/// Lifecycle contract shared by all motor drivers
#[allow(async_fn_in_trait)]
pub trait MotorDriver {
    /// Driver type name as used in configuration (e.g. `rc_servo`)
    fn name(&self) -> &'static str;

    /// Axis this driver is bound to, once initialized
    fn axis(&self) -> Option<AxisIndex>;

    /// One-time hardware acquisition and validation
    ///
    /// On misconfiguration the driver latches its fault flag and returns an
    /// error without registering for updates. It must never panic: a faulted
    /// driver behaves as permanently disabled and the firmware keeps running.
    fn init<const N: usize>(
        &mut self,
        id: DriverId,
        scheduler: &mut UpdateScheduler<N>,
    ) -> Result<(), MotorError>;

    /// Periodic update, called by the scheduler
    ///
    /// Must not block. Skipped or late calls only degrade tracking.
    fn update<A: AxisTranslator>(&self, axes: &A);

    /// Enable or disable the output
    ///
    /// Safe to call from interrupt context: no blocking, no allocation, only
    /// a bounded critical section around the output write. Disabling
    /// commands a neutral output immediately.
    fn set_disable(&self, disable: bool);

    /// Request (`true`) or release (`false`) a homing cycle
    ///
    /// Returns `true` only if conventional, feedback-confirmed homing took
    /// place. `false` tells the caller no limit-switch confirmation follows.
    async fn set_homing_mode<A: AxisTranslator, D: Dwell>(
        &self,
        homing: bool,
        axes: &A,
        dwell: &mut D,
    ) -> bool;

    /// Check whether the driver latched a configuration fault
    fn has_errors(&self) -> bool;

    /// Check whether the output is currently disabled
    fn is_disabled(&self) -> bool;
}
