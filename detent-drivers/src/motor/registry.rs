//! Motor registry
//!
//! Owns every configured motor, indexed by [`DriverId`]. The registry is the
//! only thing the firmware tasks talk to: the update task forwards scheduler
//! ticks through [`Motors::run_due`], the e-stop path calls
//! [`Motors::set_disable`] and the homing task calls [`Motors::home_axis`].

use core::fmt;

use heapless::Vec;
use portable_atomic::{AtomicBool, Ordering};

use detent_core::config::{MachineConfig, MotorConfig, RcServoConfig};
use detent_core::scheduler::{DriverId, UpdateScheduler, MAX_DRIVERS};
use detent_core::traits::{
    AxisIndex, AxisTranslator, Dwell, DwellMode, DwellOutcome, MotorDriver, MotorError,
};
use detent_hal::PwmPin;

use super::{NullMotor, RcServo};

/// Any supported motor driver
#[derive(Debug)]
pub enum Motor<P> {
    RcServo(RcServo<P>),
    Null(NullMotor),
}

impl<P: PwmPin> Motor<P> {
    /// Axis this motor was configured on, initialized or not
    pub fn binding(&self) -> AxisIndex {
        match self {
            Motor::RcServo(m) => m.binding(),
            Motor::Null(m) => m.binding(),
        }
    }
}

impl<P: PwmPin> MotorDriver for Motor<P> {
    fn name(&self) -> &'static str {
        match self {
            Motor::RcServo(m) => m.name(),
            Motor::Null(m) => m.name(),
        }
    }

    fn axis(&self) -> Option<AxisIndex> {
        match self {
            Motor::RcServo(m) => m.axis(),
            Motor::Null(m) => m.axis(),
        }
    }

    fn init<const N: usize>(
        &mut self,
        id: DriverId,
        scheduler: &mut UpdateScheduler<N>,
    ) -> Result<(), MotorError> {
        match self {
            Motor::RcServo(m) => m.init(id, scheduler),
            Motor::Null(m) => m.init(id, scheduler),
        }
    }

    fn update<A: AxisTranslator>(&self, axes: &A) {
        match self {
            Motor::RcServo(m) => m.update(axes),
            Motor::Null(m) => m.update(axes),
        }
    }

    fn set_disable(&self, disable: bool) {
        match self {
            Motor::RcServo(m) => m.set_disable(disable),
            Motor::Null(m) => m.set_disable(disable),
        }
    }

    async fn set_homing_mode<A: AxisTranslator, D: Dwell>(
        &self,
        homing: bool,
        axes: &A,
        dwell: &mut D,
    ) -> bool {
        match self {
            Motor::RcServo(m) => m.set_homing_mode(homing, axes, dwell).await,
            Motor::Null(m) => m.set_homing_mode(homing, axes, dwell).await,
        }
    }

    fn has_errors(&self) -> bool {
        match self {
            Motor::RcServo(m) => m.has_errors(),
            Motor::Null(m) => m.has_errors(),
        }
    }

    fn is_disabled(&self) -> bool {
        match self {
            Motor::RcServo(m) => m.is_disabled(),
            Motor::Null(m) => m.is_disabled(),
        }
    }
}

/// A homing cycle was cut short by a cancelled dwell or a disable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingAborted;

impl fmt::Display for HomingAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("homing aborted")
    }
}

/// All motors of the machine
#[derive(Debug)]
pub struct Motors<P, const N: usize = MAX_DRIVERS> {
    motors: Vec<Motor<P>, N>,
    /// Set by `set_disable(true)`, cleared when a homing cycle starts
    homing_abort: AtomicBool,
}

impl<P: PwmPin, const N: usize> Default for Motors<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PwmPin, const N: usize> Motors<P, N> {
    /// Driver ids are `u8`
    const IDS_FIT: () = assert!(N <= u8::MAX as usize + 1, "more motors than driver ids");

    /// Create an empty registry
    pub const fn new() -> Self {
        let () = Self::IDS_FIT;
        Self {
            motors: Vec::new(),
            homing_abort: AtomicBool::new(false),
        }
    }

    /// Build motors for every configured motor slot
    ///
    /// `make_pin` resolves a configured GPIO number (or `None`) into a pin.
    /// Slots beyond capacity are dropped with a warning.
    pub fn from_config<F>(config: &MachineConfig, mut make_pin: F) -> Self
    where
        F: FnMut(Option<u8>) -> P,
    {
        let mut motors = Self::new();

        for (axis, axis_config) in config.axes.iter() {
            for motor_config in axis_config.motors() {
                let motor = match motor_config {
                    MotorConfig::RcServo(servo) => {
                        Motor::RcServo(build_servo(axis, servo, &mut make_pin))
                    }
                    MotorConfig::NullMotor => Motor::Null(NullMotor::new(axis)),
                };
                if motors.push(motor).is_err() {
                    warn!(
                        "Axis {} {}: no motor slot left",
                        axis.letter(),
                        motor_config.driver_name()
                    );
                }
            }
        }

        motors
    }

    /// Add a motor, returning its id
    ///
    /// Gives the motor back if the registry is full.
    pub fn push(&mut self, motor: Motor<P>) -> Result<DriverId, Motor<P>> {
        let id = DriverId(self.motors.len() as u8);
        self.motors.push(motor)?;
        Ok(id)
    }

    /// Initialize every motor, returning how many came up without errors
    ///
    /// A failing motor is logged and left faulted; the others still run.
    pub fn init_all(&mut self, scheduler: &mut UpdateScheduler<N>) -> usize {
        let mut ok = 0;

        for (i, motor) in self.motors.iter_mut().enumerate() {
            info!("Axis {} {}", motor.binding().letter(), motor.name());
            match motor.init(DriverId(i as u8), scheduler) {
                Ok(()) => ok += 1,
                Err(e) => warn!("Motor {} init failed: {}", i, e),
            }
        }

        ok
    }

    /// Update every motor the scheduler reports due, returning the count
    pub fn run_due<A: AxisTranslator>(
        &self,
        scheduler: &mut UpdateScheduler<N>,
        now_ms: u32,
        axes: &A,
    ) -> usize {
        let mut updated = 0;

        for id in scheduler.due(now_ms) {
            if let Some(motor) = self.motors.get(id.index()) {
                motor.update(axes);
                updated += 1;
            }
        }

        updated
    }

    /// Enable or disable every motor
    ///
    /// Interrupt safe. A disable also aborts a running homing cycle.
    pub fn set_disable(&self, disable: bool) {
        if disable {
            self.homing_abort.store(true, Ordering::Release);
        }
        for motor in self.motors.iter() {
            motor.set_disable(disable);
        }
    }

    /// Run the homing cycle of every motor on `axis`
    ///
    /// Requests homing from each motor in turn, then releases it. Returns
    /// `Ok(true)` only if some motor reported feedback-confirmed homing.
    ///
    /// A cancelled dwell or a [`set_disable(true)`](Self::set_disable) stops
    /// the cycle: the remaining motors are not homed and every motor is left
    /// disabled.
    pub async fn home_axis<A: AxisTranslator, D: Dwell>(
        &self,
        axis: AxisIndex,
        axes: &A,
        dwell: &mut D,
    ) -> Result<bool, HomingAborted> {
        self.homing_abort.store(false, Ordering::Release);
        let mut dwell = CycleDwell {
            inner: dwell,
            abort: &self.homing_abort,
            cancelled: false,
        };
        let mut confirmed = false;

        for motor in self.on_axis(axis) {
            if dwell.aborted() {
                break;
            }
            confirmed |= motor.set_homing_mode(true, axes, &mut dwell).await;
        }
        for motor in self.on_axis(axis) {
            motor.set_homing_mode(false, axes, &mut dwell).await;
        }

        if dwell.aborted() {
            warn!("Homing axis {} aborted", axis.letter());
            self.set_disable(true);
            return Err(HomingAborted);
        }
        Ok(confirmed)
    }

    pub fn get(&self, id: DriverId) -> Option<&Motor<P>> {
        self.motors.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DriverId, &Motor<P>)> {
        self.motors
            .iter()
            .enumerate()
            .map(|(i, m)| (DriverId(i as u8), m))
    }

    /// Number of motors that latched a fault
    pub fn faulted(&self) -> usize {
        self.motors.iter().filter(|m| m.has_errors()).count()
    }

    pub fn len(&self) -> usize {
        self.motors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }

    fn on_axis(&self, axis: AxisIndex) -> impl Iterator<Item = &Motor<P>> {
        self.motors.iter().filter(move |m| m.binding() == axis)
    }
}

/// Dwell of one homing cycle
///
/// Remembers a cancelled dwell and reports a registry-wide disable as a
/// pending cancellation.
struct CycleDwell<'a, D> {
    inner: &'a mut D,
    abort: &'a AtomicBool,
    cancelled: bool,
}

impl<D: Dwell> CycleDwell<'_, D> {
    fn aborted(&self) -> bool {
        self.cancelled || self.cancel_pending()
    }
}

impl<D: Dwell> Dwell for CycleDwell<'_, D> {
    async fn dwell_ms(&mut self, duration_ms: u32, mode: DwellMode) -> DwellOutcome {
        if self.cancel_pending() {
            self.cancelled = true;
            return DwellOutcome::Cancelled;
        }

        let outcome = self.inner.dwell_ms(duration_ms, mode).await;
        if outcome == DwellOutcome::Cancelled || self.abort.load(Ordering::Acquire) {
            self.cancelled = true;
            return DwellOutcome::Cancelled;
        }
        outcome
    }

    fn cancel_pending(&self) -> bool {
        self.abort.load(Ordering::Acquire) || self.inner.cancel_pending()
    }
}

fn build_servo<P, F>(axis: AxisIndex, config: &RcServoConfig, make_pin: &mut F) -> RcServo<P>
where
    P: PwmPin,
    F: FnMut(Option<u8>) -> P,
{
    RcServo::new(axis, config, make_pin(config.output_pin))
}
