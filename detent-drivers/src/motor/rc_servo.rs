//! RC servo driver
//!
//! Drives a hobby servo with a PWM pulse. The servo has no feedback: the
//! firmware's idea of the axis position *is* the commanded servo position,
//! and every scheduler tick maps it onto a pulse length.
//!
//! ```text
//!  axis steps ──► mpos ──► clamp to travel ──► duty count ──► PwmPin
//!                            [lo, hi]          [min, max]
//! ```
//!
//! The last written duty is cached so the pin is only touched on change.
//! `set_disable()` may preempt `update()` from interrupt context; the cache
//! and the pin are only ever modified inside one critical section, and a
//! non-zero duty is never written while the disable flag is set.

use core::fmt;

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use detent_core::config::RcServoConfig;
use detent_core::motion::{homing_dwell_ms, PulseCounts};
use detent_core::scheduler::{DriverId, UpdateScheduler};
use detent_core::traits::{
    AxisIndex, AxisTranslator, Dwell, DwellMode, DwellOutcome, MotorDriver, MotorError,
};
use detent_hal::PwmPin;

/// Open-loop RC servo bound to one axis
#[derive(Debug)]
pub struct RcServo<P> {
    /// Axis this servo was configured on
    binding: AxisIndex,
    /// Set once `init()` succeeds
    axis_index: Option<AxisIndex>,
    output_pin: P,
    pwm_hz: u32,
    min_pulse_us: u32,
    max_pulse_us: u32,
    update_interval_ms: u32,
    /// Last duty written to the pin
    current_duty: AtomicU32,
    disabled: AtomicBool,
    /// Bumped by every `set_disable(true)`
    disable_requests: AtomicU32,
    has_errors: AtomicBool,
    homing: AtomicBool,
    initialized: bool,
}

impl<P: PwmPin> RcServo<P> {
    /// Create a servo on `axis` driving `output_pin`
    ///
    /// Nothing touches hardware until [`init`](MotorDriver::init). The servo
    /// starts disabled.
    pub fn new(axis: AxisIndex, config: &RcServoConfig, output_pin: P) -> Self {
        Self {
            binding: axis,
            axis_index: None,
            output_pin,
            pwm_hz: config.pwm_hz,
            min_pulse_us: config.min_pulse_us,
            max_pulse_us: config.max_pulse_us,
            update_interval_ms: config.timer_ms,
            current_duty: AtomicU32::new(0),
            disabled: AtomicBool::new(true),
            disable_requests: AtomicU32::new(0),
            has_errors: AtomicBool::new(false),
            homing: AtomicBool::new(false),
            initialized: false,
        }
    }

    /// Axis this servo was configured on, initialized or not
    pub fn binding(&self) -> AxisIndex {
        self.binding
    }

    pub fn output_pin(&self) -> &P {
        &self.output_pin
    }

    /// Configured update interval (ms)
    pub fn update_interval_ms(&self) -> u32 {
        self.update_interval_ms
    }

    /// Last duty count written to the pin
    pub fn current_duty(&self) -> u32 {
        self.current_duty.load(Ordering::Acquire)
    }

    /// Check whether a homing cycle is running
    pub fn is_homing(&self) -> bool {
        self.homing.load(Ordering::Acquire)
    }

    /// Re-read the pulse settings against the pin's current resolution
    pub fn pulse_counts(&self) -> PulseCounts {
        PulseCounts::derive(
            self.pwm_hz,
            self.output_pin.max_duty(),
            self.min_pulse_us,
            self.max_pulse_us,
        )
    }

    /// Startup summary of the bound pin and resolved pulse range
    pub fn summary(&self) -> ServoSummary<'_> {
        ServoSummary {
            name: self.name(),
            pin: self.output_pin.name(),
            min_pulse_us: self.min_pulse_us,
            max_pulse_us: self.max_pulse_us,
            max_duty: self.output_pin.max_duty(),
            counts: self.pulse_counts(),
        }
    }

    fn latch_fault(&self) {
        self.has_errors.store(true, Ordering::Release);
        self.disabled.store(true, Ordering::Release);
    }

    /// Map the current axis position onto the servo
    fn set_location<A: AxisTranslator>(&self, axes: &A) {
        if self.disabled.load(Ordering::Acquire) || self.has_errors.load(Ordering::Acquire) {
            return;
        }
        let Some(axis) = self.axis_index else {
            return;
        };

        let counts = self.pulse_counts();
        let (lo, hi) = axes.travel_limits(axis);
        self.write_pwm(counts.duty_for(axes.mpos(axis), lo, hi));
    }

    /// Write a duty count if it differs from the cached one
    fn write_pwm(&self, duty: u32) {
        critical_section::with(|_| {
            // A disable that landed after set_location's check wins
            if duty != 0 && self.disabled.load(Ordering::Acquire) {
                return;
            }
            if self.current_duty.load(Ordering::Relaxed) == duty {
                return;
            }
            self.current_duty.store(duty, Ordering::Relaxed);
            self.output_pin.set_duty(duty);
        });
    }
}

impl<P: PwmPin> MotorDriver for RcServo<P> {
    fn name(&self) -> &'static str {
        "rc_servo"
    }

    fn axis(&self) -> Option<AxisIndex> {
        self.axis_index
    }

    fn init<const N: usize>(
        &mut self,
        id: DriverId,
        scheduler: &mut UpdateScheduler<N>,
    ) -> Result<(), MotorError> {
        if self.initialized {
            return Err(MotorError::AlreadyInitialized);
        }
        self.initialized = true;

        if self.output_pin.is_undefined() {
            error!("    RC Servo disabled: No output pin");
            self.latch_fault();
            return Err(MotorError::NoOutputPin);
        }

        if let Err(e) = self.output_pin.define_as_pwm(self.pwm_hz) {
            error!(
                "    RC Servo disabled: {} not usable as PWM: {}",
                self.output_pin.name(),
                e
            );
            self.latch_fault();
            return Err(e.into());
        }
        self.current_duty.store(0, Ordering::Release);

        info!("    {}", self.summary());

        // Disabled until the motion system enables it
        self.disabled.store(true, Ordering::Release);

        if let Err(e) = scheduler.register(id, self.update_interval_ms) {
            error!("    RC Servo disabled: no update slot: {}", e);
            self.latch_fault();
            return Err(e.into());
        }

        self.axis_index = Some(self.binding);
        Ok(())
    }

    fn update<A: AxisTranslator>(&self, axes: &A) {
        self.set_location(axes);
    }

    fn set_disable(&self, disable: bool) {
        if self.has_errors.load(Ordering::Acquire) {
            return;
        }

        if !disable {
            self.disabled.store(false, Ordering::Release);
            return;
        }

        critical_section::with(|_| {
            let requests = self.disable_requests.load(Ordering::Relaxed);
            self.disable_requests
                .store(requests.wrapping_add(1), Ordering::Relaxed);
            self.disabled.store(true, Ordering::Release);
        });
        self.write_pwm(0);
    }

    /// Open-loop homing
    ///
    /// Redefines the axis position as the homing position, drives the servo
    /// there and suspends motion for the estimated travel time. Always
    /// returns `false`: no limit switch confirms the move.
    ///
    /// The servo is not re-enabled if a disable arrived after the call began
    /// or the dwell already has a cancellation pending.
    async fn set_homing_mode<A: AxisTranslator, D: Dwell>(
        &self,
        homing: bool,
        axes: &A,
        dwell: &mut D,
    ) -> bool {
        debug!("Servo homing: {}", homing);
        let requests = self.disable_requests.load(Ordering::Acquire);

        if !homing || self.has_errors.load(Ordering::Acquire) {
            return false;
        }
        let Some(axis) = self.axis_index else {
            return false;
        };
        let Some(_guard) = HomingGuard::acquire(&self.homing) else {
            warn!("    Servo on axis {} is already homing", axis.letter());
            return false;
        };

        let (home_mpos, dwell_ms) = axes.axis_config(axis).map_or((0.0, 0), |c| {
            (
                c.home_mpos(),
                homing_dwell_ms(c.max_travel_mm, c.max_rate_mm_per_min),
            )
        });

        let enabled = critical_section::with(|_| {
            if dwell.cancel_pending()
                || self.disable_requests.load(Ordering::Acquire) != requests
            {
                return false;
            }
            self.disabled.store(false, Ordering::Release);
            true
        });
        if !enabled {
            warn!("    Servo homing on axis {} aborted: disabled", axis.letter());
            return false;
        }

        axes.set_steps_for_axis(axis, axes.steps_from_mpos(home_mpos, axis));
        self.set_location(axes);

        if dwell.dwell_ms(dwell_ms, DwellMode::SysSuspend).await == DwellOutcome::Cancelled {
            warn!("    Servo homing dwell on axis {} cancelled", axis.letter());
        }

        false
    }

    fn has_errors(&self) -> bool {
        self.has_errors.load(Ordering::Acquire)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }
}

/// Holds the homing flag for the duration of one homing cycle
struct HomingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> HomingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        // No CAS on thumbv6m
        critical_section::with(|_| {
            if flag.load(Ordering::Acquire) {
                None
            } else {
                flag.store(true, Ordering::Release);
                Some(Self { flag })
            }
        })
    }
}

impl Drop for HomingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Startup line describing a servo's pin and pulse range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoSummary<'a> {
    pub name: &'static str,
    pub pin: &'a str,
    pub min_pulse_us: u32,
    pub max_pulse_us: u32,
    pub max_duty: u32,
    pub counts: PulseCounts,
}

impl fmt::Display for ServoSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Pin:{} Pulse Len({},{} period:{}) Counts({},{})",
            self.name,
            self.pin,
            self.min_pulse_us,
            self.max_pulse_us,
            self.max_duty,
            self.counts.min,
            self.counts.max
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ServoSummary<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=str} Pin:{=str} Pulse Len({},{} period:{}) Counts({},{})",
            self.name,
            self.pin,
            self.min_pulse_us,
            self.max_pulse_us,
            self.max_duty,
            self.counts.min,
            self.counts.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPin, RecordingDwell};
    use detent_core::config::{AxisConfig, HomingConfig};
    use detent_core::motion::Axes;
    use detent_hal::PwmError;
    use embassy_futures::block_on;
    use proptest::prelude::*;

    /// Z axis with 100 mm of travel below home (mpos -100 ..= 0)
    fn axes() -> Axes {
        Axes::new().with_axis(
            AxisIndex::Z,
            AxisConfig {
                steps_per_mm: 100.0,
                max_rate_mm_per_min: 1000.0,
                max_travel_mm: 100.0,
                homing: Some(HomingConfig::default()),
                ..AxisConfig::default()
            },
        )
    }

    fn servo(config: RcServoConfig) -> RcServo<MockPin> {
        RcServo::new(AxisIndex::Z, &config, MockPin::new("gpio.29"))
    }

    /// Initialized and enabled servo with default pulses (51..=102 counts)
    fn ready_servo(config: RcServoConfig) -> (RcServo<MockPin>, UpdateScheduler) {
        let mut scheduler = UpdateScheduler::new();
        let mut servo = servo(config);
        servo.init(DriverId(0), &mut scheduler).unwrap();
        servo.set_disable(false);
        (servo, scheduler)
    }

    #[test]
    fn test_init_claims_pin_and_registers() {
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut servo = servo(RcServoConfig {
            pwm_hz: 60,
            timer_ms: 40,
            ..RcServoConfig::default()
        });

        assert!(servo.init(DriverId(3), &mut scheduler).is_ok());
        assert_eq!(servo.output_pin().frequency_hz(), Some(60));
        assert_eq!(scheduler.interval_ms(DriverId(3)), Some(40));
        assert_eq!(servo.axis(), Some(AxisIndex::Z));
        assert!(servo.is_disabled());
        assert!(!servo.has_errors());
    }

    #[test]
    fn test_init_twice_rejected() {
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut servo = servo(RcServoConfig::default());
        servo.init(DriverId(0), &mut scheduler).unwrap();

        assert_eq!(
            servo.init(DriverId(0), &mut scheduler),
            Err(MotorError::AlreadyInitialized)
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_pulse_counts_from_pin_resolution() {
        let (servo, _) = ready_servo(RcServoConfig::default());
        assert_eq!(servo.pulse_counts(), PulseCounts { min: 51, max: 102 });

        let servo = RcServo::new(
            AxisIndex::Z,
            &RcServoConfig::default(),
            MockPin::new("gpio.2").with_max_duty(4095),
        );
        // 50 * 4095 / 1000 = 204 counts per ms
        assert_eq!(servo.pulse_counts(), PulseCounts { min: 204, max: 408 });
    }

    #[test]
    fn test_summary_line() {
        let (servo, _) = ready_servo(RcServoConfig::default());
        assert_eq!(
            format!("{}", servo.summary()),
            "rc_servo Pin:gpio.29 Pulse Len(1000,2000 period:1023) Counts(51,102)"
        );
    }

    #[test]
    fn test_position_clamped_to_travel() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());

        axes.set_steps_for_axis(AxisIndex::Z, -100_000);
        servo.update(&axes);
        assert_eq!(servo.current_duty(), 51);

        axes.set_steps_for_axis(AxisIndex::Z, 50_000);
        servo.update(&axes);
        assert_eq!(servo.current_duty(), 102);

        axes.set_steps_for_axis(AxisIndex::Z, -5000);
        servo.update(&axes);
        assert_eq!(servo.current_duty(), 76);

        assert_eq!(servo.output_pin().writes(), vec![51, 102, 76]);
    }

    #[test]
    fn test_inverted_pulses() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig {
            min_pulse_us: 2000,
            max_pulse_us: 1000,
            ..RcServoConfig::default()
        });

        axes.set_steps_for_axis(AxisIndex::Z, -10_000);
        servo.update(&axes);
        assert_eq!(servo.current_duty(), 102);

        axes.set_steps_for_axis(AxisIndex::Z, 0);
        servo.update(&axes);
        assert_eq!(servo.current_duty(), 51);
    }

    #[test]
    fn test_unchanged_position_writes_once() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());
        axes.set_steps_for_axis(AxisIndex::Z, -2500);

        servo.update(&axes);
        servo.update(&axes);

        assert_eq!(servo.output_pin().writes().len(), 1);
    }

    #[test]
    fn test_disabled_before_enable_writes_nothing() {
        let axes = axes();
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut servo = servo(RcServoConfig::default());
        servo.init(DriverId(0), &mut scheduler).unwrap();

        axes.set_steps_for_axis(AxisIndex::Z, -2500);
        servo.update(&axes);

        assert!(servo.output_pin().writes().is_empty());
    }

    #[test]
    fn test_disable_forces_zero_and_blocks_updates() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());
        axes.set_steps_for_axis(AxisIndex::Z, -2500);
        servo.update(&axes);

        servo.set_disable(true);
        assert_eq!(servo.current_duty(), 0);
        assert_eq!(servo.output_pin().writes().last(), Some(&0));

        servo.output_pin().clear_writes();
        axes.set_steps_for_axis(AxisIndex::Z, -7500);
        servo.update(&axes);
        assert!(servo.output_pin().writes().is_empty());

        servo.set_disable(false);
        servo.update(&axes);
        assert_eq!(servo.output_pin().writes(), vec![63]);
    }

    #[test]
    fn test_disable_wins_over_late_write() {
        let (servo, _) = ready_servo(RcServoConfig::default());
        servo.set_disable(true);

        // An update that passed its disable check before the disable landed
        servo.write_pwm(80);

        assert_eq!(servo.current_duty(), 0);
        assert!(servo.output_pin().writes().is_empty());
    }

    #[test]
    fn test_undefined_pin_faults() {
        let axes = axes();
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut servo = RcServo::new(AxisIndex::Z, &RcServoConfig::default(), MockPin::undefined());

        assert_eq!(
            servo.init(DriverId(0), &mut scheduler),
            Err(MotorError::NoOutputPin)
        );
        assert!(servo.has_errors());
        assert!(servo.axis().is_none());
        assert!(scheduler.is_empty());

        axes.set_steps_for_axis(AxisIndex::Z, -1234);
        servo.set_disable(false);
        servo.update(&axes);
        servo.set_disable(true);

        let mut dwell = RecordingDwell::default();
        assert!(!block_on(servo.set_homing_mode(true, &axes, &mut dwell)));

        assert!(servo.is_disabled());
        assert!(servo.output_pin().writes().is_empty());
        assert!(dwell.calls.is_empty());
        assert_eq!(axes.steps_for_axis(AxisIndex::Z), -1234);
    }

    #[test]
    fn test_claim_failure_faults() {
        let mut scheduler = UpdateScheduler::<4>::new();
        let mut servo = RcServo::new(
            AxisIndex::Z,
            &RcServoConfig::default(),
            MockPin::failing(PwmError::AlreadyClaimed),
        );

        assert_eq!(
            servo.init(DriverId(0), &mut scheduler),
            Err(MotorError::Pwm(PwmError::AlreadyClaimed))
        );
        assert!(servo.has_errors());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_scheduler_full_faults() {
        let mut scheduler = UpdateScheduler::<1>::new();
        scheduler.register(DriverId(9), 100).unwrap();
        let mut servo = servo(RcServoConfig::default());

        assert_eq!(
            servo.init(DriverId(0), &mut scheduler),
            Err(MotorError::Schedule(
                detent_core::scheduler::ScheduleError::Full
            ))
        );
        assert!(servo.has_errors());
        assert!(servo.axis().is_none());
    }

    #[test]
    fn test_homing_moves_to_home_and_dwells() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());
        servo.set_disable(true);
        axes.set_steps_for_axis(AxisIndex::Z, -4321);

        let mut dwell = RecordingDwell::default();
        let homed = block_on(servo.set_homing_mode(true, &axes, &mut dwell));

        assert!(!homed);
        assert_eq!(axes.steps_for_axis(AxisIndex::Z), 0);
        assert!(!servo.is_disabled());
        // Home (mpos 0) is the top of travel
        assert_eq!(servo.output_pin().writes(), vec![102]);
        // 100 mm at 1000 mm/min, plus 10%
        assert_eq!(dwell.calls, vec![(6600, DwellMode::SysSuspend)]);
        assert!(!servo.is_homing());
    }

    #[test]
    fn test_homing_release_is_noop() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());
        axes.set_steps_for_axis(AxisIndex::Z, -4321);

        let mut dwell = RecordingDwell::default();
        assert!(!block_on(servo.set_homing_mode(false, &axes, &mut dwell)));

        assert!(dwell.calls.is_empty());
        assert_eq!(axes.steps_for_axis(AxisIndex::Z), -4321);
    }

    #[test]
    fn test_cancelled_dwell_releases_homing() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());

        let mut dwell = RecordingDwell::cancelling();
        assert!(!block_on(servo.set_homing_mode(true, &axes, &mut dwell)));
        assert!(!servo.is_homing());

        // A second cycle runs normally
        let mut dwell = RecordingDwell::default();
        block_on(servo.set_homing_mode(true, &axes, &mut dwell));
        assert_eq!(dwell.calls.len(), 1);
    }

    /// Dwell that tries to start a second homing cycle while the first one
    /// is suspended
    struct ReentrantDwell<'a> {
        servo: &'a RcServo<MockPin>,
        axes: &'a Axes,
        nested_result: Option<bool>,
        nested_dwells: usize,
    }

    impl Dwell for ReentrantDwell<'_> {
        async fn dwell_ms(&mut self, _duration_ms: u32, _mode: DwellMode) -> DwellOutcome {
            let mut inner = RecordingDwell::default();
            let result = self.servo.set_homing_mode(true, self.axes, &mut inner).await;
            self.nested_result = Some(result);
            self.nested_dwells = inner.calls.len();
            DwellOutcome::Completed
        }
    }

    #[test]
    fn test_homing_reentry_refused() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());

        let mut dwell = ReentrantDwell {
            servo: &servo,
            axes: &axes,
            nested_result: None,
            nested_dwells: 0,
        };
        block_on(servo.set_homing_mode(true, &axes, &mut dwell));

        assert_eq!(dwell.nested_result, Some(false));
        assert_eq!(dwell.nested_dwells, 0);
        assert!(!servo.is_homing());
    }

    /// Dwell during which an emergency stop disables the servo
    struct EstopDwell<'a> {
        servo: &'a RcServo<MockPin>,
    }

    impl Dwell for EstopDwell<'_> {
        async fn dwell_ms(&mut self, _duration_ms: u32, _mode: DwellMode) -> DwellOutcome {
            self.servo.set_disable(true);
            DwellOutcome::Cancelled
        }
    }

    #[test]
    fn test_disable_during_homing_dwell() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());

        let mut dwell = EstopDwell { servo: &servo };
        block_on(servo.set_homing_mode(true, &axes, &mut dwell));

        assert!(servo.is_disabled());
        assert_eq!(servo.current_duty(), 0);
        assert_eq!(servo.output_pin().writes(), vec![102, 0]);
    }

    #[test]
    fn test_pending_cancel_keeps_servo_disabled() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());
        servo.set_disable(true);
        axes.set_steps_for_axis(AxisIndex::Z, -4321);

        let mut dwell = RecordingDwell::pending();
        assert!(!block_on(servo.set_homing_mode(true, &axes, &mut dwell)));

        assert!(servo.is_disabled());
        assert!(servo.output_pin().writes().is_empty());
        assert_eq!(axes.steps_for_axis(AxisIndex::Z), -4321);
        assert!(dwell.calls.is_empty());
        assert!(!servo.is_homing());
    }

    /// Dwell whose cancel check is where an emergency stop lands, just as
    /// homing is about to enable the servo
    struct LateEstopDwell<'a> {
        servo: &'a RcServo<MockPin>,
        calls: usize,
    }

    impl Dwell for LateEstopDwell<'_> {
        async fn dwell_ms(&mut self, _duration_ms: u32, _mode: DwellMode) -> DwellOutcome {
            self.calls += 1;
            DwellOutcome::Completed
        }

        fn cancel_pending(&self) -> bool {
            self.servo.set_disable(true);
            false
        }
    }

    #[test]
    fn test_disable_while_homing_starts_wins() {
        let axes = axes();
        let (servo, _) = ready_servo(RcServoConfig::default());

        let mut dwell = LateEstopDwell {
            servo: &servo,
            calls: 0,
        };
        assert!(!block_on(servo.set_homing_mode(true, &axes, &mut dwell)));

        assert!(servo.is_disabled());
        assert_eq!(dwell.calls, 0);
        assert!(servo.output_pin().writes().is_empty());
    }

    proptest! {
        #[test]
        fn prop_duty_stays_in_pulse_range(steps in any::<i32>(), inverted in any::<bool>()) {
            let axes = axes();
            let config = if inverted {
                RcServoConfig { min_pulse_us: 2000, max_pulse_us: 1000, ..RcServoConfig::default() }
            } else {
                RcServoConfig::default()
            };
            let (servo, _) = ready_servo(config);

            axes.set_steps_for_axis(AxisIndex::Z, steps);
            servo.update(&axes);

            prop_assert!((51..=102).contains(&servo.current_duty()));
            prop_assert!(servo.output_pin().writes().len() <= 1);
        }
    }
}
