//! Test doubles for driver unit tests

use core::cell::RefCell;

use detent_core::traits::{Dwell, DwellMode, DwellOutcome};
use detent_hal::{PwmError, PwmPin};

/// PWM pin that records every duty write
#[derive(Debug)]
pub struct MockPin {
    name: &'static str,
    undefined: bool,
    claim_error: Option<PwmError>,
    max_duty: u32,
    frequency_hz: Option<u32>,
    writes: RefCell<Vec<u32>>,
}

impl MockPin {
    /// A defined pin with 10-bit resolution
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            undefined: false,
            claim_error: None,
            max_duty: 1023,
            frequency_hz: None,
            writes: RefCell::new(Vec::new()),
        }
    }

    /// A pin slot with nothing bound
    pub fn undefined() -> Self {
        Self {
            undefined: true,
            ..Self::new("NO_PIN")
        }
    }

    /// A defined pin whose PWM claim fails
    pub fn failing(error: PwmError) -> Self {
        Self {
            claim_error: Some(error),
            ..Self::new("gpio.0")
        }
    }

    pub fn with_max_duty(mut self, max_duty: u32) -> Self {
        self.max_duty = max_duty;
        self
    }

    pub fn frequency_hz(&self) -> Option<u32> {
        self.frequency_hz
    }

    pub fn writes(&self) -> Vec<u32> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl PwmPin for MockPin {
    fn name(&self) -> &str {
        self.name
    }

    fn is_undefined(&self) -> bool {
        self.undefined
    }

    fn define_as_pwm(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        if self.undefined {
            return Err(PwmError::Undefined);
        }
        if let Some(e) = self.claim_error {
            return Err(e);
        }
        self.frequency_hz = Some(frequency_hz);
        Ok(())
    }

    fn max_duty(&self) -> u32 {
        self.max_duty
    }

    fn set_duty(&self, duty: u32) {
        self.writes.borrow_mut().push(duty);
    }
}

/// Dwell that returns immediately and records what was asked
#[derive(Debug, Default)]
pub struct RecordingDwell {
    pub calls: Vec<(u32, DwellMode)>,
    pub cancel: bool,
    /// Reported by `cancel_pending()`
    pub pending: bool,
}

impl RecordingDwell {
    pub fn cancelling() -> Self {
        Self {
            cancel: true,
            ..Self::default()
        }
    }

    /// A dwell whose cancellation already arrived
    pub fn pending() -> Self {
        Self {
            cancel: true,
            pending: true,
            ..Self::default()
        }
    }
}

impl Dwell for RecordingDwell {
    async fn dwell_ms(&mut self, duration_ms: u32, mode: DwellMode) -> DwellOutcome {
        self.calls.push((duration_ms, mode));
        if self.cancel {
            DwellOutcome::Cancelled
        } else {
            DwellOutcome::Completed
        }
    }

    fn cancel_pending(&self) -> bool {
        self.pending
    }
}
