//! PWM pin capability
//!
//! A [`PwmPin`] is a physical pin bound at configuration time. It may be
//! *undefined* (no pin configured), in which case drivers must refuse to use
//! it. Once claimed as a PWM output the pin exposes its duty resolution and
//! accepts raw duty counts.

/// Errors raised while claiming a pin for the PWM role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// No physical pin is bound
    Undefined,
    /// The requested frequency cannot be produced by the PWM hardware
    UnsupportedFrequency,
    /// The pin (or its PWM slice) is already claimed for another role
    AlreadyClaimed,
}

/// A pin with a PWM output role
///
/// `set_duty` takes `&self`: on real hardware it is a single compare-register
/// write and must be callable from interrupt context while the scheduler
/// context holds a shared reference to the same driver.
pub trait PwmPin {
    /// Human-readable pin name (e.g. `gpio.29`)
    fn name(&self) -> &str;

    /// Check whether no physical pin is bound
    fn is_undefined(&self) -> bool;

    /// Claim the pin as a PWM output running at `frequency_hz`
    ///
    /// Duty starts at zero.
    fn define_as_pwm(&mut self, frequency_hz: u32) -> Result<(), PwmError>;

    /// Maximum duty count (100% duty)
    ///
    /// Only meaningful after [`define_as_pwm`](Self::define_as_pwm) succeeds;
    /// the resolution depends on the configured frequency.
    fn max_duty(&self) -> u32;

    /// Set the raw duty count (0 ..= `max_duty()`)
    fn set_duty(&self, duty: u32);

    /// Check whether the pin is bound to hardware
    fn is_defined(&self) -> bool {
        !self.is_undefined()
    }
}
