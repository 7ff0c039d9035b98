//! PWM output pins
//!
//! Every RP2040 GPIO is wired to one channel of one PWM slice:
//! slice = (gpio / 2) % 8, channel A on even pins and B on odd pins. The two
//! channels of a slice share divider and period, so a board should give
//! each servo its own slice.
//!
//! The firmware builds a [`PwmBank`] from the slices it wires up (see
//! [`pwm_output!`](crate::pwm_output)) and drivers receive [`RpPwmPin`]s
//! looked up by the GPIO number in the machine config.

use core::cell::RefCell;
use core::fmt::Write;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::{String, Vec};

use detent_hal::{PwmError, PwmPin};

/// Create the PWM output for a GPIO by number
///
/// Expands to `(gpio, PwmChannel, Pwm<'static>)`, ready for
/// [`PwmBank::add`]. Takes the pin and its slice out of `p`.
///
/// Usage:
/// ```ignore
/// bank.add(pwm_output!(p, 29)); // p.PIN_29 on PWM_SLICE6 channel B
/// ```
#[macro_export]
macro_rules! pwm_output {
    ($p:expr, 0) => { (0, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE0, $p.PIN_0, embassy_rp::pwm::Config::default())) };
    ($p:expr, 1) => { (1, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE0, $p.PIN_1, embassy_rp::pwm::Config::default())) };
    ($p:expr, 2) => { (2, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE1, $p.PIN_2, embassy_rp::pwm::Config::default())) };
    ($p:expr, 3) => { (3, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE1, $p.PIN_3, embassy_rp::pwm::Config::default())) };
    ($p:expr, 4) => { (4, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE2, $p.PIN_4, embassy_rp::pwm::Config::default())) };
    ($p:expr, 5) => { (5, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE2, $p.PIN_5, embassy_rp::pwm::Config::default())) };
    ($p:expr, 6) => { (6, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE3, $p.PIN_6, embassy_rp::pwm::Config::default())) };
    ($p:expr, 7) => { (7, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE3, $p.PIN_7, embassy_rp::pwm::Config::default())) };
    ($p:expr, 8) => { (8, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE4, $p.PIN_8, embassy_rp::pwm::Config::default())) };
    ($p:expr, 9) => { (9, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE4, $p.PIN_9, embassy_rp::pwm::Config::default())) };
    ($p:expr, 10) => { (10, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE5, $p.PIN_10, embassy_rp::pwm::Config::default())) };
    ($p:expr, 11) => { (11, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE5, $p.PIN_11, embassy_rp::pwm::Config::default())) };
    ($p:expr, 12) => { (12, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE6, $p.PIN_12, embassy_rp::pwm::Config::default())) };
    ($p:expr, 13) => { (13, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE6, $p.PIN_13, embassy_rp::pwm::Config::default())) };
    ($p:expr, 14) => { (14, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE7, $p.PIN_14, embassy_rp::pwm::Config::default())) };
    ($p:expr, 15) => { (15, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE7, $p.PIN_15, embassy_rp::pwm::Config::default())) };
    ($p:expr, 16) => { (16, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE0, $p.PIN_16, embassy_rp::pwm::Config::default())) };
    ($p:expr, 17) => { (17, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE0, $p.PIN_17, embassy_rp::pwm::Config::default())) };
    ($p:expr, 18) => { (18, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE1, $p.PIN_18, embassy_rp::pwm::Config::default())) };
    ($p:expr, 19) => { (19, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE1, $p.PIN_19, embassy_rp::pwm::Config::default())) };
    ($p:expr, 20) => { (20, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE2, $p.PIN_20, embassy_rp::pwm::Config::default())) };
    ($p:expr, 21) => { (21, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE2, $p.PIN_21, embassy_rp::pwm::Config::default())) };
    ($p:expr, 22) => { (22, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE3, $p.PIN_22, embassy_rp::pwm::Config::default())) };
    ($p:expr, 23) => { (23, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE3, $p.PIN_23, embassy_rp::pwm::Config::default())) };
    ($p:expr, 24) => { (24, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE4, $p.PIN_24, embassy_rp::pwm::Config::default())) };
    ($p:expr, 25) => { (25, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE4, $p.PIN_25, embassy_rp::pwm::Config::default())) };
    ($p:expr, 26) => { (26, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE5, $p.PIN_26, embassy_rp::pwm::Config::default())) };
    ($p:expr, 27) => { (27, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE5, $p.PIN_27, embassy_rp::pwm::Config::default())) };
    ($p:expr, 28) => { (28, $crate::PwmChannel::A, embassy_rp::pwm::Pwm::new_output_a($p.PWM_SLICE6, $p.PIN_28, embassy_rp::pwm::Config::default())) };
    ($p:expr, 29) => { (29, $crate::PwmChannel::B, embassy_rp::pwm::Pwm::new_output_b($p.PWM_SLICE6, $p.PIN_29, embassy_rp::pwm::Config::default())) };
}

/// Longest GPIO name (`gpio.29`)
const NAME_LEN: usize = 8;

/// Largest integer clock divider
const MAX_DIVIDER: u32 = 255;

/// Channel of a PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    A,
    B,
}

/// Integer divider and wrap value for `frequency_hz` at `clk_hz`
///
/// Picks the smallest divider that fits the period into 16 bits, which
/// keeps the duty resolution as high as possible.
fn divider_and_top(clk_hz: u32, frequency_hz: u32) -> Option<(u8, u16)> {
    if frequency_hz == 0 {
        return None;
    }

    let ticks = clk_hz / frequency_hz;
    let divider = ticks.div_ceil(1 << 16).max(1);
    if divider > MAX_DIVIDER {
        return None;
    }

    let top = (ticks / divider).checked_sub(1)?;
    Some((divider as u8, u16::try_from(top).ok()?))
}

/// Duty counts per period for a slice wrapping at `top`
///
/// The counter runs `0..=top`, so a compare value of `top + 1` is a
/// constant high output.
fn duty_resolution(top: u16) -> u32 {
    u32::from(top) + 1
}

/// Compare register value for `duty`, clamped to the period
fn compare_for(duty: u32, top: u16) -> u16 {
    u16::try_from(duty.min(duty_resolution(top))).unwrap_or(u16::MAX)
}

struct PwmOutput {
    channel: PwmChannel,
    claimed: bool,
    top: u16,
    slice: Mutex<CriticalSectionRawMutex, RefCell<(Pwm<'static>, Config)>>,
}

enum PinState {
    /// No GPIO configured
    Undefined,
    /// GPIO configured but its PWM output is not wired up (or already taken)
    Unavailable,
    Output(PwmOutput),
}

/// A GPIO in the PWM output role
pub struct RpPwmPin {
    name: String<NAME_LEN>,
    state: PinState,
}

impl RpPwmPin {
    /// Pin slot with no GPIO bound
    pub fn undefined() -> Self {
        let mut name = String::new();
        let _ = name.push_str("NO_PIN");
        Self {
            name,
            state: PinState::Undefined,
        }
    }

    /// Wrap a PWM output on `gpio`
    pub fn new(gpio: u8, channel: PwmChannel, pwm: Pwm<'static>) -> Self {
        Self {
            name: gpio_name(gpio),
            state: PinState::Output(PwmOutput {
                channel,
                claimed: false,
                top: 0,
                slice: Mutex::new(RefCell::new((pwm, Config::default()))),
            }),
        }
    }

    fn unavailable(gpio: u8) -> Self {
        Self {
            name: gpio_name(gpio),
            state: PinState::Unavailable,
        }
    }
}

fn gpio_name(gpio: u8) -> String<NAME_LEN> {
    let mut name = String::new();
    let _ = write!(name, "gpio.{}", gpio);
    name
}

impl PwmPin for RpPwmPin {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_undefined(&self) -> bool {
        matches!(self.state, PinState::Undefined)
    }

    fn define_as_pwm(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let output = match &mut self.state {
            PinState::Undefined => return Err(PwmError::Undefined),
            PinState::Unavailable => return Err(PwmError::AlreadyClaimed),
            PinState::Output(output) if output.claimed => return Err(PwmError::AlreadyClaimed),
            PinState::Output(output) => output,
        };

        let (divider, top) =
            divider_and_top(clk_sys_freq(), frequency_hz).ok_or(PwmError::UnsupportedFrequency)?;

        let mut config = Config::default();
        config.top = top;
        config.divider = divider.into();
        config.phase_correct = false;
        config.compare_a = 0;
        config.compare_b = 0;
        config.enable = true;

        output.slice.lock(|cell| {
            let mut slice = cell.borrow_mut();
            slice.0.set_config(&config);
            slice.1 = config;
        });
        output.top = top;
        output.claimed = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{=str}: {} Hz div={} top={}",
            self.name.as_str(),
            frequency_hz,
            divider,
            top
        );

        Ok(())
    }

    fn max_duty(&self) -> u32 {
        match &self.state {
            PinState::Output(output) if output.claimed => duty_resolution(output.top),
            _ => 0,
        }
    }

    fn set_duty(&self, duty: u32) {
        let PinState::Output(output) = &self.state else {
            return;
        };
        if !output.claimed {
            return;
        }

        let compare = compare_for(duty, output.top);
        output.slice.lock(|cell| {
            let mut slice = cell.borrow_mut();
            let (pwm, config) = &mut *slice;
            match output.channel {
                PwmChannel::A => config.compare_a = compare,
                PwmChannel::B => config.compare_b = compare,
            }
            // Reapply the whole config so the divider survives
            pwm.set_config(config);
        });
    }
}

/// PWM outputs wired up by the board, looked up by GPIO number
pub struct PwmBank<const N: usize> {
    outputs: Vec<(u8, PwmChannel, Pwm<'static>), N>,
}

impl<const N: usize> Default for PwmBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PwmBank<N> {
    pub const fn new() -> Self {
        Self {
            outputs: Vec::new(),
        }
    }

    /// Make a PWM output available; gives it back if the bank is full
    pub fn add(
        &mut self,
        output: (u8, PwmChannel, Pwm<'static>),
    ) -> Result<(), (u8, PwmChannel, Pwm<'static>)> {
        self.outputs.push(output)
    }

    /// Take the pin for a configured GPIO
    ///
    /// `None` gives an undefined pin. A GPIO that is not in the bank, or
    /// was already taken, gives a pin whose PWM claim fails.
    pub fn take(&mut self, gpio: Option<u8>) -> RpPwmPin {
        let Some(gpio) = gpio else {
            return RpPwmPin::undefined();
        };

        match self.outputs.iter().position(|(n, _, _)| *n == gpio) {
            Some(i) => {
                let (gpio, channel, pwm) = self.outputs.swap_remove(i);
                RpPwmPin::new(gpio, channel, pwm)
            }
            None => RpPwmPin::unavailable(gpio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servo_frequency_fits() {
        // 50 Hz at 125 MHz: 2.5M ticks, divider 39
        assert_eq!(divider_and_top(125_000_000, 50), Some((39, 64101)));
        assert_eq!(divider_and_top(125_000_000, 0), None);
        assert_eq!(divider_and_top(125_000_000, 1), None);
    }

    #[test]
    fn test_full_period_is_top_plus_one() {
        assert_eq!(duty_resolution(64101), 64102);
        assert_eq!(compare_for(64102, 64101), 64102);
        assert_eq!(compare_for(u32::MAX, 64101), 64102);
        assert_eq!(compare_for(3205, 64101), 3205);
    }

    #[test]
    fn test_compare_saturates_at_widest_period() {
        assert_eq!(duty_resolution(u16::MAX), 65536);
        assert_eq!(compare_for(65536, u16::MAX), u16::MAX);
    }
}
