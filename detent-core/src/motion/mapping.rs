//! Servo pulse math
//!
//! Three numeric domains meet here:
//!
//! - machine position (mm, `f32`)
//! - pulse length (µs, integer, from configuration)
//! - PWM duty count (integer, resolution depends on pin and frequency)
//!
//! Pulse lengths are converted to duty counts with integer arithmetic only,
//! and are re-derived from their source values every time instead of being
//! cached across a frequency or resolution change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Margin applied to the homing travel time estimate (acceleration)
pub const HOMING_TIME_MARGIN: f32 = 1.1;

/// Duty-count bounds of a servo pulse range
///
/// `min` is the count at the minimum travel position and `max` the count at
/// the maximum travel position. `min > max` is a valid, inverted mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseCounts {
    /// Duty count at the minimum travel position
    pub min: u32,
    /// Duty count at the maximum travel position
    pub max: u32,
}

impl PulseCounts {
    /// Duty counts per millisecond of pulse: `pwm_hz * max_duty / 1000`
    pub fn counts_per_ms(pwm_hz: u32, max_duty: u32) -> u32 {
        let counts = u64::from(pwm_hz) * u64::from(max_duty) / 1000;
        u32::try_from(counts).unwrap_or(u32::MAX)
    }

    /// Derive duty-count bounds from pulse lengths in µs
    ///
    /// Both divisions truncate, in this order:
    /// `counts_per_ms = pwm_hz * max_duty / 1000`, then
    /// `count = pulse_us * counts_per_ms / 1000`.
    pub fn derive(pwm_hz: u32, max_duty: u32, min_pulse_us: u32, max_pulse_us: u32) -> Self {
        let per_ms = Self::counts_per_ms(pwm_hz, max_duty);
        Self {
            min: pulse_us_to_count(min_pulse_us, per_ms),
            max: pulse_us_to_count(max_pulse_us, per_ms),
        }
    }

    /// Check if the mapping is inverted
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Duty count for `position` within travel limits `[lo, hi]`
    pub fn duty_for(&self, position: f32, lo: f32, hi: f32) -> u32 {
        map_constrain(position, lo, hi, self.min, self.max)
    }
}

fn pulse_us_to_count(pulse_us: u32, counts_per_ms: u32) -> u32 {
    let count = u64::from(pulse_us) * u64::from(counts_per_ms) / 1000;
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Clamp `x` to `[in_min, in_max]` and map it linearly onto
/// `[out_min, out_max]`
///
/// Out-of-range inputs saturate at the nearest output bound. Either range may
/// be inverted. The result is truncated toward `out_min`, so an inverted
/// output range is the exact mirror image of the non-inverted one.
pub fn map_constrain(x: f32, in_min: f32, in_max: f32, out_min: u32, out_max: u32) -> u32 {
    let span_in = in_max - in_min;
    if span_in == 0.0 || !span_in.is_finite() {
        return out_min;
    }

    let fraction = (x - in_min) / span_in;
    // NaN position: hold the minimum rather than produce garbage
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };

    let span_out = i64::from(out_max) - i64::from(out_min);
    let offset = (fraction * span_out as f32) as i64;
    (i64::from(out_min) + offset) as u32
}

/// Estimated time (ms) for an axis to traverse its full travel
///
/// `max_travel / max_rate * 60 * 1.1` seconds, rounded to the nearest
/// millisecond. Returns 0 for a non-positive rate or travel.
pub fn homing_dwell_ms(max_travel_mm: f32, max_rate_mm_per_min: f32) -> u32 {
    if !(max_rate_mm_per_min > 0.0) || !(max_travel_mm > 0.0) {
        return 0;
    }

    let ms = max_travel_mm * 60_000.0 * HOMING_TIME_MARGIN / max_rate_mm_per_min;
    (ms + 0.5) as u32
}
