//! Homing button
//!
//! Each press homes every configured axis in order. Servo axes are
//! open-loop: the position is redefined and the task waits out the travel
//! estimate, with motion suspended. An e-stop ends the whole cycle, and
//! presses while the e-stop is held are ignored.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;
use portable_atomic::Ordering;

use detent_core::config::MAX_AXES;
use detent_core::motion::Axes;
use detent_core::traits::{AxisIndex, AxisTranslator};
use detent_drivers::Motors;
use detent_hal_rp2040::RpPwmPin;

use crate::channels::{DWELL_CANCEL, ESTOP_ENGAGED};
use crate::dwell::TimerDwell;

/// Button debounce (ms)
const DEBOUNCE_MS: u64 = 20;

#[embassy_executor::task]
pub async fn homing_task(
    mut button: Input<'static>,
    motors: &'static Motors<RpPwmPin>,
    axes: &'static Axes,
) {
    info!("Homing task started");
    let mut dwell = TimerDwell;

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_high() {
            continue;
        }

        if ESTOP_ENGAGED.load(Ordering::Acquire) {
            warn!("Homing ignored: e-stop engaged");
            button.wait_for_rising_edge().await;
            continue;
        }

        info!("Homing cycle");
        DWELL_CANCEL.reset();
        for axis in (0..MAX_AXES as u8).map(AxisIndex).filter(|a| axes.contains(*a)) {
            match motors.home_axis(axis, axes, &mut dwell).await {
                Ok(confirmed) => info!(
                    "Axis {} at {} mm (confirmed: {})",
                    axis.letter(),
                    axes.mpos(axis),
                    confirmed
                ),
                Err(e) => {
                    warn!("Axis {}: {}", axis.letter(), e);
                    break;
                }
            }
        }

        button.wait_for_rising_edge().await;
    }
}
