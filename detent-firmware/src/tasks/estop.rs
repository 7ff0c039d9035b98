//! Emergency stop input
//!
//! Active-low switch. Pressing it disables every motor (servos drop their
//! pulse) and cancels any running dwell; releasing it enables them again.
//! Motors stay disabled until this task has read the input level.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use detent_drivers::Motors;
use detent_hal_rp2040::RpPwmPin;

use crate::channels::{DWELL_CANCEL, ESTOP_ENGAGED};

#[embassy_executor::task]
pub async fn estop_task(mut input: Input<'static>, motors: &'static Motors<RpPwmPin>) {
    info!("E-stop task started");

    loop {
        if input.is_low() {
            ESTOP_ENGAGED.store(true, Ordering::Release);
            motors.set_disable(true);
            DWELL_CANCEL.signal(());
            warn!("E-stop: motors disabled");

            input.wait_for_high().await;
        }

        ESTOP_ENGAGED.store(false, Ordering::Release);
        motors.set_disable(false);
        info!("E-stop released: motors enabled");

        input.wait_for_low().await;
    }
}
