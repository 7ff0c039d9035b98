//! Motor update task
//!
//! Drives the update scheduler: wakes when the next driver is due, calls
//! `update()` on every due driver, sleeps again.

use defmt::*;
use embassy_time::{Instant, Timer};

use detent_core::motion::Axes;
use detent_core::scheduler::UpdateScheduler;
use detent_drivers::Motors;
use detent_hal_rp2040::RpPwmPin;

/// Shortest sleep between polls (ms)
const MIN_SLEEP_MS: u32 = 1;

#[embassy_executor::task]
pub async fn update_task(
    motors: &'static Motors<RpPwmPin>,
    axes: &'static Axes,
    mut scheduler: UpdateScheduler,
) {
    if scheduler.is_empty() {
        info!("Update task: no driver registered, exiting");
        return;
    }
    info!("Update task started ({} drivers)", scheduler.len());

    let start = Instant::now();

    loop {
        // Wrapping ms clock; the scheduler handles the wrap
        let now_ms = start.elapsed().as_millis() as u32;
        motors.run_due(&mut scheduler, now_ms, axes);

        let sleep_ms = scheduler
            .time_to_next_ms(now_ms)
            .unwrap_or(MIN_SLEEP_MS)
            .max(MIN_SLEEP_MS);
        Timer::after_millis(u64::from(sleep_ms)).await;
    }
}
