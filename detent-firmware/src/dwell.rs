//! Timer-backed dwell

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use portable_atomic::Ordering;

use detent_core::traits::{Dwell, DwellMode, DwellOutcome};

use crate::channels::{DWELL_CANCEL, ESTOP_ENGAGED, SYSTEM_SUSPENDED};

/// Dwell on the embassy timer, cancellable through [`DWELL_CANCEL`]
///
/// A cancel raised before the dwell starts is kept and ends it at once.
/// Whoever starts a new sequence of dwells clears stale cancels first.
pub struct TimerDwell;

impl Dwell for TimerDwell {
    async fn dwell_ms(&mut self, duration_ms: u32, mode: DwellMode) -> DwellOutcome {
        if ESTOP_ENGAGED.load(Ordering::Acquire) {
            return DwellOutcome::Cancelled;
        }

        let suspend = mode == DwellMode::SysSuspend;
        if suspend {
            SYSTEM_SUSPENDED.store(true, Ordering::Release);
        }
        debug!("Dwell {} ms ({})", duration_ms, mode);

        let outcome = match select(
            Timer::after_millis(u64::from(duration_ms)),
            DWELL_CANCEL.wait(),
        )
        .await
        {
            Either::First(()) => DwellOutcome::Completed,
            Either::Second(()) => DwellOutcome::Cancelled,
        };

        if suspend {
            SYSTEM_SUSPENDED.store(false, Ordering::Release);
        }
        outcome
    }

    fn cancel_pending(&self) -> bool {
        ESTOP_ENGAGED.load(Ordering::Acquire) || DWELL_CANCEL.signaled()
    }
}
