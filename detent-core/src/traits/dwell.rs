//! Dwell primitive
//!
//! A dwell is a bounded pause in command execution. The motion system
//! implements it; drivers only ask for one (e.g. to let an open-loop
//! actuator finish a homing move).

/// How the rest of the motion system should behave while dwelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DwellMode {
    /// Ordinary G4-style dwell
    Dwell,
    /// System suspended: the motion pipeline stops consuming commands
    SysSuspend,
}

/// How a dwell ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DwellOutcome {
    /// The full duration elapsed
    Completed,
    /// The dwell was cut short (reset, shutdown, re-home)
    Cancelled,
}

/// Cooperative, cancellable wait
#[allow(async_fn_in_trait)]
pub trait Dwell {
    /// Wait for `duration_ms` milliseconds in the given mode
    async fn dwell_ms(&mut self, duration_ms: u32, mode: DwellMode) -> DwellOutcome;

    /// Check whether the next dwell would be cancelled straight away
    ///
    /// Callable from inside a critical section.
    fn cancel_pending(&self) -> bool {
        false
    }
}
