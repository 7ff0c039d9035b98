//! Periodic update registry
//!
//! Drivers register once during `init()` with their update interval. The
//! owner of the scheduler polls [`UpdateScheduler::due`] from its tick loop
//! and calls `update()` on every driver returned. The scheduler owns no
//! driver state beyond the registration itself.
//!
//! Timing uses a wrapping `u32` millisecond clock (~49 days between wraps).
//! A driver that falls more than one interval behind is rescheduled from the
//! current time: missed ticks collapse into one update instead of a burst.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum registered drivers (six axes, two motors each)
pub const MAX_DRIVERS: usize = 12;

/// Identity of a driver in the motor registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverId(pub u8);

impl DriverId {
    /// Slot of this driver in the motor registry
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors that can occur when registering a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// The driver is already registered; registrations are never replaced
    AlreadyRegistered,
    /// An interval of zero would starve every other driver
    ZeroInterval,
    /// No registration slots left
    Full,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: DriverId,
    interval_ms: u32,
    /// `None` until the first poll after registration
    next_due_ms: Option<u32>,
}

/// Registry of periodic driver updates
#[derive(Debug)]
pub struct UpdateScheduler<const N: usize = MAX_DRIVERS> {
    entries: Vec<Registration, N>,
}

impl<const N: usize> Default for UpdateScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UpdateScheduler<N> {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a driver for periodic updates
    ///
    /// The first update is due on the next poll.
    pub fn register(&mut self, id: DriverId, interval_ms: u32) -> Result<(), ScheduleError> {
        if interval_ms == 0 {
            return Err(ScheduleError::ZeroInterval);
        }
        if self.is_registered(id) {
            return Err(ScheduleError::AlreadyRegistered);
        }

        self.entries
            .push(Registration {
                id,
                interval_ms,
                next_due_ms: None,
            })
            .map_err(|_| ScheduleError::Full)
    }

    /// Check if a driver is registered
    pub fn is_registered(&self, id: DriverId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Get the update interval of a registered driver
    pub fn interval_ms(&self, id: DriverId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.interval_ms)
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no driver is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the drivers due at `now_ms` and advance their deadlines
    pub fn due(&mut self, now_ms: u32) -> Vec<DriverId, N> {
        let mut due = Vec::new();

        for entry in self.entries.iter_mut() {
            let ready = match entry.next_due_ms {
                None => true,
                Some(deadline) => reached(now_ms, deadline),
            };
            if !ready {
                continue;
            }

            entry.next_due_ms = Some(match entry.next_due_ms {
                // On time (or less than one interval late): keep the cadence
                Some(deadline) if !reached(now_ms, deadline.wrapping_add(entry.interval_ms)) => {
                    deadline.wrapping_add(entry.interval_ms)
                }
                // First poll, or missed whole ticks: restart from now
                _ => now_ms.wrapping_add(entry.interval_ms),
            });

            // Both vectors share capacity N, so this cannot overflow
            let _ = due.push(entry.id);
        }

        due
    }

    /// Milliseconds until the next driver is due, or `None` if nothing is
    /// registered
    pub fn time_to_next_ms(&self, now_ms: u32) -> Option<u32> {
        self.entries
            .iter()
            .map(|e| match e.next_due_ms {
                None => 0,
                Some(deadline) if reached(now_ms, deadline) => 0,
                Some(deadline) => deadline.wrapping_sub(now_ms),
            })
            .min()
    }
}

/// Wrapping-safe `now >= deadline`
fn reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}
