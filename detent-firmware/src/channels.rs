//! Inter-task communication
//!
//! Static signals shared between the Embassy tasks and the dwell
//! implementation.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

/// Cuts a running dwell short (e-stop, re-home)
pub static DWELL_CANCEL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Set while a dwell in `SysSuspend` mode is running
///
/// Anything that consumes motion commands must hold off while this is set.
pub static SYSTEM_SUSPENDED: AtomicBool = AtomicBool::new(false);

/// Set while the e-stop input is held, and until its task first reads it
///
/// Homing does not start while this is set, and a dwell treats it as a
/// pending cancellation.
pub static ESTOP_ENGAGED: AtomicBool = AtomicBool::new(true);
