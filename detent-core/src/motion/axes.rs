//! Axis table
//!
//! Reference [`AxisTranslator`] implementation: one slot per axis letter,
//! holding the static [`AxisConfig`] and an atomic step counter. The stepping
//! context, the update scheduler and the homing sequencer all share it by
//! `&` reference.

use portable_atomic::{AtomicI32, Ordering};

use crate::config::{AxesConfig, AxisConfig, MAX_AXES};
use crate::traits::{AxisIndex, AxisTranslator};

#[derive(Debug)]
struct AxisSlot {
    config: AxisConfig,
    steps: AtomicI32,
}

/// Step counters and configuration for every axis
#[derive(Debug)]
pub struct Axes {
    slots: [Option<AxisSlot>; MAX_AXES],
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    /// Create a table with no axes
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Build the table from the configured axes, all at step 0
    pub fn from_config(config: &AxesConfig) -> Self {
        let mut axes = Self::new();
        for (index, axis) in config.iter() {
            axes.insert(index, axis.clone());
        }
        axes
    }

    /// Add or replace an axis; out-of-range indices are ignored
    pub fn insert(&mut self, axis: AxisIndex, config: AxisConfig) {
        if let Some(slot) = self.slots.get_mut(axis.index()) {
            *slot = Some(AxisSlot {
                config,
                steps: AtomicI32::new(0),
            });
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_axis(mut self, axis: AxisIndex, config: AxisConfig) -> Self {
        self.insert(axis, config);
        self
    }

    /// Check if an axis is configured
    pub fn contains(&self, axis: AxisIndex) -> bool {
        self.slot(axis).is_some()
    }

    /// Add `delta` steps to an axis
    ///
    /// Load/store rather than `fetch_add` so thumbv6m needs no CAS emulation;
    /// the stepping context is the only writer while motion is running.
    pub fn add_steps(&self, axis: AxisIndex, delta: i32) {
        if let Some(slot) = self.slot(axis) {
            let steps = slot.steps.load(Ordering::Acquire);
            slot.steps.store(steps.wrapping_add(delta), Ordering::Release);
        }
    }

    fn slot(&self, axis: AxisIndex) -> Option<&AxisSlot> {
        self.slots.get(axis.index()).and_then(Option::as_ref)
    }

    fn steps_per_mm(&self, axis: AxisIndex) -> Option<f32> {
        self.slot(axis)
            .map(|s| s.config.steps_per_mm)
            .filter(|spm| *spm > 0.0)
    }
}

impl AxisTranslator for Axes {
    fn steps_for_axis(&self, axis: AxisIndex) -> i32 {
        self.slot(axis)
            .map_or(0, |s| s.steps.load(Ordering::Acquire))
    }

    fn set_steps_for_axis(&self, axis: AxisIndex, steps: i32) {
        if let Some(slot) = self.slot(axis) {
            slot.steps.store(steps, Ordering::Release);
        }
    }

    fn mpos_from_steps(&self, steps: i32, axis: AxisIndex) -> f32 {
        self.steps_per_mm(axis)
            .map_or(0.0, |spm| steps as f32 / spm)
    }

    fn steps_from_mpos(&self, mpos: f32, axis: AxisIndex) -> i32 {
        let Some(spm) = self.steps_per_mm(axis) else {
            return 0;
        };
        // Round half away from zero
        let steps = mpos * spm;
        if steps >= 0.0 {
            (steps + 0.5) as i32
        } else {
            (steps - 0.5) as i32
        }
    }

    /// Travel runs from the home position toward the opposite end: homing
    /// in the positive direction (or no homing) puts travel below home,
    /// negative-direction homing puts it above.
    fn travel_limits(&self, axis: AxisIndex) -> (f32, f32) {
        let Some(slot) = self.slot(axis) else {
            return (0.0, 0.0);
        };
        let config = &slot.config;
        let home = config.home_mpos();
        let positive = config.homing.map_or(true, |h| h.positive_direction);

        if positive {
            (home - config.max_travel_mm, home)
        } else {
            (home, home + config.max_travel_mm)
        }
    }

    fn axis_config(&self, axis: AxisIndex) -> Option<&AxisConfig> {
        self.slot(axis).map(|s| &s.config)
    }
}
