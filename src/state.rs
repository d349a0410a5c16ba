use std::fmt;

use crate::reactive::Signal;

/// Coarse tier of how much animation work the host can sustain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerformanceLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl PerformanceLevel {
    /// Factor applied on top of the configured speed multiplier.
    pub fn speed_factor(self) -> f32 {
        match self {
            PerformanceLevel::High => 1.0,
            PerformanceLevel::Medium => 0.75,
            PerformanceLevel::Low => 0.5,
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PerformanceLevel::High => "high",
            PerformanceLevel::Medium => "medium",
            PerformanceLevel::Low => "low",
        })
    }
}

/// Process-wide motion switches.
///
/// Written by the [`PerformanceMonitor`](crate::PerformanceMonitor), read by
/// the coordinator on every tick and by motion bindings. A value one tick
/// stale is acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalMotionState {
    /// Global kill switch
    pub enabled: bool,
    pub performance_level: PerformanceLevel,
    /// Degraded mode: every element is treated as disabled
    pub reduced_motion: bool,
}

impl GlobalMotionState {
    /// Whether elements may be moved at all this tick.
    pub fn motion_allowed(&self) -> bool {
        self.enabled && !self.reduced_motion
    }
}

impl Default for GlobalMotionState {
    fn default() -> Self {
        Self {
            enabled: true,
            performance_level: PerformanceLevel::High,
            reduced_motion: false,
        }
    }
}

/// Create the shared state signal.
pub fn create_motion_state(state: GlobalMotionState) -> Signal<GlobalMotionState> {
    Signal::new(state)
}
