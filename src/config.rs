use std::time::Duration;

use crate::geometry::Viewport;

/// Coordinator-wide settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinatorConfig {
    pub viewport: Viewport,
    /// Global multiplier applied to every element's speed
    pub speed_multiplier: f32,
    /// Minimum time between processed scroll ticks
    pub tick_interval: Duration,
    /// Minimum time between ticks while the performance level is low
    pub low_performance_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            speed_multiplier: 1.0,
            tick_interval: Duration::from_millis(16),
            low_performance_interval: Duration::from_millis(32),
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn speed_multiplier(mut self, multiplier: f32) -> Self {
        self.speed_multiplier = multiplier;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn low_performance_interval(mut self, interval: Duration) -> Self {
        self.low_performance_interval = interval;
        self
    }
}
