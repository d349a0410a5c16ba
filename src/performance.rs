//! Derives [`GlobalMotionState`] from frame timing, user activity and device hints.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::reactive::Signal;
use crate::state::{GlobalMotionState, PerformanceLevel};

/// Frame samples kept for the rolling frame-rate estimate
const FRAME_WINDOW: usize = 60;
/// Samples needed before the frame rate overrides the device estimate
const MIN_FRAME_SAMPLES: usize = 10;
const HIGH_FPS: f32 = 50.0;
const MEDIUM_FPS: f32 = 30.0;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Static hints about the host device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub logical_cores: u32,
    pub memory_gb: f32,
    /// The user asked to save data/battery
    pub save_data: bool,
}

impl DeviceProfile {
    /// Initial performance guess before any frame was measured.
    pub fn estimate_level(&self) -> PerformanceLevel {
        if self.save_data || self.logical_cores <= 2 || self.memory_gb < 2.0 {
            PerformanceLevel::Low
        } else if self.logical_cores <= 4 || self.memory_gb < 4.0 {
            PerformanceLevel::Medium
        } else {
            PerformanceLevel::High
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            logical_cores: 8,
            memory_gb: 8.0,
            save_data: false,
        }
    }
}

/// Writes the shared motion state; the only writer of it.
///
/// Feed it frame timestamps with [`record_frame`](Self::record_frame) and
/// user input with [`record_activity`](Self::record_activity), and poll
/// [`check_idle`](Self::check_idle) periodically.
pub struct PerformanceMonitor {
    state: Signal<GlobalMotionState>,
    frames: VecDeque<Instant>,
    level: PerformanceLevel,
    last_activity: Option<Instant>,
    idle: bool,
    idle_timeout: Duration,
    prefers_reduced_motion: bool,
}

impl PerformanceMonitor {
    pub fn new(state: Signal<GlobalMotionState>, profile: DeviceProfile) -> Self {
        let monitor = Self {
            state,
            frames: VecDeque::with_capacity(FRAME_WINDOW),
            level: profile.estimate_level(),
            last_activity: None,
            idle: false,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            prefers_reduced_motion: false,
        };
        log::debug!("Initial performance level: {}", monitor.level);
        monitor.publish();
        monitor
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn level(&self) -> PerformanceLevel {
        self.level
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Average frames per second over the sample window.
    pub fn fps(&self) -> Option<f32> {
        let (first, last) = (self.frames.front()?, self.frames.back()?);
        let span = last.saturating_duration_since(*first).as_secs_f32();
        if self.frames.len() < 2 || span <= 0.0 {
            return None;
        }
        Some((self.frames.len() - 1) as f32 / span)
    }

    /// Record that a frame was presented at `now`.
    pub fn record_frame(&mut self, now: Instant) {
        if self.frames.len() == FRAME_WINDOW {
            self.frames.pop_front();
        }
        self.frames.push_back(now);

        if self.frames.len() < MIN_FRAME_SAMPLES {
            return;
        }
        let Some(fps) = self.fps() else {
            return;
        };

        let level = if fps >= HIGH_FPS {
            PerformanceLevel::High
        } else if fps >= MEDIUM_FPS {
            PerformanceLevel::Medium
        } else {
            PerformanceLevel::Low
        };
        if level != self.level {
            log::info!("Performance level {} -> {} ({:.1} fps)", self.level, level, fps);
            self.level = level;
            self.publish();
        }
    }

    /// Record user input at `now`; leaves idle mode.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = Some(now);
        if self.idle {
            log::debug!("User active again");
            self.idle = false;
            self.publish();
        }
    }

    /// Enter idle mode once no activity was seen for the idle timeout.
    /// Returns whether the user is idle.
    pub fn check_idle(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_activity else {
            return self.idle;
        };
        let idle = now.saturating_duration_since(last) >= self.idle_timeout;
        if idle != self.idle {
            log::debug!("User idle: {}", idle);
            self.idle = idle;
            self.publish();
        }
        self.idle
    }

    pub fn set_prefers_reduced_motion(&mut self, prefers: bool) {
        if prefers != self.prefers_reduced_motion {
            self.prefers_reduced_motion = prefers;
            self.publish();
        }
    }

    /// Global kill switch.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.update(|s| s.enabled = enabled);
    }

    fn reduced_motion(&self) -> bool {
        self.level == PerformanceLevel::Low || self.idle || self.prefers_reduced_motion
    }

    fn publish(&self) {
        let level = self.level;
        let reduced_motion = self.reduced_motion();
        self.state.update(|s| {
            s.performance_level = level;
            s.reduced_motion = reduced_motion;
        });
    }
}
