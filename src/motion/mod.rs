mod easing;
mod preset;

use std::fmt;
use std::str::FromStr;

use parallax_macros::Overrides;

use crate::error::ParallaxError;

pub use easing::Easing;
pub use preset::{resolve, Preset};

/// Which axes a parallax element moves along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
    /// Full displacement on Y, half-weight on X
    Both,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParallaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Direction::Vertical),
            "horizontal" => Ok(Direction::Horizontal),
            "both" => Ok(Direction::Both),
            other => Err(ParallaxError::UnknownDirection(other.to_string())),
        }
    }
}

/// Per-element motion parameters.
///
/// Build one from a [`Preset`] with [`resolve`], tweaking individual fields
/// through [`MotionConfigOverrides`].
#[derive(Clone, Copy, Debug, PartialEq, Overrides)]
pub struct MotionConfig {
    /// Signed multiplier on scroll-relative displacement
    pub speed: f32,
    pub direction: Direction,
    /// Response curve applied to the displacement magnitude
    pub easing: Easing,
    /// Pixel bias added after easing
    pub offset: f32,
    /// Pixel margin beyond the viewport edges that still counts as visible
    pub threshold: f32,
    /// Skip this element entirely
    pub disabled: bool,
}

impl MotionConfig {
    /// Clamp fields that have a valid range. A negative threshold becomes 0.
    pub fn sanitized(mut self) -> Self {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            self.threshold = 0.0;
        }
        self
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Preset::Content.config()
    }
}
