//! Response curves applied to raw parallax displacement.
//!
//! A curve maps a normalized input `t` in `[0, 1]` to an output in `[0, 1]`
//! with `f(0) = 0` and `f(1) = 1`. [`Easing::shape`] uses that to bend a
//! displacement magnitude: inputs within one reference range follow the
//! curve, anything beyond continues linearly so the result stays continuous.
//!
//! - [`Easing::Linear`] - displacement passes through unchanged
//! - [`Easing::EaseOut`] - fast near the viewport center, flattening further out
//! - [`Easing::EaseInOut`] - gentle near the center and at the range edge

use std::fmt;
use std::str::FromStr;

use crate::error::ParallaxError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Evaluate the curve at `t` (0.0 to 1.0).
    pub fn evaluate(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseOut => ease_out(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }

    /// Apply the curve to a non-negative `magnitude`, using `range` as the
    /// distance that maps to `t = 1`.
    pub fn shape(self, magnitude: f32, range: f32) -> f32 {
        if range <= 0.0 {
            return magnitude;
        }
        let t = magnitude / range;
        if t >= 1.0 {
            return magnitude;
        }
        self.evaluate(t) * range
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = ParallaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Easing::Linear),
            "ease-out" => Ok(Easing::EaseOut),
            "ease-in-out" => Ok(Easing::EaseInOut),
            other => Err(ParallaxError::UnknownEasing(other.to_string())),
        }
    }
}

fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
