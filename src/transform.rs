//! Per-element parallax math: visibility and the translation written to a node.

use std::fmt;

use crate::geometry::{Rect, Viewport};
use crate::motion::{Direction, MotionConfig};

/// A 2D translation restricted to the axes of a [`Direction`].
///
/// Formats as a CSS transform value: `translateY(..)` for vertical motion,
/// `translateX(..)` for horizontal motion and `translate3d(..)` for both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation in x and y (pixels)
    pub translate: (f32, f32),
    pub axes: Direction,
}

impl Transform {
    /// No translation
    pub const IDENTITY: Self = Self {
        translate: (0.0, 0.0),
        axes: Direction::Vertical,
    };

    pub fn translate_x(x: f32) -> Self {
        Self {
            translate: (x, 0.0),
            axes: Direction::Horizontal,
        }
    }

    pub fn translate_y(y: f32) -> Self {
        Self {
            translate: (0.0, y),
            axes: Direction::Vertical,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate: (x, y),
            axes: Direction::Both,
        }
    }

    /// Spread a scalar displacement over the axes of `direction`.
    /// `Both` moves Y by the full amount and X at half weight.
    pub fn from_displacement(displacement: f32, direction: Direction) -> Self {
        match direction {
            Direction::Vertical => Self::translate_y(displacement),
            Direction::Horizontal => Self::translate_x(displacement),
            Direction::Both => Self::translate(displacement * 0.5, displacement),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translate == (0.0, 0.0)
    }

    /// CSS `transform` value for this translation.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.translate;
        match self.axes {
            Direction::Vertical => write!(f, "translateY({:.2}px)", y),
            Direction::Horizontal => write!(f, "translateX({:.2}px)", x),
            Direction::Both => write!(f, "translate3d({:.2}px, {:.2}px, 0)", x, y),
        }
    }
}

/// Whether `rect` intersects the viewport grown by `threshold` on both ends.
/// Both boundaries are inclusive.
pub fn is_visible(rect: &Rect, viewport: Viewport, threshold: f32) -> bool {
    rect.bottom() >= -threshold && rect.top() <= viewport.height + threshold
}

/// Translation for an element at `rect`.
///
/// Displacement is proportional to how far the element's center sits from
/// the viewport center, scaled by `config.speed` and `speed_multiplier`. The
/// easing curve bends the magnitude (one viewport height is the reference
/// range), then `config.offset` is added. Deterministic for fixed inputs.
pub fn compute_transform(
    rect: &Rect,
    viewport: Viewport,
    config: &MotionConfig,
    speed_multiplier: f32,
) -> Transform {
    let relative = rect.center_y() - viewport.center_y();
    let raw = -relative * config.speed * speed_multiplier;
    let eased = config.easing.shape(raw.abs(), viewport.height).copysign(raw);
    Transform::from_displacement(eased + config.offset, config.direction)
}
