use std::fmt;
use std::str::FromStr;

use super::{Direction, Easing, MotionConfig, MotionConfigOverrides};
use crate::error::ParallaxError;

/// Named motion bundles shipped with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Slow, counter-scrolling backdrop
    Background,
    Content,
    Foreground,
    Horizontal,
    /// Drifts on both axes
    Floating,
    /// Barely-there motion, visible well before entering the viewport
    Subtle,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Background,
        Preset::Content,
        Preset::Foreground,
        Preset::Horizontal,
        Preset::Floating,
        Preset::Subtle,
    ];

    /// The preset's constant configuration.
    pub const fn config(self) -> MotionConfig {
        match self {
            Preset::Background => BACKGROUND,
            Preset::Content => CONTENT,
            Preset::Foreground => FOREGROUND,
            Preset::Horizontal => HORIZONTAL,
            Preset::Floating => FLOATING,
            Preset::Subtle => SUBTLE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Background => "background",
            Preset::Content => "content",
            Preset::Foreground => "foreground",
            Preset::Horizontal => "horizontal",
            Preset::Floating => "floating",
            Preset::Subtle => "subtle",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ParallaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| ParallaxError::UnknownPreset(s.to_string()))
    }
}

const BACKGROUND: MotionConfig = MotionConfig {
    speed: -0.3,
    direction: Direction::Vertical,
    easing: Easing::Linear,
    offset: 0.0,
    threshold: 200.0,
    disabled: false,
};

const CONTENT: MotionConfig = MotionConfig {
    speed: 0.2,
    direction: Direction::Vertical,
    easing: Easing::EaseOut,
    offset: 0.0,
    threshold: 100.0,
    disabled: false,
};

const FOREGROUND: MotionConfig = MotionConfig {
    speed: 0.5,
    direction: Direction::Vertical,
    easing: Easing::EaseOut,
    offset: 0.0,
    threshold: 50.0,
    disabled: false,
};

const HORIZONTAL: MotionConfig = MotionConfig {
    speed: 0.3,
    direction: Direction::Horizontal,
    easing: Easing::Linear,
    offset: 0.0,
    threshold: 100.0,
    disabled: false,
};

const FLOATING: MotionConfig = MotionConfig {
    speed: 0.15,
    direction: Direction::Both,
    easing: Easing::EaseInOut,
    offset: 0.0,
    threshold: 150.0,
    disabled: false,
};

const SUBTLE: MotionConfig = MotionConfig {
    speed: 0.1,
    direction: Direction::Vertical,
    easing: Easing::Linear,
    offset: 0.0,
    threshold: 300.0,
    disabled: false,
};

/// Effective configuration for `preset` with `overrides` shallow-merged on top.
///
/// Pure; safe to call on every render. The only normalization is clamping a
/// negative threshold to zero.
pub fn resolve(preset: Preset, overrides: &MotionConfigOverrides) -> MotionConfig {
    overrides.apply_to(&preset.config()).sanitized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_overrides_is_preset() {
        for preset in Preset::ALL {
            assert_eq!(
                resolve(preset, &MotionConfigOverrides::new()),
                preset.config()
            );
        }
    }

    #[test]
    fn test_resolve_overrides_single_field() {
        let config = resolve(Preset::Content, &MotionConfigOverrides::new().speed(0.9));
        assert_eq!(config.speed, 0.9);
        assert_eq!(
            MotionConfig {
                speed: CONTENT.speed,
                ..config
            },
            CONTENT
        );
    }

    #[test]
    fn test_resolve_allows_zero_speed_and_negative_offset() {
        let config = resolve(
            Preset::Foreground,
            &MotionConfigOverrides::new().speed(0.0).offset(-30.0),
        );
        assert_eq!(config.speed, 0.0);
        assert_eq!(config.offset, -30.0);
    }

    #[test]
    fn test_resolve_clamps_threshold() {
        let config = resolve(Preset::Subtle, &MotionConfigOverrides::new().threshold(-1.0));
        assert_eq!(config.threshold, 0.0);
    }

    #[test]
    fn test_subtle_preset_values() {
        let subtle = Preset::Subtle.config();
        assert_eq!(subtle.speed, 0.1);
        assert_eq!(subtle.threshold, 300.0);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!(
            "parallax".parse::<Preset>(),
            Err(ParallaxError::UnknownPreset(name)) if name == "parallax"
        ));
    }
}
