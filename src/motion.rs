use std::time::Duration;

pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 225;
const REDUCED_MOTION_CAP_MS: u64 = 75;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionLevel {
    Full,
    Reduced,
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    QuintOut,
}

impl Easing {
    pub fn apply(self, delta: f32) -> f32 {
        let delta = delta.clamp(0.0, 1.0);
        match self {
            Easing::Linear => gpui::linear(delta),
            Easing::EaseIn => gpui::quadratic(delta),
            Easing::EaseOut => 1.0 - (1.0 - delta) * (1.0 - delta),
            Easing::EaseInOut => gpui::ease_in_out(delta),
            Easing::QuintOut => gpui::ease_out_quint()(delta),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionConfig {
    pub level: MotionLevel,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            level: MotionLevel::Full,
            duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            easing: Easing::EaseInOut,
        }
    }
}

impl MotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: MotionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Duration actually used for transitions after applying the motion level.
    pub fn effective_duration(&self) -> Duration {
        let ms = match self.level {
            MotionLevel::Full => self.duration_ms,
            MotionLevel::Reduced => self.duration_ms.min(REDUCED_MOTION_CAP_MS),
            MotionLevel::None => 0,
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_level_scales_duration() {
        let motion = MotionConfig::new().duration_ms(300);
        assert_eq!(motion.effective_duration(), Duration::from_millis(300));
        assert_eq!(
            motion.level(MotionLevel::Reduced).effective_duration(),
            Duration::from_millis(REDUCED_MOTION_CAP_MS)
        );
        assert_eq!(
            motion.level(MotionLevel::None).effective_duration(),
            Duration::ZERO
        );
    }

    #[test]
    fn easings_pin_their_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::QuintOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?}");
        }
    }
}
