use std::time::{Duration, Instant};

use gpui::{
    InteractiveElement, IntoElement, ParentElement, RenderOnce, Rgba, SharedString, Styled, Window,
    div, px,
};

use crate::animation::AnimatedValue;
use crate::contracts::MotionAware;
use crate::id::ComponentId;
use crate::motion::MotionConfig;
use crate::style::AffixKind;

use super::control::StateStore;
use super::field_style::AffixVisuals;
use super::utils::with_opacity;

static AFFIX_MOTION: StateStore<AffixMotion> = StateStore::new("affix motion");

pub(super) fn clear_state() {
    AFFIX_MOTION.clear();
}

pub(super) fn release_tree(id: &str) {
    AFFIX_MOTION.remove_tree(id);
}

#[derive(Clone, Debug)]
pub struct AffixMotion {
    opacity: AnimatedValue,
    active: bool,
    focused: bool,
}

impl AffixMotion {
    pub fn new_at(active: bool, focused: bool, now: Instant) -> Self {
        Self {
            opacity: AnimatedValue::new_at(AffixVisuals::opacity_target(active, focused), now),
            active,
            focused,
        }
    }

    pub fn update(&mut self, active: bool, focused: bool, duration: Duration, now: Instant) -> bool {
        if active == self.active && focused == self.focused {
            return false;
        }
        self.active = active;
        self.focused = focused;
        self.opacity
            .retarget_at(AffixVisuals::opacity_target(active, focused), duration, now);
        true
    }

    pub fn opacity_at(&self, now: Instant) -> f32 {
        self.opacity.value_at(now)
    }

    pub fn target(&self) -> f32 {
        self.opacity.target()
    }

    pub fn is_running_at(&self, now: Instant) -> bool {
        self.opacity.is_running_at(now)
    }
}

/// Fixed text before or after the editable content.
#[derive(IntoElement)]
pub struct Affix {
    id: ComponentId,
    kind: AffixKind,
    text: SharedString,
    active: bool,
    focused: bool,
    font_size: Option<f32>,
    color: Option<Rgba>,
    motion: Option<MotionConfig>,
    theme: crate::theme::LocalTheme,
}

impl Affix {
    #[track_caller]
    pub fn new(kind: AffixKind, text: impl Into<SharedString>) -> Self {
        Self {
            id: ComponentId::auto("affix"),
            kind,
            text: text.into(),
            active: false,
            focused: false,
            font_size: None,
            color: None,
            motion: None,
            theme: crate::theme::LocalTheme::default(),
        }
    }

    #[track_caller]
    pub fn prefix(text: impl Into<SharedString>) -> Self {
        Self::new(AffixKind::Prefix, text)
    }

    #[track_caller]
    pub fn suffix(text: impl Into<SharedString>) -> Self {
        Self::new(AffixKind::Suffix, text)
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn active(mut self, value: bool) -> Self {
        self.active = value;
        self
    }

    pub fn focused(mut self, value: bool) -> Self {
        self.focused = value;
        self
    }

    pub fn font_size(mut self, value: f32) -> Self {
        self.font_size = Some(value);
        self
    }

    pub fn color(mut self, value: Rgba) -> Self {
        self.color = Some(value);
        self
    }
}

impl MotionAware for Affix {
    fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = Some(value);
        self
    }
}

impl RenderOnce for Affix {
    fn render(mut self, window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        let motion = self.motion.unwrap_or(self.theme.motion);
        let font_size = self.font_size.unwrap_or(self.theme.metrics.font_size);
        let color = self
            .color
            .unwrap_or_else(|| self.theme.palette_or_fallback().base);
        let visuals = AffixVisuals::derive(self.kind, font_size, self.theme.metrics.affix_padding);
        let now = Instant::now();
        let (active, focused) = (self.active, self.focused);

        let (opacity, running) = AFFIX_MOTION.with(
            &self.id,
            || AffixMotion::new_at(active, focused, now),
            |state| {
                state.opacity.set_easing(motion.easing);
                state.update(active, focused, motion.effective_duration(), now);
                (state.opacity_at(now), state.is_running_at(now))
            },
        );
        if running {
            window.request_animation_frame();
        }

        let mut root = div()
            .id(self.id)
            .flex()
            .flex_row()
            .flex_none()
            .items_center()
            .h(px(visuals.height))
            .pl(px(visuals.padding_left))
            .pr(px(visuals.padding_right))
            .whitespace_nowrap()
            .text_size(px(font_size))
            .text_color(with_opacity(color, opacity));
        root = if visuals.align_end {
            root.justify_end().text_right()
        } else {
            root.justify_start().text_left()
        };
        root.child(self.text)
    }
}

impl crate::contracts::ComponentThemeOverridable for Affix {
    fn local_theme_mut(&mut self) -> &mut crate::theme::LocalTheme {
        &mut self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_target_covers_every_flag_pair() {
        for (active, focused) in [(false, false), (true, false), (false, true), (true, true)] {
            let expected = if active || focused { 1.0 } else { 0.0 };
            assert_eq!(AffixVisuals::opacity_target(active, focused), expected);
        }
    }

    #[test]
    fn toggles_retarget_immediately() {
        let start = Instant::now();
        let duration = Duration::from_millis(100);
        let mut motion = AffixMotion::new_at(false, false, start);
        assert!(motion.update(false, true, duration, start));
        assert_eq!(motion.target(), 1.0);
        assert!(motion.is_running_at(start + Duration::from_millis(10)));

        let later = start + Duration::from_millis(40);
        let midway = motion.opacity_at(later);
        assert!(motion.update(false, false, duration, later));
        assert_eq!(motion.target(), 0.0);
        assert!((motion.opacity_at(later) - midway).abs() < 1e-5);
    }

    #[test]
    fn prefix_and_suffix_reserve_opposite_padding() {
        let prefix = AffixVisuals::derive(AffixKind::Prefix, 16.0, 8.0);
        assert_eq!((prefix.padding_left, prefix.padding_right), (0.0, 8.0));
        assert!(!prefix.align_end);
        assert_eq!(prefix.height, 24.0);

        let suffix = AffixVisuals::derive(AffixKind::Suffix, 16.0, 8.0);
        assert_eq!((suffix.padding_left, suffix.padding_right), (8.0, 0.0));
        assert!(suffix.align_end);
    }
}
