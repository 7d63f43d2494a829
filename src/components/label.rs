use std::time::{Duration, Instant};

use gpui::{
    InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString, Styled, Window, div,
    px,
};

use crate::animation::AnimatedValue;
use crate::contracts::MotionAware;
use crate::id::ComponentId;
use crate::motion::MotionConfig;
use crate::style::TextAlign;

use super::control::StateStore;
use super::field_state::FocusState;
use super::field_style::{LabelStyle, LabelVisuals, label_raise_target};
use super::utils::{align_text, to_hsla};

static LABEL_MOTION: StateStore<LabelMotion> = StateStore::new("label motion");

pub(super) fn clear_state() {
    LABEL_MOTION.clear();
}

pub(super) fn release_tree(id: &str) {
    LABEL_MOTION.remove_tree(id);
}

/// The two label channels and the flags they were last driven by.
#[derive(Clone, Debug)]
pub struct LabelMotion {
    raise: AnimatedValue,
    focus: AnimatedValue,
    active: bool,
    focused: bool,
    errored: bool,
}

impl LabelMotion {
    pub fn new_at(active: bool, focused: bool, errored: bool, now: Instant) -> Self {
        Self {
            raise: AnimatedValue::new_at(label_raise_target(active, focused), now),
            focus: AnimatedValue::new_at(FocusState::resolve(errored, focused).value(), now),
            active,
            focused,
            errored,
        }
    }

    /// Retargets whichever channel depends on a flag that toggled.
    pub fn update(
        &mut self,
        active: bool,
        focused: bool,
        errored: bool,
        duration: Duration,
        now: Instant,
    ) -> bool {
        let focused_changed = focused != self.focused;
        let mut retargeted = false;
        if focused_changed || active != self.active {
            self.raise
                .retarget_at(label_raise_target(active, focused), duration, now);
            retargeted = true;
        }
        if focused_changed || errored != self.errored {
            self.focus
                .retarget_at(FocusState::resolve(errored, focused).value(), duration, now);
            retargeted = true;
        }
        self.active = active;
        self.focused = focused;
        self.errored = errored;
        retargeted
    }

    pub fn set_easing(&mut self, motion: &MotionConfig) {
        self.raise.set_easing(motion.easing);
        self.focus.set_easing(motion.easing);
    }

    pub fn raise_at(&self, now: Instant) -> f32 {
        self.raise.value_at(now)
    }

    pub fn focus_at(&self, now: Instant) -> f32 {
        self.focus.value_at(now)
    }

    pub fn raise_target(&self) -> f32 {
        self.raise.target()
    }

    pub fn focus_target(&self) -> f32 {
        self.focus.target()
    }

    pub fn is_running_at(&self, now: Instant) -> bool {
        self.raise.is_running_at(now) || self.focus.is_running_at(now)
    }
}

/// Floating label. Rests inside the input line and rises above it once the
/// field is active or focused.
#[derive(IntoElement)]
pub struct Label {
    id: ComponentId,
    text: SharedString,
    active: bool,
    focused: bool,
    errored: bool,
    restricted: bool,
    style: Option<LabelStyle>,
    align: TextAlign,
    motion: Option<MotionConfig>,
    theme: crate::theme::LocalTheme,
}

impl Label {
    #[track_caller]
    pub fn new(text: impl Into<SharedString>) -> Self {
        Self {
            id: ComponentId::auto("label"),
            text: text.into(),
            active: false,
            focused: false,
            errored: false,
            restricted: false,
            style: None,
            align: TextAlign::Left,
            motion: None,
            theme: crate::theme::LocalTheme::default(),
        }
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

    pub fn errored(mut self, value: bool) -> Self {
        self.errored = value;
        self
    }

    pub fn restricted(mut self, value: bool) -> Self {
        self.restricted = value;
        self
    }

    pub fn label_style(mut self, value: LabelStyle) -> Self {
        self.style = Some(value);
        self
    }

    pub fn align(mut self, value: TextAlign) -> Self {
        self.align = value;
        self
    }

    fn resolved_style(&self) -> LabelStyle {
        if let Some(style) = self.style {
            return style;
        }
        let palette = self.theme.palette_or_fallback();
        let metrics = &self.theme.metrics;
        LabelStyle {
            base_size: metrics.label_height,
            base_padding: metrics.label_padding,
            font_size: metrics.font_size,
            active_font_size: metrics.label_font_size,
            tint_color: palette.tint,
            base_color: palette.text,
            error_color: palette.error,
        }
    }
}

impl MotionAware for Label {
    fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = Some(value);
        self
    }
}

impl RenderOnce for Label {
    fn render(mut self, window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        let motion = self.motion.unwrap_or(self.theme.motion);
        let style = self.resolved_style();
        let now = Instant::now();
        let (active, focused, errored) = (self.active, self.focused, self.errored);

        let (raise, focus, running) = LABEL_MOTION.with(
            &self.id,
            || LabelMotion::new_at(active, focused, errored, now),
            |state| {
                state.set_easing(&motion);
                state.update(active, focused, errored, motion.effective_duration(), now);
                (state.raise_at(now), state.focus_at(now), state.is_running_at(now))
            },
        );
        if running {
            window.request_animation_frame();
        }

        let visuals = LabelVisuals::derive(&style, raise, focus, self.restricted);
        let text = align_text(
            div()
                .w_full()
                .truncate()
                .text_size(px(visuals.font_size))
                .text_color(to_hsla(visuals.color)),
            self.align,
        )
        .child(self.text);

        div()
            .id(self.id)
            .absolute()
            .left_0()
            .right_0()
            .top(px(visuals.top))
            .child(text)
    }
}

impl crate::contracts::ComponentThemeOverridable for Label {
    fn local_theme_mut(&mut self) -> &mut crate::theme::LocalTheme {
        &mut self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(225);

    #[test]
    fn raise_follows_active_or_focused() {
        let start = Instant::now();
        let mut motion = LabelMotion::new_at(false, false, false, start);
        assert_eq!(motion.raise_target(), 0.0);

        assert!(motion.update(true, false, false, DURATION, start));
        assert_eq!(motion.raise_target(), 1.0);
        assert_eq!(motion.focus_target(), 0.0);

        motion.update(false, true, false, DURATION, start);
        assert_eq!(motion.raise_target(), 1.0);
        assert_eq!(motion.focus_target(), 1.0);
    }

    #[test]
    fn unchanged_flags_do_not_restart_channels() {
        let start = Instant::now();
        let mut motion = LabelMotion::new_at(true, true, false, start);
        assert!(!motion.update(true, true, false, DURATION, start));
        assert!(!motion.is_running_at(start));
    }

    #[test]
    fn toggle_mid_run_retargets_from_the_current_position() {
        let start = Instant::now();
        let mut motion = LabelMotion::new_at(false, false, false, start);
        motion.update(false, true, false, DURATION, start);
        let midway = start + DURATION / 2;
        let raised = motion.raise_at(midway);
        motion.update(false, false, false, DURATION, midway);
        assert_eq!(motion.raise_target(), 0.0);
        assert!((motion.raise_at(midway) - raised).abs() < 1e-5);
    }
}
