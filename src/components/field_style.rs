//! Style derivations. Everything here is recomputed on every render from the
//! field state and the resolved theme; nothing is stored.

use std::time::Instant;

use gpui::Rgba;

use crate::animation::{ColorInterpolation, Interpolation};
use crate::style::AffixKind;
use crate::theme::{FieldMetrics, FieldPalette};

use super::field_state::FieldState;

const FOCUS_STOPS: [f32; 3] = [-1.0, 0.0, 1.0];
const RAISE_STOPS: [f32; 2] = [0.0, 1.0];
const COLLAPSED_HELPER_HEIGHT: f32 = 8.0;

/// Inputs that do not live in [`FieldState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLook {
    pub palette: FieldPalette,
    pub metrics: FieldMetrics,
    pub scale_factor: f32,
    pub has_placeholder: bool,
    pub has_title: bool,
    pub multiline: bool,
    pub fixed_height: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldVisuals {
    pub active: bool,
    pub restricted: bool,
    pub focus_progress: f32,
    pub border_color: Rgba,
    pub border_width: f32,
    pub error_color: Rgba,
    pub error_opacity: f32,
    pub error_font_size: f32,
    pub title_color: Rgba,
    pub title_opacity: f32,
    pub title_font_size: f32,
    pub helper_height: f32,
    pub input_container_height: f32,
    pub input_height: f32,
    pub input_color: Rgba,
    pub label_base_color: Rgba,
    pub counter: CounterVisuals,
}

impl FieldVisuals {
    pub fn derive(state: &FieldState, look: &FieldLook, now: Instant) -> Self {
        let palette = look.palette;
        let metrics = &look.metrics;
        let props = state.props();
        let value = state.value();
        let count = value.chars().count();
        let limit = props.limit();
        let restricted = limit.is_some_and(|limit| limit < count);
        let active = !value.is_empty() || look.has_placeholder;
        let progress = state.focus_progress_at(now);

        let active_width = metrics.active_line_width.logical_px(look.scale_factor);
        let line_width = metrics.line_width.logical_px(look.scale_factor);
        let (border_color, border_width) = if restricted {
            (palette.error, active_width)
        } else {
            (
                ColorInterpolation::new(FOCUS_STOPS, [palette.error, palette.base, palette.tint])
                    .sample(progress),
                Interpolation::new(FOCUS_STOPS, [active_width, line_width, active_width])
                    .sample(progress),
            )
        };

        let title_font_size = metrics.title_font_size;
        let error_font_size = if look.has_title {
            title_font_size
        } else {
            Interpolation::new(FOCUS_STOPS, [title_font_size, 0.0, 0.0]).sample(progress)
        };
        let helper_height = if look.has_title || limit.is_some() {
            title_font_size * 2.0
        } else {
            Interpolation::new(
                FOCUS_STOPS,
                [title_font_size * 2.0, COLLAPSED_HELPER_HEIGHT, COLLAPSED_HELPER_HEIGHT],
            )
            .sample(progress)
        };

        let line_box = metrics.line_box();
        let content_height = match (look.multiline, look.fixed_height) {
            (true, Some(height)) => height,
            _ => state.content_height(),
        };
        let (input_container_height, input_height) = if look.multiline {
            (
                metrics.label_height + metrics.input_container_padding + content_height,
                line_box + content_height,
            )
        } else {
            (
                metrics.label_height + metrics.input_container_padding + line_box,
                line_box,
            )
        };

        let input_color = if props.disabled || state.shows_default_value() {
            palette.base
        } else {
            palette.text
        };
        let label_base_color = if props.disabled {
            palette.base
        } else {
            palette.text
        };

        Self {
            active,
            restricted,
            focus_progress: progress,
            border_color,
            border_width,
            error_color: palette.error,
            error_opacity: Interpolation::new(FOCUS_STOPS, [1.0, 0.0, 0.0]).sample(progress),
            error_font_size,
            title_color: palette.base,
            title_opacity: Interpolation::new(FOCUS_STOPS, [0.0, 1.0, 1.0]).sample(progress),
            title_font_size,
            helper_height,
            input_container_height,
            input_height,
            input_color,
            label_base_color,
            counter: CounterVisuals::derive(count, limit, &palette),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelVisuals {
    pub top: f32,
    pub font_size: f32,
    pub color: Rgba,
}

/// Colors and sizes the label interpolates between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    pub base_size: f32,
    pub base_padding: f32,
    pub font_size: f32,
    pub active_font_size: f32,
    pub tint_color: Rgba,
    pub base_color: Rgba,
    pub error_color: Rgba,
}

impl LabelVisuals {
    pub fn derive(style: &LabelStyle, raise: f32, focus: f32, restricted: bool) -> Self {
        let top = Interpolation::new(
            RAISE_STOPS,
            [
                style.base_size + style.font_size * 0.25,
                style.base_size - style.base_padding - style.active_font_size,
            ],
        )
        .sample(raise);
        let font_size =
            Interpolation::new(RAISE_STOPS, [style.font_size, style.active_font_size]).sample(raise);
        let color = if restricted {
            style.error_color
        } else {
            ColorInterpolation::new(
                FOCUS_STOPS,
                [style.error_color, style.base_color, style.tint_color],
            )
            .sample(focus)
        };
        Self {
            top,
            font_size,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterVisuals {
    pub text: Option<(usize, usize)>,
    pub color: Rgba,
}

impl CounterVisuals {
    pub fn derive(count: usize, limit: Option<usize>, palette: &FieldPalette) -> Self {
        let limit = limit.filter(|limit| *limit > 0);
        let color = match limit {
            Some(limit) if count > limit => palette.error,
            _ => palette.base,
        };
        Self {
            text: limit.map(|limit| (count, limit)),
            color,
        }
    }

    pub fn label(&self) -> Option<String> {
        self.text.map(|(count, limit)| format!("{count} / {limit}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffixVisuals {
    pub height: f32,
    pub padding_left: f32,
    pub padding_right: f32,
    pub align_end: bool,
}

impl AffixVisuals {
    pub fn derive(kind: AffixKind, font_size: f32, padding: f32) -> Self {
        let (padding_left, padding_right, align_end) = match kind {
            AffixKind::Prefix => (0.0, padding, false),
            AffixKind::Suffix => (padding, 0.0, true),
        };
        Self {
            height: font_size * 1.5,
            padding_left,
            padding_right,
            align_end,
        }
    }

    /// Opacity target for the (active, focused) pair.
    pub fn opacity_target(active: bool, focused: bool) -> f32 {
        if active || focused { 1.0 } else { 0.0 }
    }
}

/// Raise target for the label.
pub fn label_raise_target(active: bool, focused: bool) -> f32 {
    if active || focused { 1.0 } else { 0.0 }
}
