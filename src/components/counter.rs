use gpui::{IntoElement, ParentElement, RenderOnce, Styled, Window, div, px};

use crate::theme::FieldPalette;

use super::field_style::CounterVisuals;
use super::utils::to_hsla;

/// `count / limit` indicator. Renders nothing without a limit.
#[derive(IntoElement)]
pub struct Counter {
    count: usize,
    limit: Option<usize>,
    font_size: Option<f32>,
    palette: Option<FieldPalette>,
    derived: Option<CounterVisuals>,
    theme: crate::theme::LocalTheme,
}

impl Counter {
    pub fn new(count: usize, limit: Option<usize>) -> Self {
        Self {
            count,
            limit,
            font_size: None,
            palette: None,
            derived: None,
            theme: crate::theme::LocalTheme::default(),
        }
    }

    /// Renders visuals already derived by the owning field.
    pub fn from_visuals(visuals: CounterVisuals) -> Self {
        let (count, limit) = visuals.text.unzip();
        Self {
            derived: Some(visuals),
            ..Self::new(count.unwrap_or_default(), limit)
        }
    }

    pub fn font_size(mut self, value: f32) -> Self {
        self.font_size = Some(value);
        self
    }

    pub fn palette(mut self, value: FieldPalette) -> Self {
        self.palette = Some(value);
        self
    }
}

impl RenderOnce for Counter {
    fn render(mut self, _window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        let palette = self
            .palette
            .unwrap_or_else(|| self.theme.palette_or_fallback());
        let visuals = self
            .derived
            .unwrap_or_else(|| CounterVisuals::derive(self.count, self.limit, &palette));
        let Some(text) = visuals.label() else {
            return div();
        };

        div()
            .flex_none()
            .pl(px(4.0))
            .whitespace_nowrap()
            .text_right()
            .text_size(px(self
                .font_size
                .unwrap_or(self.theme.metrics.title_font_size)))
            .text_color(to_hsla(visuals.color))
            .child(text)
    }
}

impl crate::contracts::ComponentThemeOverridable for Counter {
    fn local_theme_mut(&mut self) -> &mut crate::theme::LocalTheme {
        &mut self.theme
    }
}
