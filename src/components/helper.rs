use gpui::{IntoElement, ParentElement, RenderOnce, Rgba, SharedString, Styled, Window, div, px};

use crate::style::TextAlign;

use super::utils::{align_text, with_opacity};

/// One line of auxiliary text below the field. Color, opacity and size come
/// from the caller.
#[derive(IntoElement)]
pub struct Helper {
    text: Option<SharedString>,
    color: Rgba,
    opacity: f32,
    font_size: f32,
    align: TextAlign,
}

impl Helper {
    pub fn new(text: Option<SharedString>) -> Self {
        Self {
            text,
            color: Rgba {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            opacity: 1.0,
            font_size: 12.0,
            align: TextAlign::Left,
        }
    }

    pub fn color(mut self, value: Rgba) -> Self {
        self.color = value;
        self
    }

    pub fn opacity(mut self, value: f32) -> Self {
        self.opacity = value;
        self
    }

    pub fn font_size(mut self, value: f32) -> Self {
        self.font_size = value;
        self
    }

    pub fn align(mut self, value: TextAlign) -> Self {
        self.align = value;
        self
    }
}

impl RenderOnce for Helper {
    fn render(self, _window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        let root = align_text(div().w_full().truncate(), self.align);
        match self.text {
            Some(text) if self.font_size > 0.0 => root
                .text_size(px(self.font_size))
                .text_color(with_opacity(self.color, self.opacity))
                .child(text),
            _ => root,
        }
    }
}
