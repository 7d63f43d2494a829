use gpui::{
    Bounds, IntoElement, ParentElement, RenderOnce, Rgba, Styled, Window, canvas, div, fill,
    point, px, size,
};

use crate::style::LineType;

use super::utils::{quantized_stroke_px, to_hsla};

/// Horizontal `(offset, length)` runs that make up a patterned line.
pub fn line_segments(line_type: LineType, total: f32, stroke: f32) -> Vec<(f32, f32)> {
    if !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }
    let (dash, gap) = match line_type {
        LineType::None => return Vec::new(),
        LineType::Solid => return vec![(0.0, total)],
        LineType::Dotted => (stroke, stroke * 2.0),
        LineType::Dashed => (stroke * 4.0, stroke * 3.0),
    };
    let period = dash + gap;
    if period <= 0.0 {
        return vec![(0.0, total)];
    }
    let mut segments = Vec::new();
    let mut offset = 0.0;
    while offset < total {
        segments.push((offset, dash.min(total - offset)));
        offset += period;
    }
    segments
}

/// Static underline drawn in place of the animated one on disabled fields.
#[derive(IntoElement)]
pub struct Line {
    line_type: LineType,
    width: f32,
    color: Rgba,
}

impl Line {
    pub fn new(line_type: LineType, width: f32, color: Rgba) -> Self {
        Self {
            line_type,
            width,
            color,
        }
    }
}

impl RenderOnce for Line {
    fn render(self, window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        let stroke = quantized_stroke_px(window, self.width);
        let stroke_px = f32::from(stroke);
        let color = to_hsla(self.color);
        let line_type = self.line_type;

        div()
            .absolute()
            .left_0()
            .right_0()
            .bottom_0()
            .h(stroke)
            .child(
                canvas(
                    |_, _, _| (),
                    move |bounds, _, window, _| {
                        let total = f32::from(bounds.size.width);
                        for (offset, length) in line_segments(line_type, total, stroke_px) {
                            let segment = Bounds::new(
                                point(bounds.origin.x + px(offset), bounds.origin.y),
                                size(px(length), px(stroke_px)),
                            );
                            window.paint_quad(fill(segment, color));
                        }
                    },
                )
                .size_full(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_and_none_lines() {
        assert_eq!(line_segments(LineType::Solid, 120.0, 1.0), vec![(0.0, 120.0)]);
        assert!(line_segments(LineType::None, 120.0, 1.0).is_empty());
        assert!(line_segments(LineType::Dotted, 0.0, 1.0).is_empty());
    }

    #[test]
    fn dotted_line_alternates_dots_and_gaps() {
        let dots = line_segments(LineType::Dotted, 10.0, 1.0);
        assert_eq!(dots, vec![(0.0, 1.0), (3.0, 1.0), (6.0, 1.0), (9.0, 1.0)]);
    }

    #[test]
    fn last_dash_is_clipped_to_the_width() {
        let dashes = line_segments(LineType::Dashed, 9.0, 1.0);
        assert_eq!(dashes, vec![(0.0, 4.0), (7.0, 2.0)]);
    }
}
