use std::rc::Rc;

use gpui::{Hsla, Pixels, Rgba, Window, px};

use crate::style::TextAlign;

pub type FieldHandler = Rc<dyn Fn(&mut Window, &mut gpui::App)>;
pub type TextHandler = Rc<dyn Fn(&str, &mut Window, &mut gpui::App)>;
pub type HeightHandler = Rc<dyn Fn(f32, &mut Window, &mut gpui::App)>;

pub fn to_hsla(color: Rgba) -> Hsla {
    color.into()
}

pub fn with_opacity(color: Rgba, opacity: f32) -> Hsla {
    let mut color = to_hsla(color);
    color.a *= opacity.clamp(0.0, 1.0);
    color
}

pub fn align_text<T: gpui::Styled>(node: T, align: TextAlign) -> T {
    match align {
        TextAlign::Left => node.text_left(),
        TextAlign::Right => node.text_right(),
    }
}

fn scale_factor(window: &Window) -> f32 {
    window.scale_factor().max(f32::EPSILON)
}

pub fn snap_px(window: &Window, logical_px: f32) -> Pixels {
    if !logical_px.is_finite() {
        return px(0.0);
    }
    let scale = scale_factor(window);
    px((logical_px * scale).round() / scale)
}

pub fn hairline_px(window: &Window) -> Pixels {
    px(1.0 / scale_factor(window))
}

pub fn quantized_stroke_px(window: &Window, logical_px: f32) -> Pixels {
    if !logical_px.is_finite() || logical_px <= 0.0 {
        return px(0.0);
    }
    let snapped = snap_px(window, logical_px);
    if f32::from(snapped) > 0.0 {
        snapped
    } else {
        hairline_px(window)
    }
}
