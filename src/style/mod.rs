#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineType {
    Solid,
    Dashed,
    Dotted,
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextAlign {
    Left,
    Right,
}

impl LayoutDirection {
    pub fn text_align(self) -> TextAlign {
        match self {
            LayoutDirection::Ltr => TextAlign::Left,
            LayoutDirection::Rtl => TextAlign::Right,
        }
    }
}

/// Stroke thickness in logical pixels. `Hairline` is the thinnest line the
/// display can draw and is resolved against the window scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeWidth {
    Hairline,
    Px(f32),
}

impl StrokeWidth {
    pub fn logical_px(self, scale_factor: f32) -> f32 {
        match self {
            StrokeWidth::Hairline => 1.0 / scale_factor.max(f32::EPSILON),
            StrokeWidth::Px(value) => value,
        }
    }
}

impl From<f32> for StrokeWidth {
    fn from(value: f32) -> Self {
        StrokeWidth::Px(value)
    }
}
