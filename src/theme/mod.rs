use std::sync::{Arc, OnceLock};

use gpui::Rgba;

use crate::error::{FieldError, FieldResult};
use crate::motion::MotionConfig;
use crate::style::{LineType, StrokeWidth};

pub mod color;

pub use color::parse_color;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColorValue {
    White,
    Black,
    Custom(String),
}

impl ColorValue {
    pub fn custom(value: impl Into<String>) -> Self {
        Self::Custom(value.into())
    }
}

impl From<&str> for ColorValue {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}

impl From<String> for ColorValue {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldColors {
    pub tint: ColorValue,
    pub text: ColorValue,
    pub base: ColorValue,
    pub error: ColorValue,
}

impl FieldColors {
    pub fn defaults_for(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self {
                tint: ColorValue::custom("rgb(0, 145, 234)"),
                text: ColorValue::custom("#000000"),
                base: ColorValue::custom("#949494"),
                error: ColorValue::custom("rgb(213, 0, 0)"),
            },
            ColorScheme::Dark => Self {
                tint: ColorValue::custom("rgb(64, 196, 255)"),
                text: ColorValue::White,
                base: ColorValue::custom("#8a8a8a"),
                error: ColorValue::custom("rgb(255, 82, 82)"),
            },
        }
    }
}

/// Resolved colors used by the interpolations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPalette {
    pub tint: Rgba,
    pub text: Rgba,
    pub base: Rgba,
    pub error: Rgba,
}

impl FieldPalette {
    /// Light-scheme defaults, used when a configured color cannot be parsed.
    pub const FALLBACK: Self = Self {
        tint: Rgba {
            r: 0.0,
            g: 145.0 / 255.0,
            b: 234.0 / 255.0,
            a: 1.0,
        },
        text: Rgba {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        },
        base: Rgba {
            r: 148.0 / 255.0,
            g: 148.0 / 255.0,
            b: 148.0 / 255.0,
            a: 1.0,
        },
        error: Rgba {
            r: 213.0 / 255.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        },
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldMetrics {
    pub font_size: f32,
    pub title_font_size: f32,
    pub label_font_size: f32,
    pub label_height: f32,
    pub label_padding: f32,
    pub input_container_padding: f32,
    pub line_width: StrokeWidth,
    pub active_line_width: StrokeWidth,
    pub disabled_line_type: LineType,
    pub disabled_line_width: f32,
    pub icon_size_proportion: f32,
    pub affix_padding: f32,
}

impl Default for FieldMetrics {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            title_font_size: 12.0,
            label_font_size: 14.0,
            label_height: 32.0,
            label_padding: 4.0,
            input_container_padding: 10.0,
            line_width: StrokeWidth::Hairline,
            active_line_width: StrokeWidth::Px(2.0),
            disabled_line_type: LineType::Dotted,
            disabled_line_width: 1.0,
            icon_size_proportion: 1.5,
            affix_padding: 8.0,
        }
    }
}

impl FieldMetrics {
    pub fn validate(&self) -> FieldResult<()> {
        let sizes = [
            ("font_size", self.font_size),
            ("title_font_size", self.title_font_size),
            ("label_font_size", self.label_font_size),
            ("label_height", self.label_height),
            ("label_padding", self.label_padding),
            ("input_container_padding", self.input_container_padding),
            ("disabled_line_width", self.disabled_line_width),
            ("affix_padding", self.affix_padding),
        ];
        for (name, value) in sizes {
            check_size(name, value)?;
        }
        for (name, stroke) in [
            ("line_width", self.line_width),
            ("active_line_width", self.active_line_width),
        ] {
            if let StrokeWidth::Px(value) = stroke {
                check_size(name, value)?;
            }
        }
        if !self.icon_size_proportion.is_finite() || self.icon_size_proportion <= 0.0 {
            return Err(FieldError::InvalidProportion {
                value: self.icon_size_proportion,
            });
        }
        Ok(())
    }

    /// Height of one line of input text.
    pub fn line_box(&self) -> f32 {
        self.font_size * 1.5
    }
}

pub(crate) fn check_size(name: &'static str, value: f32) -> FieldResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidMetric { name, value })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub color_scheme: ColorScheme,
    pub colors: FieldColors,
    pub metrics: FieldMetrics,
    pub motion: MotionConfig,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Light,
            colors: FieldColors::defaults_for(ColorScheme::Light),
            metrics: FieldMetrics::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl Theme {
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self.colors = FieldColors::defaults_for(scheme);
        self
    }

    pub fn with_metrics(mut self, metrics: FieldMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn resolve_rgba(&self, name: &'static str, token: &ColorValue) -> FieldResult<Rgba> {
        match token {
            ColorValue::White => Ok(Rgba {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 1.0,
            }),
            ColorValue::Black => Ok(Rgba {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            }),
            ColorValue::Custom(raw) => parse_color(raw).ok_or_else(|| FieldError::InvalidColor {
                name,
                value: raw.clone(),
            }),
        }
    }

    pub fn resolve_hsla(&self, token: &ColorValue) -> gpui::Hsla {
        match self.resolve_rgba("color", token) {
            Ok(color) => color.into(),
            Err(error) => {
                log::warn!("{error}; falling back to black");
                gpui::black()
            }
        }
    }

    pub fn palette(&self) -> FieldResult<FieldPalette> {
        Ok(FieldPalette {
            tint: self.resolve_rgba("tint_color", &self.colors.tint)?,
            text: self.resolve_rgba("text_color", &self.colors.text)?,
            base: self.resolve_rgba("base_color", &self.colors.base)?,
            error: self.resolve_rgba("error_color", &self.colors.error)?,
        })
    }

    pub fn palette_or_fallback(&self) -> FieldPalette {
        match self.palette() {
            Ok(palette) => palette,
            Err(error) => {
                log::warn!("{error}; using fallback palette");
                FieldPalette::FALLBACK
            }
        }
    }

    pub fn merged(&self, patch: &ThemePatch) -> Self {
        let mut next = self.clone();
        if let Some(scheme) = patch.color_scheme {
            next = next.with_color_scheme(scheme);
        }
        next.colors = patch.colors.apply(next.colors);
        if let Some(metrics) = patch.metrics {
            next.metrics = metrics;
        }
        if let Some(motion) = patch.motion {
            next.motion = motion;
        }
        next
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorsPatch {
    pub tint: Option<ColorValue>,
    pub text: Option<ColorValue>,
    pub base: Option<ColorValue>,
    pub error: Option<ColorValue>,
}

impl ColorsPatch {
    pub fn tint(mut self, value: impl Into<ColorValue>) -> Self {
        self.tint = Some(value.into());
        self
    }

    pub fn text(mut self, value: impl Into<ColorValue>) -> Self {
        self.text = Some(value.into());
        self
    }

    pub fn base(mut self, value: impl Into<ColorValue>) -> Self {
        self.base = Some(value.into());
        self
    }

    pub fn error(mut self, value: impl Into<ColorValue>) -> Self {
        self.error = Some(value.into());
        self
    }

    pub fn apply(&self, mut colors: FieldColors) -> FieldColors {
        if let Some(value) = &self.tint {
            colors.tint = value.clone();
        }
        if let Some(value) = &self.text {
            colors.text = value.clone();
        }
        if let Some(value) = &self.base {
            colors.base = value.clone();
        }
        if let Some(value) = &self.error {
            colors.error = value.clone();
        }
        colors
    }

    pub fn is_empty(&self) -> bool {
        self.tint.is_none() && self.text.is_none() && self.base.is_none() && self.error.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemePatch {
    pub color_scheme: Option<ColorScheme>,
    pub colors: ColorsPatch,
    pub metrics: Option<FieldMetrics>,
    pub motion: Option<MotionConfig>,
}

impl ThemePatch {
    pub fn color_scheme(mut self, value: ColorScheme) -> Self {
        self.color_scheme = Some(value);
        self
    }

    pub fn colors(mut self, configure: impl FnOnce(ColorsPatch) -> ColorsPatch) -> Self {
        self.colors = configure(std::mem::take(&mut self.colors));
        self
    }

    pub fn metrics(mut self, value: FieldMetrics) -> Self {
        self.metrics = Some(value);
        self
    }

    pub fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = Some(value);
        self
    }
}

/// Per-component view of the provider theme with optional local overrides.
#[derive(Clone, Debug, Default)]
pub struct LocalTheme {
    resolved: Option<Arc<Theme>>,
    patch: Option<ThemePatch>,
}

impl LocalTheme {
    pub fn with_patch(mut self, patch: ThemePatch) -> Self {
        self.set_patch(Some(patch));
        self
    }

    pub fn set_patch(&mut self, patch: Option<ThemePatch>) {
        self.patch = patch;
        self.resolved = None;
    }

    pub fn update_patch(&mut self, configure: impl FnOnce(ThemePatch) -> ThemePatch) {
        let current = self.patch.take().unwrap_or_default();
        self.set_patch(Some(configure(current)));
    }

    pub fn sync_from_provider(&mut self, cx: &gpui::App) {
        let base = crate::provider::FieldProvider::theme_arc_or_default(cx);
        self.resolve_against(base);
    }

    pub fn resolve_against(&mut self, base: Arc<Theme>) {
        if let Some(patch) = &self.patch {
            self.resolved = Some(Arc::new(base.merged(patch)));
        } else {
            self.resolved = Some(base);
        }
    }

    fn fallback_theme() -> &'static Theme {
        static FALLBACK: OnceLock<Theme> = OnceLock::new();
        FALLBACK.get_or_init(Theme::default)
    }
}

impl std::ops::Deref for LocalTheme {
    type Target = Theme;

    fn deref(&self) -> &Self::Target {
        if let Some(resolved) = self.resolved.as_deref() {
            resolved
        } else {
            Self::fallback_theme()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_resolves() {
        let palette = Theme::default().palette().expect("defaults are valid colors");
        assert!((palette.tint.b - 234.0 / 255.0).abs() < 1e-3);
        assert_eq!(palette.text.r, 0.0);
    }

    #[test]
    fn invalid_custom_color_is_reported_by_name() {
        let theme = Theme::default().merged(
            &ThemePatch::default().colors(|colors| colors.tint("not-a-color")),
        );
        let error = theme.palette().expect_err("tint should be rejected");
        assert_eq!(
            error,
            FieldError::InvalidColor {
                name: "tint_color",
                value: "not-a-color".into(),
            }
        );
    }

    #[test]
    fn dark_scheme_swaps_defaults() {
        let theme = Theme::default().with_color_scheme(ColorScheme::Dark);
        assert_eq!(theme.colors.text, ColorValue::White);
    }

    #[test]
    fn metrics_reject_negative_and_nan_sizes() {
        let metrics = FieldMetrics {
            font_size: -1.0,
            ..FieldMetrics::default()
        };
        assert!(matches!(
            metrics.validate(),
            Err(FieldError::InvalidMetric { name: "font_size", .. })
        ));

        let metrics = FieldMetrics {
            active_line_width: StrokeWidth::Px(f32::NAN),
            ..FieldMetrics::default()
        };
        assert!(metrics.validate().is_err());

        let metrics = FieldMetrics {
            icon_size_proportion: 0.0,
            ..FieldMetrics::default()
        };
        assert!(matches!(
            metrics.validate(),
            Err(FieldError::InvalidProportion { .. })
        ));
    }

    #[test]
    fn local_patch_applies_over_provider_theme() {
        let mut local = LocalTheme::default()
            .with_patch(ThemePatch::default().colors(|colors| colors.base("#101010")));
        local.resolve_against(Arc::new(Theme::default()));
        assert_eq!(local.colors.base, ColorValue::custom("#101010"));
        assert_eq!(local.colors.tint, FieldColors::defaults_for(ColorScheme::Light).tint);
    }
}
