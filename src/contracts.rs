use gpui::SharedString;

use crate::motion::MotionConfig;
use crate::theme::{LocalTheme, ThemePatch};

pub trait Disableable: Sized {
    fn disabled(self, value: bool) -> Self;
}

#[macro_export]
macro_rules! impl_disableable {
    ($type:ty) => {
        impl $crate::contracts::Disableable for $type {
            fn disabled(self, value: bool) -> Self {
                <$type>::disabled(self, value)
            }
        }
    };
}

/// Components that show a label, a hint line and a validation message.
pub trait FieldLike: Sized {
    fn label(self, value: impl Into<SharedString>) -> Self;
    fn title(self, value: impl Into<SharedString>) -> Self;
    fn error(self, value: impl Into<SharedString>) -> Self;
}

pub trait MotionAware: Sized {
    fn motion(self, value: MotionConfig) -> Self;
}

pub trait ComponentThemeOverridable: Sized {
    fn local_theme_mut(&mut self) -> &mut LocalTheme;

    fn with_theme_patch(mut self, patch: ThemePatch) -> Self {
        self.local_theme_mut().set_patch(Some(patch));
        self
    }

    fn themed(mut self, configure: impl FnOnce(ThemePatch) -> ThemePatch) -> Self {
        self.local_theme_mut().update_patch(configure);
        self
    }

    fn clear_theme_overrides(mut self) -> Self {
        self.local_theme_mut().set_patch(None);
        self
    }
}
