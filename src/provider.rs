use std::sync::Arc;

use crate::style::LayoutDirection;
use crate::theme::{Theme, ThemePatch};

pub struct FieldProvider {
    theme: Arc<Theme>,
    direction: LayoutDirection,
}

impl Default for FieldProvider {
    fn default() -> Self {
        Self {
            theme: Arc::new(Theme::default()),
            direction: crate::i18n::system_direction(),
        }
    }
}

impl gpui::Global for FieldProvider {}

impl FieldProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_theme(mut self, configure: impl FnOnce(Arc<Theme>) -> Theme) -> Self {
        self.theme = configure(self.theme).into();
        self
    }

    pub fn patch_theme(mut self, patch: ThemePatch) -> Self {
        self.theme = Arc::new(self.theme.merged(&patch));
        self
    }

    pub fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn init(self, cx: &mut gpui::App) {
        crate::components::bind_entry_keys(cx);
        cx.set_global(self);
    }

    pub fn theme_arc_or_default(cx: &gpui::App) -> Arc<Theme> {
        if cx.has_global::<FieldProvider>() {
            cx.global::<FieldProvider>().theme.clone()
        } else {
            Arc::new(Theme::default())
        }
    }

    pub fn layout_direction(cx: &gpui::App) -> LayoutDirection {
        if cx.has_global::<FieldProvider>() {
            cx.global::<FieldProvider>().direction
        } else {
            crate::i18n::system_direction()
        }
    }
}
