use gpui::{
    Hsla, InteractiveElement, IntoElement, ParentElement, RenderOnce, Styled, div, px, svg,
};

use crate::icon::{IconName, IconRegistry};
use crate::id::ComponentId;

/// SVG icon from the [`IconRegistry`], tinted with `color`. Unknown names
/// render a placeholder glyph of the same size.
#[derive(IntoElement)]
pub struct Icon {
    id: ComponentId,
    name: IconName,
    size: f32,
    color: Option<Hsla>,
    registry: IconRegistry,
}

impl Icon {
    #[track_caller]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: ComponentId::auto("icon"),
            name: IconName::new(name),
            size: 16.0,
            color: None,
            registry: IconRegistry::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size.max(8.0);
        self
    }

    pub fn color(mut self, value: Hsla) -> Self {
        self.color = Some(value);
        self
    }

    pub fn registry(mut self, registry: IconRegistry) -> Self {
        self.registry = registry;
        self
    }
}

impl RenderOnce for Icon {
    fn render(self, _window: &mut gpui::Window, _cx: &mut gpui::App) -> impl IntoElement {
        if let Some(path) = self.registry.resolve(&self.name) {
            let mut icon = svg()
                .external_path(path.to_string_lossy().to_string())
                .w(px(self.size))
                .h(px(self.size))
                .id(self.id);
            if let Some(color) = self.color {
                icon = icon.text_color(color);
            }
            return icon.into_any_element();
        }

        log::warn!("unknown icon {}", self.name.as_str());
        let mut fallback = div()
            .id(self.id)
            .w(px(self.size))
            .h(px(self.size))
            .child("?");
        if let Some(color) = self.color {
            fallback = fallback.text_color(color);
        }
        fallback.into_any_element()
    }
}
