//! Material-style text field: floating label, underline, affixes, helper row
//! and character counter around a [`TextEntry`].

use std::rc::Rc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use gpui::{
    AnyElement, InteractiveElement, IntoElement, MouseButton, ParentElement, RenderOnce,
    SharedString, StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::animation::SettleTicket;
use crate::contracts::{ComponentThemeOverridable, FieldLike, MotionAware};
use crate::error::{FieldError, FieldResult};
use crate::id::ComponentId;
use crate::motion::MotionConfig;
use crate::provider::FieldProvider;
use crate::style::{LineType, StrokeWidth};
use crate::theme::{ColorValue, ColorsPatch, FieldMetrics, FieldPalette, LocalTheme, check_size};

use super::affix::Affix;
use super::control::{self, StateStore};
use super::counter::Counter;
use super::field_state::{EntryPrimitive, FieldEvent, FieldProps, FieldState};
use super::field_style::{FieldLook, FieldVisuals, LabelStyle};
use super::helper::Helper;
use super::icon::Icon;
use super::label::Label;
use super::line::Line;
use super::text_entry::{EntryControl, EntryHandlers, TextEntry, focus_handle_for};
use super::utils::{FieldHandler, HeightHandler, TextHandler, quantized_stroke_px, to_hsla};

const MAX_ANIMATION_DURATION_MS: u64 = 60_000;

type AccessoryRenderer = Box<dyn FnOnce() -> AnyElement>;

pub(super) static FIELD_STATE: StateStore<FieldState> = StateStore::new("text field");
static SETTLE_TIMERS: StateStore<Option<u64>> = StateStore::new("field settle timers");
static PENDING_EVENTS: StateStore<Vec<FieldEvent>> = StateStore::new("field pending events");

pub(super) fn clear_state() {
    FIELD_STATE.clear();
    SETTLE_TIMERS.clear();
    PENDING_EVENTS.clear();
}

pub(super) fn release_tree(id: &str) {
    FIELD_STATE.remove_tree(id);
    SETTLE_TIMERS.remove_tree(id);
    PENDING_EVENTS.remove_tree(id);
}

/// Events queued by [`TextFieldHandle`] for the field's next render.
pub(super) fn take_pending_events(id: &str) -> Vec<FieldEvent> {
    PENDING_EVENTS.remove(id).unwrap_or_default()
}

/// Settles the focus animation of field `id` if `ticket` is still current.
pub fn settle_field(id: &str, ticket: SettleTicket) -> bool {
    FIELD_STATE
        .with_existing(id, |state| state.complete_focus_animation(ticket))
        .unwrap_or(false)
}

/// Sleeps until `ticket` is due and then settles it.
pub async fn settle_after(id: String, ticket: SettleTicket) -> bool {
    let remaining = ticket.remaining(Instant::now());
    if !remaining.is_zero() {
        Delay::new(remaining).await;
    }
    settle_field(&id, ticket)
}

/// What pressing enter does on a single-line entry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmitBehavior {
    #[default]
    Submit,
    BlurAndSubmit,
}

/// Options handed straight to the editable primitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryAttributes {
    pub max_length: Option<usize>,
    pub selection_color: Option<ColorValue>,
    pub read_only: bool,
    pub auto_focus: bool,
    pub submit_behavior: SubmitBehavior,
}

/// Every non-callback option a [`TextField`] understands. Unset sizes and
/// colors fall back to the theme.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub value: Option<String>,
    pub default_value: Option<String>,
    pub error: Option<String>,
    pub title: Option<SharedString>,
    pub label: Option<SharedString>,
    pub placeholder: Option<SharedString>,
    pub character_restriction: Option<usize>,
    pub disabled: bool,
    pub editable: bool,
    pub secure_text_entry: bool,
    pub clear_text_on_focus: bool,
    pub multiline: bool,
    pub height: Option<f32>,
    pub prefix: Option<SharedString>,
    pub suffix: Option<SharedString>,
    pub suffix_icon: Option<String>,
    pub animation_duration_ms: Option<u64>,
    pub font_size: Option<f32>,
    pub title_font_size: Option<f32>,
    pub label_font_size: Option<f32>,
    pub label_height: Option<f32>,
    pub label_padding: Option<f32>,
    pub input_container_padding: Option<f32>,
    pub line_width: Option<StrokeWidth>,
    pub active_line_width: Option<StrokeWidth>,
    pub disabled_line_type: Option<LineType>,
    pub disabled_line_width: Option<f32>,
    pub icon_size_proportion: Option<f32>,
    pub colors: ColorsPatch,
    pub entry: EntryAttributes,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            error: None,
            title: None,
            label: None,
            placeholder: None,
            character_restriction: None,
            disabled: false,
            editable: true,
            secure_text_entry: false,
            clear_text_on_focus: false,
            multiline: false,
            height: None,
            prefix: None,
            suffix: None,
            suffix_icon: None,
            animation_duration_ms: None,
            font_size: None,
            title_font_size: None,
            label_font_size: None,
            label_height: None,
            label_padding: None,
            input_container_padding: None,
            line_width: None,
            active_line_width: None,
            disabled_line_type: None,
            disabled_line_width: None,
            icon_size_proportion: None,
            colors: ColorsPatch::default(),
            entry: EntryAttributes::default(),
        }
    }
}

/// Configuration merged with the theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedField {
    pub metrics: FieldMetrics,
    pub palette: FieldPalette,
    pub selection: Option<gpui::Rgba>,
    pub motion: MotionConfig,
}

impl ResolvedField {
    pub fn duration(&self) -> Duration {
        self.motion.effective_duration()
    }
}

impl FieldConfig {
    pub fn metrics(&self, base: FieldMetrics) -> FieldMetrics {
        FieldMetrics {
            font_size: self.font_size.unwrap_or(base.font_size),
            title_font_size: self.title_font_size.unwrap_or(base.title_font_size),
            label_font_size: self.label_font_size.unwrap_or(base.label_font_size),
            label_height: self.label_height.unwrap_or(base.label_height),
            label_padding: self.label_padding.unwrap_or(base.label_padding),
            input_container_padding: self
                .input_container_padding
                .unwrap_or(base.input_container_padding),
            line_width: self.line_width.unwrap_or(base.line_width),
            active_line_width: self.active_line_width.unwrap_or(base.active_line_width),
            disabled_line_type: self.disabled_line_type.unwrap_or(base.disabled_line_type),
            disabled_line_width: self.disabled_line_width.unwrap_or(base.disabled_line_width),
            icon_size_proportion: self.icon_size_proportion.unwrap_or(base.icon_size_proportion),
            affix_padding: base.affix_padding,
        }
    }

    /// Merges the options with `theme`, rejecting anything unusable.
    pub fn resolve(
        &self,
        theme: &crate::theme::Theme,
        motion: Option<MotionConfig>,
    ) -> FieldResult<ResolvedField> {
        let metrics = self.metrics(theme.metrics);
        metrics.validate()?;
        if let Some(height) = self.height {
            check_size("height", height)?;
        }

        let mut motion = motion.unwrap_or(theme.motion);
        if let Some(duration_ms) = self.animation_duration_ms {
            motion = motion.duration_ms(duration_ms);
        }
        if motion.duration_ms > MAX_ANIMATION_DURATION_MS {
            return Err(FieldError::InvalidDuration {
                value_ms: motion.duration_ms,
            });
        }

        let colors = self.colors.apply(theme.colors.clone());
        let palette = FieldPalette {
            tint: theme.resolve_rgba("tint_color", &colors.tint)?,
            text: theme.resolve_rgba("text_color", &colors.text)?,
            base: theme.resolve_rgba("base_color", &colors.base)?,
            error: theme.resolve_rgba("error_color", &colors.error)?,
        };
        let selection = self
            .entry
            .selection_color
            .as_ref()
            .map(|color| theme.resolve_rgba("selection_color", color))
            .transpose()?;

        Ok(ResolvedField {
            metrics,
            palette,
            selection,
            motion,
        })
    }

    /// Checks the options against the default theme.
    pub fn validate(&self) -> FieldResult<()> {
        self.resolve(&crate::theme::Theme::default(), None)
            .map(|_| ())
    }

    pub fn props(&self, font_size: f32) -> FieldProps {
        FieldProps {
            value: self.value.clone(),
            default_value: self.default_value.clone(),
            error: self.error.clone(),
            character_restriction: self.character_restriction,
            disabled: self.disabled,
            editable: self.editable,
            secure_text_entry: self.secure_text_entry,
            clear_text_on_focus: self.clear_text_on_focus,
            font_size,
        }
    }
}

#[derive(Clone, Default)]
pub struct FieldHandlers {
    pub on_focus: Option<FieldHandler>,
    pub on_blur: Option<FieldHandler>,
    pub on_change_text: Option<TextHandler>,
    pub on_change: Option<TextHandler>,
    pub on_content_size_change: Option<HeightHandler>,
    pub on_submit: Option<TextHandler>,
}

impl FieldHandlers {
    pub fn dispatch(&self, events: Vec<FieldEvent>, window: &mut Window, cx: &mut gpui::App) {
        for event in events {
            match event {
                FieldEvent::Focus => {
                    if let Some(handler) = self.on_focus.as_ref() {
                        (handler)(window, cx);
                    }
                }
                FieldEvent::Blur => {
                    if let Some(handler) = self.on_blur.as_ref() {
                        (handler)(window, cx);
                    }
                }
                FieldEvent::ChangeText(text) => {
                    if let Some(handler) = self.on_change_text.as_ref() {
                        (handler)(&text, window, cx);
                    }
                }
                FieldEvent::Change(text) => {
                    if let Some(handler) = self.on_change.as_ref() {
                        (handler)(&text, window, cx);
                    }
                }
                FieldEvent::ContentSizeChange(height) => {
                    if let Some(handler) = self.on_content_size_change.as_ref() {
                        (handler)(height, window, cx);
                    }
                }
                FieldEvent::Submit(text) => {
                    if let Some(handler) = self.on_submit.as_ref() {
                        (handler)(&text, window, cx);
                    }
                }
            }
        }
    }
}

/// Imperative access to a rendered field, addressed by its id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextFieldHandle {
    id: ComponentId,
}

impl TextFieldHandle {
    pub fn new(id: impl Into<ComponentId>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    fn entry_id(&self) -> ComponentId {
        self.id.child("entry")
    }

    /// Focuses the entry unless the field is disabled or not editable.
    pub fn focus(&self, window: &mut Window, cx: &mut gpui::App) -> bool {
        let entry_id = self.entry_id();
        let mut entry = EntryControl::new(&entry_id, window, cx);
        FIELD_STATE
            .with_existing(&self.id, |state| state.focus(&mut entry))
            .unwrap_or(false)
    }

    pub fn blur(&self, window: &mut Window, cx: &mut gpui::App) {
        let entry_id = self.entry_id();
        let mut entry = EntryControl::new(&entry_id, window, cx);
        if FIELD_STATE
            .with_existing(&self.id, |state| state.blur(&mut entry))
            .is_none()
        {
            EntryPrimitive::blur(&mut entry);
        }
    }

    /// Empties the field. The resulting `ChangeText("")` is delivered to the
    /// field's handler on its next render and also returned here.
    pub fn clear(&self, window: &mut Window, cx: &mut gpui::App) -> Option<FieldEvent> {
        let entry_id = self.entry_id();
        let mut entry = EntryControl::new(&entry_id, window, cx);
        let event = self.clear_entry(&mut entry)?;
        window.refresh();
        Some(event)
    }

    pub(super) fn clear_entry(&self, entry: &mut impl EntryPrimitive) -> Option<FieldEvent> {
        let event = FIELD_STATE.with_existing(&self.id, |state| state.clear(entry))?;
        PENDING_EVENTS.with(&self.id, Vec::new, |pending| pending.push(event.clone()));
        Some(event)
    }

    pub fn value(&self) -> Option<String> {
        FIELD_STATE.with_existing(&self.id, |state| state.value().to_string())
    }

    pub fn is_focused(&self, window: &mut Window, cx: &mut gpui::App) -> bool {
        let entry_id = self.entry_id();
        let entry = EntryControl::new(&entry_id, window, cx);
        FIELD_STATE
            .with_existing(&self.id, |state| state.is_focused(&entry))
            .unwrap_or(false)
    }

    pub fn is_restricted(&self) -> bool {
        FIELD_STATE
            .with_existing(&self.id, |state| state.is_restricted())
            .unwrap_or(false)
    }

    /// Flips between masked and plain display. Returns the new masked flag.
    pub fn toggle_secure_entry(&self, window: &mut Window) -> Option<bool> {
        let secure = FIELD_STATE.with_existing(&self.id, FieldState::toggle_secure_entry)?;
        window.refresh();
        Some(secure)
    }

    /// Tears the field down. Pending settles become no-ops and every stored
    /// slot of the field and its parts is dropped.
    pub fn release(&self) {
        FIELD_STATE.with_existing(&self.id, FieldState::release);
        control::release_tree(&self.id);
        log::debug!("released text field {}", self.id);
    }
}

#[derive(IntoElement)]
pub struct TextField {
    id: ComponentId,
    config: FieldConfig,
    handlers: FieldHandlers,
    accessory: Option<AccessoryRenderer>,
    motion: Option<MotionConfig>,
    theme: LocalTheme,
}

impl TextField {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::auto("text-field"),
            config: FieldConfig::default(),
            handlers: FieldHandlers::default(),
            accessory: None,
            motion: None,
            theme: LocalTheme::default(),
        }
    }

    #[track_caller]
    pub fn try_from_config(config: FieldConfig) -> FieldResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Validates the options collected so far.
    pub fn validated(self) -> FieldResult<Self> {
        self.config.validate()?;
        Ok(self)
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn handle(&self) -> TextFieldHandle {
        TextFieldHandle::new(self.id.clone())
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.config.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.config.default_value = Some(value.into());
        self
    }

    pub fn placeholder(mut self, value: impl Into<SharedString>) -> Self {
        self.config.placeholder = Some(value.into());
        self
    }

    pub fn character_restriction(mut self, value: usize) -> Self {
        self.config.character_restriction = Some(value);
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.config.disabled = value;
        self
    }

    pub fn editable(mut self, value: bool) -> Self {
        self.config.editable = value;
        self
    }

    pub fn secure_text_entry(mut self, value: bool) -> Self {
        self.config.secure_text_entry = value;
        self
    }

    pub fn clear_text_on_focus(mut self, value: bool) -> Self {
        self.config.clear_text_on_focus = value;
        self
    }

    pub fn multiline(mut self, value: bool) -> Self {
        self.config.multiline = value;
        self
    }

    pub fn height(mut self, value: f32) -> Self {
        self.config.height = Some(value);
        self
    }

    pub fn prefix(mut self, value: impl Into<SharedString>) -> Self {
        self.config.prefix = Some(value.into());
        self
    }

    pub fn suffix(mut self, value: impl Into<SharedString>) -> Self {
        self.config.suffix = Some(value.into());
        self
    }

    pub fn suffix_icon(mut self, name: impl Into<String>) -> Self {
        self.config.suffix_icon = Some(name.into());
        self
    }

    pub fn animation_duration_ms(mut self, value: u64) -> Self {
        self.config.animation_duration_ms = Some(value);
        self
    }

    pub fn font_size(mut self, value: f32) -> Self {
        self.config.font_size = Some(value);
        self
    }

    pub fn title_font_size(mut self, value: f32) -> Self {
        self.config.title_font_size = Some(value);
        self
    }

    pub fn label_font_size(mut self, value: f32) -> Self {
        self.config.label_font_size = Some(value);
        self
    }

    pub fn label_height(mut self, value: f32) -> Self {
        self.config.label_height = Some(value);
        self
    }

    pub fn label_padding(mut self, value: f32) -> Self {
        self.config.label_padding = Some(value);
        self
    }

    pub fn input_container_padding(mut self, value: f32) -> Self {
        self.config.input_container_padding = Some(value);
        self
    }

    pub fn line_width(mut self, value: impl Into<StrokeWidth>) -> Self {
        self.config.line_width = Some(value.into());
        self
    }

    pub fn active_line_width(mut self, value: impl Into<StrokeWidth>) -> Self {
        self.config.active_line_width = Some(value.into());
        self
    }

    pub fn disabled_line_type(mut self, value: LineType) -> Self {
        self.config.disabled_line_type = Some(value);
        self
    }

    pub fn disabled_line_width(mut self, value: f32) -> Self {
        self.config.disabled_line_width = Some(value);
        self
    }

    pub fn icon_size_proportion(mut self, value: f32) -> Self {
        self.config.icon_size_proportion = Some(value);
        self
    }

    pub fn tint_color(mut self, value: impl Into<ColorValue>) -> Self {
        self.config.colors.tint = Some(value.into());
        self
    }

    pub fn text_color(mut self, value: impl Into<ColorValue>) -> Self {
        self.config.colors.text = Some(value.into());
        self
    }

    pub fn base_color(mut self, value: impl Into<ColorValue>) -> Self {
        self.config.colors.base = Some(value.into());
        self
    }

    pub fn error_color(mut self, value: impl Into<ColorValue>) -> Self {
        self.config.colors.error = Some(value.into());
        self
    }

    pub fn entry_attributes(mut self, value: EntryAttributes) -> Self {
        self.config.entry = value;
        self
    }

    pub fn render_accessory(mut self, render: impl FnOnce() -> AnyElement + 'static) -> Self {
        self.accessory = Some(Box::new(render));
        self
    }

    pub fn on_focus(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.handlers.on_focus = Some(Rc::new(handler));
        self
    }

    pub fn on_blur(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.handlers.on_blur = Some(Rc::new(handler));
        self
    }

    pub fn on_change_text(
        mut self,
        handler: impl Fn(&str, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.handlers.on_change_text = Some(Rc::new(handler));
        self
    }

    pub fn on_change(mut self, handler: impl Fn(&str, &mut Window, &mut gpui::App) + 'static) -> Self {
        self.handlers.on_change = Some(Rc::new(handler));
        self
    }

    pub fn on_content_size_change(
        mut self,
        handler: impl Fn(f32, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.handlers.on_content_size_change = Some(Rc::new(handler));
        self
    }

    pub fn on_submit(mut self, handler: impl Fn(&str, &mut Window, &mut gpui::App) + 'static) -> Self {
        self.handlers.on_submit = Some(Rc::new(handler));
        self
    }

    /// Handlers the entry calls; each routes through the field state first.
    fn entry_handlers(&self) -> EntryHandlers {
        let id = self.id.clone();
        let handlers = self.handlers.clone();
        let submit_behavior = self.config.entry.submit_behavior;

        let route = move |update: Box<dyn FnOnce(&mut FieldState) -> FieldEvent>,
                          window: &mut Window,
                          cx: &mut gpui::App| {
            if let Some(event) = FIELD_STATE.with_existing(&id, update) {
                handlers.dispatch(vec![event], window, cx);
            }
        };
        let route = Rc::new(route);

        EntryHandlers {
            on_change_text: Some(Rc::new({
                let route = route.clone();
                move |text: &str, window: &mut Window, cx: &mut gpui::App| {
                    let text = text.to_string();
                    route(
                        Box::new(move |state| state.on_change_text(text)),
                        window,
                        cx,
                    );
                }
            })),
            on_change: Some(Rc::new({
                let route = route.clone();
                move |text: &str, window: &mut Window, cx: &mut gpui::App| {
                    let text = text.to_string();
                    route(Box::new(move |state| state.on_change(text)), window, cx);
                }
            })),
            on_content_size_change: Some(Rc::new({
                let route = route.clone();
                move |height: f32, window: &mut Window, cx: &mut gpui::App| {
                    route(
                        Box::new(move |state| state.on_content_size_change(height)),
                        window,
                        cx,
                    );
                }
            })),
            on_submit: Some(Rc::new({
                let route = route.clone();
                move |text: &str, window: &mut Window, cx: &mut gpui::App| {
                    let text = text.to_string();
                    route(Box::new(move |state| state.on_submit(text)), window, cx);
                    if submit_behavior == SubmitBehavior::BlurAndSubmit {
                        window.blur();
                    }
                }
            })),
        }
    }

    /// Applies focus changes observed on the entry's focus handle.
    fn sync_focus(
        &self,
        focused_now: bool,
        duration: Duration,
        now: Instant,
        window: &mut Window,
        cx: &mut gpui::App,
    ) {
        let was_focused = FIELD_STATE
            .with_existing(&self.id, |state| state.focused())
            .unwrap_or(false);
        if focused_now == was_focused {
            return;
        }
        let events = if focused_now {
            let entry_id = self.id.child("entry");
            let mut entry = EntryControl::new(&entry_id, window, cx);
            FIELD_STATE.with_existing(&self.id, |state| state.on_focus(&mut entry, duration, now))
        } else {
            FIELD_STATE.with_existing(&self.id, |state| state.on_blur(duration, now))
        };
        self.handlers
            .dispatch(events.unwrap_or_default(), window, cx);
    }

    fn schedule_settle(&self, ticket: SettleTicket, window: &mut Window, cx: &mut gpui::App) {
        let generation = ticket.generation();
        let scheduled = SETTLE_TIMERS.with(
            &self.id,
            || None,
            |scheduled| scheduled.replace(generation) == Some(generation),
        );
        if scheduled {
            return;
        }
        let id = self.id.to_string();
        let window_handle = window.window_handle();
        cx.spawn(async move |cx| {
            if settle_after(id, ticket).await {
                let _ = window_handle.update(cx, |_, window, _| {
                    window.refresh();
                });
            }
        })
        .detach();
    }

    fn render_diagnostic(id: ComponentId, error: &FieldError) -> AnyElement {
        div()
            .id(id)
            .p(px(8.0))
            .border_1()
            .border_color(gpui::red())
            .text_size(px(12.0))
            .text_color(gpui::red())
            .child(format!("invalid text field: {error}"))
            .into_any_element()
    }
}

impl FieldLike for TextField {
    fn label(mut self, value: impl Into<SharedString>) -> Self {
        self.config.label = Some(value.into());
        self
    }

    fn title(mut self, value: impl Into<SharedString>) -> Self {
        self.config.title = Some(value.into());
        self
    }

    fn error(mut self, value: impl Into<SharedString>) -> Self {
        self.config.error = Some(value.into().to_string());
        self
    }
}

crate::impl_disableable!(TextField);

impl MotionAware for TextField {
    fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = Some(value);
        self
    }
}

impl ComponentThemeOverridable for TextField {
    fn local_theme_mut(&mut self) -> &mut LocalTheme {
        &mut self.theme
    }
}

impl RenderOnce for TextField {
    fn render(mut self, window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        let resolved = match self.config.resolve(&self.theme, self.motion) {
            Ok(resolved) => resolved,
            Err(error) => {
                log::error!("text field {} rejected: {error}", self.id);
                return Self::render_diagnostic(self.id, &error);
            }
        };
        let metrics = resolved.metrics;
        let palette = resolved.palette;
        let duration = resolved.duration();
        let now = Instant::now();
        let entry_id = self.id.child("entry");
        let entry_handle = focus_handle_for(&entry_id, cx);
        let props = self.config.props(metrics.font_size);
        let accepts_focus = props.accepts_focus();

        let fresh = !FIELD_STATE.contains(&self.id);
        FIELD_STATE.with(
            &self.id,
            || FieldState::new_at(props.clone(), now),
            |state| {
                state.sync_props(props, duration, now);
            },
        );
        if fresh && self.config.entry.auto_focus && accepts_focus {
            window.focus(&entry_handle, cx);
        }

        let pending = take_pending_events(&self.id);
        if !pending.is_empty() {
            self.handlers.dispatch(pending, window, cx);
        }
        self.sync_focus(entry_handle.is_focused(window), duration, now, window, cx);

        if let Some(ticket) = FIELD_STATE
            .with_existing(&self.id, |state| state.due_settle(now))
            .flatten()
        {
            settle_field(&self.id, ticket);
        }
        let Some(state) = FIELD_STATE.get(&self.id) else {
            return div().into_any_element();
        };
        if let Some(ticket) = state.pending_settle() {
            self.schedule_settle(ticket, window, cx);
        }
        if state.is_animating_at(now) {
            window.request_animation_frame();
        }

        let look = FieldLook {
            palette,
            metrics,
            scale_factor: window.scale_factor(),
            has_placeholder: self.config.placeholder.is_some(),
            has_title: self.config.title.is_some(),
            multiline: self.config.multiline,
            fixed_height: self.config.height,
        };
        let visuals = FieldVisuals::derive(&state, &look, now);
        let align = FieldProvider::layout_direction(cx).text_align();
        let focused = state.focused();
        let motion = resolved.motion;

        let mut entry = TextEntry::new()
            .with_id(entry_id.clone())
            .value(state.value().to_string())
            .multiline(self.config.multiline)
            .masked(state.secure_text_entry())
            .disabled(!accepts_focus)
            .read_only(self.config.entry.read_only)
            .max_length(self.config.entry.max_length)
            .font_size(metrics.font_size)
            .text_color(to_hsla(visuals.input_color))
            .placeholder_color(to_hsla(palette.base))
            .caret_color(to_hsla(palette.tint))
            .align(align)
            .focus_handle(entry_handle.clone())
            .handlers(self.entry_handlers());
        entry = entry.selection_color(match resolved.selection {
            Some(color) => to_hsla(color),
            None => to_hsla(palette.tint).opacity(0.3),
        });
        if let Some(placeholder) = self.config.placeholder.clone() {
            entry = entry.placeholder(placeholder);
        }

        let mut row = div()
            .flex()
            .flex_row()
            .items_start()
            .w_full()
            .h(px(visuals.input_height));
        if let Some(prefix) = self.config.prefix.clone() {
            row = row.child(
                Affix::prefix(prefix)
                    .with_id(self.id.child("prefix"))
                    .active(visuals.active)
                    .focused(focused)
                    .font_size(metrics.font_size)
                    .color(palette.base)
                    .motion(motion),
            );
        }
        row = row.child(div().flex_1().min_w_0().h_full().child(entry));
        if let Some(suffix) = self.config.suffix.clone() {
            row = row.child(
                Affix::suffix(suffix)
                    .with_id(self.id.child("suffix"))
                    .active(visuals.active)
                    .focused(focused)
                    .font_size(metrics.font_size)
                    .color(palette.base)
                    .motion(motion),
            );
        }
        if let Some(accessory) = self.accessory.take() {
            row = row.child(div().flex_none().child(accessory()));
        }

        let icon_size = metrics.font_size * metrics.icon_size_proportion;
        if let Some(name) = self.config.suffix_icon.clone() {
            row = row.child(
                Icon::named(name)
                    .with_id(self.id.child("suffix-icon"))
                    .size(icon_size)
                    .color(to_hsla(visuals.input_color)),
            );
        } else if self.config.secure_text_entry {
            let name = if state.secure_text_entry() { "eye" } else { "eye-off" };
            let handle = TextFieldHandle::new(self.id.clone());
            row = row.child(
                div()
                    .id(self.id.slot("secure-toggle"))
                    .flex_none()
                    .pl(px(metrics.affix_padding))
                    .cursor_pointer()
                    .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                    .on_click(move |_, window, _| {
                        handle.toggle_secure_entry(window);
                    })
                    .child(
                        Icon::named(name)
                            .with_id(self.id.child("secure-icon"))
                            .size(icon_size)
                            .color(to_hsla(palette.base)),
                    ),
            );
        }

        let underline = if self.config.disabled {
            Line::new(
                metrics.disabled_line_type,
                metrics.disabled_line_width,
                palette.base,
            )
            .into_any_element()
        } else {
            div()
                .absolute()
                .left_0()
                .right_0()
                .bottom_0()
                .h(quantized_stroke_px(window, visuals.border_width))
                .bg(to_hsla(visuals.border_color))
                .into_any_element()
        };

        let mut container = div()
            .id(self.id.slot("input-container"))
            .relative()
            .w_full()
            .h(px(visuals.input_container_height))
            .pt(px(metrics.label_height))
            .pb(px(metrics.input_container_padding))
            .overflow_hidden()
            .child(underline);
        if let Some(label) = self.config.label.clone() {
            container = container.child(
                Label::new(label)
                    .with_id(self.id.child("label"))
                    .active(visuals.active)
                    .focused(focused)
                    .errored(state.errored())
                    .restricted(visuals.restricted)
                    .label_style(LabelStyle {
                        base_size: metrics.label_height,
                        base_padding: metrics.label_padding,
                        font_size: metrics.font_size,
                        active_font_size: metrics.label_font_size,
                        tint_color: palette.tint,
                        base_color: visuals.label_base_color,
                        error_color: palette.error,
                    })
                    .align(align)
                    .motion(motion),
            );
        }
        container = container.child(row);

        if accepts_focus {
            let handle = TextFieldHandle::new(self.id.clone());
            container = container.on_mouse_down(MouseButton::Left, move |_, window, cx| {
                handle.focus(window, cx);
            });
            let entry_handle = entry_handle.clone();
            container = container.on_mouse_down_out(move |_, window, _cx| {
                if entry_handle.is_focused(window) {
                    window.blur();
                }
            });
        }

        let displayed_error = state.displayed_error().map(|error| SharedString::from(error.to_string()));
        let helpers = div()
            .relative()
            .flex_1()
            .min_w_0()
            .h_full()
            .child(
                div().absolute().top_0().left_0().right_0().child(
                    Helper::new(displayed_error)
                        .color(visuals.error_color)
                        .opacity(visuals.error_opacity)
                        .font_size(visuals.error_font_size)
                        .align(align),
                ),
            )
            .child(
                div().absolute().top_0().left_0().right_0().child(
                    Helper::new(self.config.title.clone())
                        .color(visuals.title_color)
                        .opacity(visuals.title_opacity)
                        .font_size(visuals.title_font_size)
                        .align(align),
                ),
            );
        let helper_row = div()
            .flex()
            .flex_row()
            .w_full()
            .h(px(visuals.helper_height))
            .pt(px(4.0))
            .child(helpers)
            .child(
                Counter::from_visuals(visuals.counter).font_size(metrics.title_font_size),
            );

        let mut root = div()
            .id(self.id.clone())
            .flex()
            .flex_col()
            .w_full()
            .child(container)
            .child(helper_row);
        if self.config.disabled {
            root = root.cursor_default();
        } else if accepts_focus {
            root = root.cursor_text();
        }
        root.into_any_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(FieldConfig::default().validate().is_ok());
        assert!(FieldConfig::default().props(16.0).accepts_focus());
    }

    #[test]
    fn rejects_negative_sizes_and_bad_colors() {
        let config = FieldConfig {
            font_size: Some(-1.0),
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FieldError::InvalidMetric {
                name: "font_size",
                ..
            })
        ));

        let mut config = FieldConfig::default();
        config.colors.tint = Some(ColorValue::custom("blurple"));
        assert!(matches!(
            config.validate(),
            Err(FieldError::InvalidColor {
                name: "tint_color",
                ..
            })
        ));

        let config = FieldConfig {
            height: Some(f32::NAN),
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_runaway_durations() {
        let config = FieldConfig {
            animation_duration_ms: Some(MAX_ANIMATION_DURATION_MS + 1),
            ..FieldConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(FieldError::InvalidDuration {
                value_ms: MAX_ANIMATION_DURATION_MS + 1
            })
        );
    }

    #[test]
    fn overrides_win_over_theme_metrics() {
        let config = FieldConfig {
            font_size: Some(20.0),
            disabled_line_type: Some(LineType::Dashed),
            ..FieldConfig::default()
        };
        let metrics = config.metrics(FieldMetrics::default());
        assert_eq!(metrics.font_size, 20.0);
        assert_eq!(metrics.disabled_line_type, LineType::Dashed);
        assert_eq!(metrics.label_height, FieldMetrics::default().label_height);
    }

    #[test]
    fn resolved_duration_follows_the_option() {
        let config = FieldConfig {
            animation_duration_ms: Some(400),
            ..FieldConfig::default()
        };
        let resolved = config
            .resolve(&crate::theme::Theme::default(), None)
            .expect("valid config");
        assert_eq!(resolved.duration(), Duration::from_millis(400));
    }

    #[test]
    fn builder_collects_options() {
        let field = TextField::new()
            .with_id("email")
            .value("a@b.c")
            .character_restriction(10)
            .label("Email")
            .title("Work address")
            .error("Required")
            .secure_text_entry(true);
        let config = field.config();
        assert_eq!(config.value.as_deref(), Some("a@b.c"));
        assert_eq!(config.character_restriction, Some(10));
        assert_eq!(config.label.as_ref().map(|label| label.as_ref()), Some("Email"));
        assert_eq!(config.error.as_deref(), Some("Required"));
        assert!(config.secure_text_entry);
        assert_eq!(field.handle().id().as_str(), "email");
    }

    #[test]
    fn invalid_builder_is_rejected_up_front() {
        assert!(TextField::new().font_size(f32::INFINITY).validated().is_err());
        assert!(
            TextField::try_from_config(FieldConfig {
                icon_size_proportion: Some(0.0),
                ..FieldConfig::default()
            })
            .is_err()
        );
    }
}
