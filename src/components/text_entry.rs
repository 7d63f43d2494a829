//! Editable text element used inside [`super::TextField`].
//!
//! Editing state (value, caret, selection, IME marked range, geometry) lives
//! in a per-id store so it survives across frames. The entry is controlled:
//! whenever the owner renders a value different from the last one it saw or
//! emitted, the editor adopts it.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use gpui::{
    Animation, AnimationExt, Bounds, ClipboardItem, Div, FocusHandle, Global, Hsla, InputHandler,
    InteractiveElement, IntoElement, KeyBinding, MouseButton, ParentElement, RenderOnce,
    SharedString, Styled, UTF16Selection, Window, actions, canvas, div, point, px,
};

use crate::id::ComponentId;
use crate::style::TextAlign;

use super::control::StateStore;
use super::field_state::EntryPrimitive;
use super::text_entry_state::{
    EditorState, byte_index_at_char, char_index_at_byte, char_range_from_utf16, utf16_from_char,
    utf16_range_from_char,
};
use super::utils::{HeightHandler, TextHandler, quantized_stroke_px};

const CARET_BLINK_CYCLE_MS: u64 = 1360;
const MASK_CHAR: char = '\u{2022}';

const ENTRY_CONTEXT: &str = "TextEntry";
const SINGLE_LINE_PREDICATE: &str = "TextEntry && !multiline";
const MULTILINE_PREDICATE: &str = "TextEntry && multiline";
const PRIMARY_MODIFIER: &str = if cfg!(target_os = "macos") { "cmd" } else { "ctrl" };

actions!(
    text_entry,
    [
        CaretLeft,
        CaretRight,
        CaretUp,
        CaretDown,
        LineStart,
        LineEnd,
        ExtendLeft,
        ExtendRight,
        ExtendUp,
        ExtendDown,
        ExtendToLineStart,
        ExtendToLineEnd,
        Backspace,
        Delete,
        SelectAll,
        CopyText,
        CutText,
        PasteText,
        Submit,
        Newline,
    ]
);

static ENTRY_STATE: StateStore<EntryState> = StateStore::new("text entry");
static FOCUS_HANDLES: StateStore<FocusHandle> = StateStore::new("entry focus handles");

struct EntryKeysBound;

impl Global for EntryKeysBound {}

/// Registers the entry key map once per app. Up/down and enter differ
/// between single-line and multiline entries.
pub fn bind_entry_keys(cx: &mut gpui::App) {
    if cx.has_global::<EntryKeysBound>() {
        return;
    }
    cx.bind_keys(entry_key_map());
    cx.set_global(EntryKeysBound);
}

fn primary_chord(key: &str) -> String {
    format!("{PRIMARY_MODIFIER}-{key}")
}

fn entry_key_context(multiline: bool) -> &'static str {
    if multiline {
        "TextEntry multiline"
    } else {
        ENTRY_CONTEXT
    }
}

fn entry_key_map() -> Vec<KeyBinding> {
    let any = Some(ENTRY_CONTEXT);
    let single = Some(SINGLE_LINE_PREDICATE);
    let multi = Some(MULTILINE_PREDICATE);
    vec![
        KeyBinding::new("left", CaretLeft, any),
        KeyBinding::new("right", CaretRight, any),
        KeyBinding::new("home", LineStart, any),
        KeyBinding::new("end", LineEnd, any),
        KeyBinding::new("shift-left", ExtendLeft, any),
        KeyBinding::new("shift-right", ExtendRight, any),
        KeyBinding::new("shift-home", ExtendToLineStart, any),
        KeyBinding::new("shift-end", ExtendToLineEnd, any),
        KeyBinding::new("backspace", Backspace, any),
        KeyBinding::new("delete", Delete, any),
        KeyBinding::new(&primary_chord("a"), SelectAll, any),
        KeyBinding::new(&primary_chord("c"), CopyText, any),
        KeyBinding::new(&primary_chord("x"), CutText, any),
        KeyBinding::new(&primary_chord("v"), PasteText, any),
        KeyBinding::new("enter", Submit, single),
        KeyBinding::new("enter", Newline, multi),
        KeyBinding::new("up", CaretUp, multi),
        KeyBinding::new("down", CaretDown, multi),
        KeyBinding::new("shift-up", ExtendUp, multi),
        KeyBinding::new("shift-down", ExtendDown, multi),
    ]
}

pub(super) fn clear_state() {
    ENTRY_STATE.clear();
    FOCUS_HANDLES.clear();
}

#[derive(Clone, Debug, Default)]
struct EntryState {
    editor: EditorState,
    synced: Option<String>,
    origin: (f32, f32),
    content_width: f32,
    scroll_x: f32,
    reported_height: Option<f32>,
    selecting: bool,
}

impl EntryState {
    fn new(value: &str) -> Self {
        Self {
            editor: EditorState::new(value),
            synced: Some(value.to_string()),
            ..Self::default()
        }
    }
}

pub fn focus_handle_for(id: &str, cx: &gpui::App) -> FocusHandle {
    FOCUS_HANDLES.with(id, || cx.focus_handle(), |handle| handle.clone())
}

/// Empties the entry without notifying change handlers.
pub fn clear_entry(id: &str) {
    ENTRY_STATE.with(id, EntryState::default, |state| {
        state.editor.set_value("");
        state.synced = Some(String::new());
    });
}

pub(super) fn release_tree(id: &str) {
    ENTRY_STATE.remove_tree(id);
    FOCUS_HANDLES.remove_tree(id);
}

/// Current editor value, which may be ahead of the owner's last render.
pub fn entry_value(id: &str) -> Option<String> {
    ENTRY_STATE.with_existing(id, |state| state.editor.value.clone())
}

fn editor_for(id: &str) -> EditorState {
    ENTRY_STATE.with(id, EntryState::default, |state| state.editor.clone())
}

fn sync_value(id: &str, value: &str) -> EntryState {
    ENTRY_STATE.with(
        id,
        || EntryState::new(value),
        |state| {
            if state.synced.as_deref() != Some(value) {
                state.editor.set_value(value);
                state.synced = Some(value.to_string());
            }
            state.clone()
        },
    )
}

/// Hands the owner's `value` to the entry and returns what the editor holds.
#[cfg(test)]
pub(super) fn adopt_value(id: &str, value: &str) -> String {
    sync_value(id, value).editor.value
}

/// Types `text` at the caret the way a key press would, without handlers.
#[cfg(test)]
pub(super) fn type_text(id: &str, text: &str) {
    ENTRY_STATE.with_existing(id, |state| {
        state.editor.insert_text(text);
        state.synced = Some(state.editor.value.clone());
    });
}

/// gpui-backed [`EntryPrimitive`] for one entry id.
pub struct EntryControl<'a> {
    id: &'a str,
    handle: FocusHandle,
    window: &'a mut Window,
    cx: &'a mut gpui::App,
}

impl<'a> EntryControl<'a> {
    pub fn new(id: &'a str, window: &'a mut Window, cx: &'a mut gpui::App) -> Self {
        let handle = focus_handle_for(id, cx);
        Self {
            id,
            handle,
            window,
            cx,
        }
    }
}

impl EntryPrimitive for EntryControl<'_> {
    fn focus(&mut self) {
        self.window.focus(&self.handle, self.cx);
        self.window.refresh();
    }

    fn blur(&mut self) {
        self.window.blur();
        self.window.refresh();
    }

    fn clear(&mut self) {
        clear_entry(self.id);
        self.window.refresh();
    }

    fn is_focused(&self) -> bool {
        self.handle.is_focused(self.window)
    }
}

#[derive(Clone, Default)]
pub struct EntryHandlers {
    pub on_change: Option<TextHandler>,
    pub on_change_text: Option<TextHandler>,
    pub on_submit: Option<TextHandler>,
    pub on_content_size_change: Option<HeightHandler>,
}

#[derive(Clone)]
struct EditContext {
    id: SharedString,
    max_length: Option<usize>,
    multiline: bool,
    handlers: EntryHandlers,
}

impl EditContext {
    fn sanitize(&self, text: &str) -> String {
        if self.multiline {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.replace(['\r', '\n'], "")
        }
    }

    fn commit(&self, before: &str, editor: EditorState, window: &mut Window, cx: &mut gpui::App) {
        let changed = editor.value != before;
        let value = editor.value.clone();
        ENTRY_STATE.with(&self.id, EntryState::default, |state| {
            if changed {
                state.synced = Some(value.clone());
            }
            state.editor = editor;
        });
        window.refresh();
        if !changed {
            return;
        }
        if let Some(handler) = self.handlers.on_change.as_ref() {
            (handler)(&value, window, cx);
        }
        if let Some(handler) = self.handlers.on_change_text.as_ref() {
            (handler)(&value, window, cx);
        }
    }
}

fn edit_action<A: gpui::Action>(
    ctx: &EditContext,
    apply: impl Fn(&mut EditorState) + 'static,
) -> impl Fn(&A, &mut Window, &mut gpui::App) + 'static {
    let ctx = ctx.clone();
    move |_, window, cx| {
        let before = editor_for(&ctx.id);
        let mut editor = before.clone();
        apply(&mut editor);
        editor.clamp_to_max_length(ctx.max_length);
        ctx.commit(&before.value, editor, window, cx);
    }
}

fn display_text(value: &str, masked: bool) -> String {
    if masked {
        value
            .chars()
            .map(|ch| if ch == '\n' { ch } else { MASK_CHAR })
            .collect()
    } else {
        value.to_string()
    }
}

fn line_layout(window: &Window, font_size: f32, text: &str) -> Arc<gpui::LineLayout> {
    let font_size = px(font_size);
    let mut text_style = window.text_style();
    text_style.font_size = font_size.into();
    let run = text_style.to_run(text.len());
    window
        .text_system()
        .layout_line(text, font_size, &[run], None)
}

fn x_for_char(window: &Window, font_size: f32, text: &str, char_index: usize) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let byte_index = byte_index_at_char(text, char_index.min(text.chars().count()));
    f32::from(line_layout(window, font_size, text).x_for_index(byte_index))
}

fn char_from_x(window: &Window, font_size: f32, text: &str, x: f32) -> usize {
    if text.is_empty() {
        return 0;
    }
    let layout = line_layout(window, font_size, text);
    let byte_index = layout.closest_index_for_x(px(x.max(0.0))).min(text.len());
    char_index_at_byte(text, byte_index)
}

fn align_offset(align: TextAlign, content_width: f32, text_width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => (content_width - text_width).max(0.0),
    }
}

/// Text metrics shared by hit testing, IME bounds and caret placement.
#[derive(Clone, Copy)]
struct Metrics {
    font_size: f32,
    masked: bool,
    multiline: bool,
    align: TextAlign,
}

impl Metrics {
    fn line_height(&self) -> f32 {
        self.font_size * 1.5
    }

    /// Position of a char index relative to the content origin.
    fn position_of(&self, window: &Window, state: &EntryState, index: usize) -> (f32, f32) {
        let display = display_text(&state.editor.value, self.masked);
        let editor = EditorState::new(display);
        let (line, column) = editor.line_col(index);
        let range = editor.line_range(line);
        let text: String = editor
            .value
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect();
        let width = x_for_char(window, self.font_size, &text, usize::MAX);
        let offset = align_offset(self.align, state.content_width, width);
        let x = offset + x_for_char(window, self.font_size, &text, column) - state.scroll_x;
        (x, line as f32 * self.line_height())
    }

    fn index_at(&self, window: &Window, state: &EntryState, position: gpui::Point<gpui::Pixels>) -> usize {
        let (origin_x, origin_y) = state.origin;
        let display = display_text(&state.editor.value, self.masked);
        let editor = EditorState::new(display);
        let line = if self.multiline {
            let local_y = (f32::from(position.y) - origin_y).max(0.0);
            ((local_y / self.line_height()) as usize).min(editor.line_count().saturating_sub(1))
        } else {
            0
        };
        let range = editor.line_range(line);
        let text: String = editor
            .value
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect();
        let width = x_for_char(window, self.font_size, &text, usize::MAX);
        let offset = align_offset(self.align, state.content_width, width);
        let local_x = f32::from(position.x) - origin_x + state.scroll_x - offset;
        range.start + char_from_x(window, self.font_size, &text, local_x)
    }
}

struct EntryImeHandler {
    ctx: EditContext,
    editable: bool,
    metrics: Metrics,
}

impl EntryImeHandler {
    fn state(&self) -> EntryState {
        ENTRY_STATE.with(&self.ctx.id, EntryState::default, |state| state.clone())
    }

    fn replacement_range(editor: &EditorState, range_utf16: Option<Range<usize>>) -> (usize, usize) {
        let len = editor.len();
        if let Some(range_utf16) = range_utf16 {
            let range = char_range_from_utf16(&editor.value, range_utf16);
            return (range.start.min(len), range.end.min(len));
        }
        editor
            .marked
            .or(editor.selection)
            .unwrap_or((editor.caret, editor.caret))
    }
}

impl InputHandler for EntryImeHandler {
    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Option<UTF16Selection> {
        let editor = self.state().editor;
        let range = match editor.selection {
            Some((start, end)) => start..end,
            None => editor.caret..editor.caret,
        };
        let reversed = !range.is_empty() && editor.caret == range.start;
        Some(UTF16Selection {
            range: utf16_range_from_char(&editor.value, range),
            reversed,
        })
    }

    fn marked_text_range(
        &mut self,
        _window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Option<Range<usize>> {
        let editor = self.state().editor;
        let (start, end) = editor.marked?;
        Some(utf16_range_from_char(&editor.value, start..end))
    }

    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        adjusted_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Option<String> {
        let editor = self.state().editor;
        let len = editor.len();
        let range = char_range_from_utf16(&editor.value, range_utf16);
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        adjusted_range.replace(utf16_range_from_char(&editor.value, start..end));
        Some(editor.value.chars().skip(start).take(end - start).collect())
    }

    fn replace_text_in_range(
        &mut self,
        replacement_range: Option<Range<usize>>,
        text: &str,
        window: &mut Window,
        cx: &mut gpui::App,
    ) {
        if !self.editable {
            return;
        }
        let before = self.state().editor;
        let mut editor = before.clone();
        let (start, end) = Self::replacement_range(&editor, replacement_range);
        editor.replace_char_range(start, end, &self.ctx.sanitize(text));
        editor.clamp_to_max_length(self.ctx.max_length);
        self.ctx.commit(&before.value, editor, window, cx);
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        window: &mut Window,
        cx: &mut gpui::App,
    ) {
        if !self.editable {
            return;
        }
        let before = self.state().editor;
        let mut editor = before.clone();
        let (start, end) = Self::replacement_range(&editor, range_utf16);
        let sanitized = self.ctx.sanitize(new_text);
        let inserted = sanitized.chars().count();
        editor.replace_char_range(start, end, &sanitized);
        if inserted > 0 {
            editor.marked = Some((start, start + inserted));
        }
        if let Some(selected_utf16) = new_selected_range_utf16 {
            let relative = char_range_from_utf16(&sanitized, selected_utf16);
            editor.anchor = start + relative.start;
            editor.set_caret(start + relative.end, true);
        }
        editor.clamp_to_max_length(self.ctx.max_length);
        self.ctx.commit(&before.value, editor, window, cx);
    }

    fn unmark_text(&mut self, _window: &mut Window, _cx: &mut gpui::App) {
        ENTRY_STATE.with_existing(&self.ctx.id, |state| state.editor.marked = None);
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Option<Bounds<gpui::Pixels>> {
        let state = self.state();
        let range = char_range_from_utf16(&state.editor.value, range_utf16);
        let (origin_x, origin_y) = state.origin;
        let (start_x, top) = self.metrics.position_of(window, &state, range.start);
        let (end_x, _) = self.metrics.position_of(window, &state, range.end);
        let right = if end_x > start_x { end_x } else { start_x + 1.0 };
        Some(Bounds::from_corners(
            point(px(origin_x + start_x), px(origin_y + top)),
            point(
                px(origin_x + right),
                px(origin_y + top + self.metrics.line_height()),
            ),
        ))
    }

    fn character_index_for_point(
        &mut self,
        point: gpui::Point<gpui::Pixels>,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Option<usize> {
        let state = self.state();
        let index = self.metrics.index_at(window, &state, point);
        Some(utf16_from_char(&state.editor.value, index))
    }

    fn accepts_text_input(&mut self, _window: &mut Window, _cx: &mut gpui::App) -> bool {
        self.editable
    }
}

/// Builds one line of text with the selected part highlighted.
fn text_run(text: &str, selection: Option<(usize, usize)>, highlight: Hsla) -> Div {
    let row = div().flex().flex_row().flex_none().whitespace_nowrap();
    let Some((start, end)) = selection else {
        return row.child(text.to_string());
    };
    let left: String = text.chars().take(start).collect();
    let selected: String = text.chars().skip(start).take(end - start).collect();
    let right: String = text.chars().skip(end).collect();
    row.child(left)
        .child(div().bg(highlight).child(if selected.is_empty() {
            " ".to_string()
        } else {
            selected
        }))
        .child(right)
}

#[derive(IntoElement)]
pub struct TextEntry {
    id: ComponentId,
    value: SharedString,
    placeholder: Option<SharedString>,
    multiline: bool,
    masked: bool,
    disabled: bool,
    read_only: bool,
    max_length: Option<usize>,
    font_size: f32,
    text_color: Hsla,
    placeholder_color: Hsla,
    caret_color: Hsla,
    selection_color: Hsla,
    align: TextAlign,
    focus_handle: Option<FocusHandle>,
    handlers: EntryHandlers,
}

impl TextEntry {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::auto("entry"),
            value: SharedString::default(),
            placeholder: None,
            multiline: false,
            masked: false,
            disabled: false,
            read_only: false,
            max_length: None,
            font_size: 16.0,
            text_color: gpui::black(),
            placeholder_color: gpui::black().opacity(0.45),
            caret_color: gpui::black(),
            selection_color: gpui::blue().opacity(0.28),
            align: TextAlign::Left,
            focus_handle: None,
            handlers: EntryHandlers::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value = value.into();
        self
    }

    pub fn placeholder(mut self, value: impl Into<SharedString>) -> Self {
        self.placeholder = Some(value.into());
        self
    }

    pub fn multiline(mut self, value: bool) -> Self {
        self.multiline = value;
        self
    }

    pub fn masked(mut self, value: bool) -> Self {
        self.masked = value;
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.disabled = value;
        self
    }

    pub fn read_only(mut self, value: bool) -> Self {
        self.read_only = value;
        self
    }

    pub fn max_length(mut self, value: Option<usize>) -> Self {
        self.max_length = value;
        self
    }

    pub fn font_size(mut self, value: f32) -> Self {
        self.font_size = value;
        self
    }

    pub fn text_color(mut self, value: Hsla) -> Self {
        self.text_color = value;
        self
    }

    pub fn placeholder_color(mut self, value: Hsla) -> Self {
        self.placeholder_color = value;
        self
    }

    pub fn caret_color(mut self, value: Hsla) -> Self {
        self.caret_color = value;
        self
    }

    pub fn selection_color(mut self, value: Hsla) -> Self {
        self.selection_color = value;
        self
    }

    pub fn align(mut self, value: TextAlign) -> Self {
        self.align = value;
        self
    }

    pub fn focus_handle(mut self, value: FocusHandle) -> Self {
        self.focus_handle = Some(value);
        self
    }

    pub fn handlers(mut self, value: EntryHandlers) -> Self {
        self.handlers = value;
        self
    }

    pub fn on_change_text(
        mut self,
        handler: impl Fn(&str, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.handlers.on_change_text = Some(std::rc::Rc::new(handler));
        self
    }

    pub fn on_submit(mut self, handler: impl Fn(&str, &mut Window, &mut gpui::App) + 'static) -> Self {
        self.handlers.on_submit = Some(std::rc::Rc::new(handler));
        self
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            font_size: self.font_size,
            masked: self.masked,
            multiline: self.multiline,
            align: self.align,
        }
    }

    /// Reports the height of the laid-out lines whenever it changes.
    fn report_content_size(&self, state: &EntryState, window: &mut Window, cx: &mut gpui::App) {
        if !self.multiline {
            return;
        }
        let height = state.editor.line_count() as f32 * self.metrics().line_height();
        if state.reported_height == Some(height) {
            return;
        }
        ENTRY_STATE.with_existing(&self.id, |stored| stored.reported_height = Some(height));
        if let Some(handler) = self.handlers.on_content_size_change.as_ref() {
            (handler)(height, window, cx);
            window.refresh();
        }
    }

    /// Keeps the caret of a single-line entry inside the visible width.
    fn scroll_to_caret(&self, state: &mut EntryState, window: &Window, display: &str) {
        if self.multiline || state.content_width <= 0.0 {
            state.scroll_x = 0.0;
            return;
        }
        let text_width = x_for_char(window, self.font_size, display, usize::MAX);
        let max_scroll = (text_width - state.content_width).max(0.0);
        let caret_x = x_for_char(window, self.font_size, display, state.editor.caret);
        let mut scroll_x = state.scroll_x.clamp(0.0, max_scroll);
        if caret_x - scroll_x > state.content_width {
            scroll_x = caret_x - state.content_width;
        } else if caret_x < scroll_x {
            scroll_x = caret_x;
        }
        state.scroll_x = scroll_x.clamp(0.0, max_scroll);
        let stored = state.scroll_x;
        ENTRY_STATE.with_existing(&self.id, |entry| entry.scroll_x = stored);
    }

    fn render_caret(&self, window: &Window, state: &EntryState) -> impl IntoElement {
        let (x, y) = self.metrics().position_of(window, state, state.editor.caret);
        let line_height = self.metrics().line_height();
        div()
            .absolute()
            .left(px(x.clamp(0.0, state.content_width.max(0.0))))
            .top(px(y))
            .h(px(line_height))
            .flex()
            .items_center()
            .child(
                div()
                    .id(self.id.slot("caret"))
                    .flex_none()
                    .w(quantized_stroke_px(window, 1.5))
                    .h(px(self.font_size * 1.1))
                    .bg(self.caret_color)
                    .with_animation(
                        self.id.slot("caret-blink"),
                        Animation::new(Duration::from_millis(CARET_BLINK_CYCLE_MS))
                            .repeat()
                            .with_easing(gpui::linear),
                        |this, delta| {
                            let visible = ((delta * 2.0).fract()) < 0.5;
                            this.opacity(if visible { 1.0 } else { 0.0 })
                        },
                    ),
            )
    }

    fn render_lines(&self, state: &EntryState, display: &str) -> Div {
        let line_height = px(self.metrics().line_height());
        let editor = EditorState::new(display);
        let mut column = div().flex().flex_col().w_full();
        for (index, text) in editor.lines().enumerate() {
            let range = editor.line_range(index);
            let selection = state.editor.selection.and_then(|(start, end)| {
                let start = start.max(range.start);
                let end = end.min(range.end + 1);
                (start < end).then(|| {
                    (start - range.start, (end - range.start).min(range.len()))
                })
            });
            let mut line = div().h(line_height).w_full().flex();
            if self.align == TextAlign::Right {
                line = line.justify_end();
            }
            column = column.child(line.child(text_run(text, selection, self.selection_color)));
        }
        column
    }
}

impl RenderOnce for TextEntry {
    fn render(self, window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        bind_entry_keys(cx);
        let handle = self
            .focus_handle
            .clone()
            .unwrap_or_else(|| focus_handle_for(&self.id, cx));
        let focused = handle.is_focused(window);
        let editable = !self.disabled && !self.read_only;
        let metrics = self.metrics();
        let mut state = sync_value(&self.id, &self.value);
        let display = display_text(&state.editor.value, self.masked);
        self.report_content_size(&state, window, cx);
        self.scroll_to_caret(&mut state, window, &display);

        let ctx = EditContext {
            id: SharedString::from(self.id.as_str().to_string()),
            max_length: self.max_length,
            multiline: self.multiline,
            handlers: self.handlers.clone(),
        };

        let mut root = div()
            .id(self.id.clone())
            .relative()
            .w_full()
            .min_h(px(metrics.line_height()))
            .overflow_hidden()
            .text_size(px(self.font_size))
            .line_height(px(metrics.line_height()))
            .text_color(self.text_color)
            .key_context(entry_key_context(self.multiline))
            .track_focus(&handle);

        root = root.child({
            let id = ctx.id.clone();
            let handle = handle.clone();
            let ime = EntryImeHandler {
                ctx: ctx.clone(),
                editable,
                metrics,
            };
            canvas(
                move |bounds, _, _cx| {
                    ENTRY_STATE.with_existing(&id, |state| {
                        state.origin = (f32::from(bounds.origin.x), f32::from(bounds.origin.y));
                        state.content_width = f32::from(bounds.size.width);
                    });
                },
                move |_, _, window, cx| {
                    window.handle_input(&handle, ime, cx);
                },
            )
            .absolute()
            .size_full()
        });

        if !self.disabled {
            root = root
                .on_mouse_down(MouseButton::Left, {
                    let id = ctx.id.clone();
                    let handle = handle.clone();
                    move |event, window, cx| {
                        window.focus(&handle, cx);
                        let Some(index) = ENTRY_STATE
                            .with_existing(&id, |state| state.clone())
                            .map(|state| metrics.index_at(window, &state, event.position))
                        else {
                            return;
                        };
                        ENTRY_STATE.with_existing(&id, |state| {
                            state.editor.set_caret(index, event.modifiers.shift);
                            state.selecting = true;
                        });
                        window.refresh();
                    }
                })
                .on_mouse_move({
                    let id = ctx.id.clone();
                    move |event, window, _cx| {
                        let Some(state) = ENTRY_STATE
                            .with_existing(&id, |state| state.clone())
                            .filter(|state| state.selecting)
                        else {
                            return;
                        };
                        let index = metrics.index_at(window, &state, event.position);
                        ENTRY_STATE.with_existing(&id, |state| state.editor.set_caret(index, true));
                        window.refresh();
                    }
                })
                .on_mouse_up(MouseButton::Left, {
                    let id = ctx.id.clone();
                    move |_, _, _| {
                        ENTRY_STATE.with_existing(&id, |state| state.selecting = false);
                    }
                })
                .on_mouse_up_out(MouseButton::Left, {
                    let id = ctx.id.clone();
                    move |_, _, _| {
                        ENTRY_STATE.with_existing(&id, |state| state.selecting = false);
                    }
                })
                .on_action(edit_action::<CaretLeft>(&ctx, |editor| editor.move_left(false)))
                .on_action(edit_action::<CaretRight>(&ctx, |editor| editor.move_right(false)))
                .on_action(edit_action::<LineStart>(&ctx, |editor| editor.move_home(false)))
                .on_action(edit_action::<LineEnd>(&ctx, |editor| editor.move_end(false)))
                .on_action(edit_action::<ExtendLeft>(&ctx, |editor| editor.move_left(true)))
                .on_action(edit_action::<ExtendRight>(&ctx, |editor| editor.move_right(true)))
                .on_action(edit_action::<ExtendToLineStart>(&ctx, |editor| editor.move_home(true)))
                .on_action(edit_action::<ExtendToLineEnd>(&ctx, |editor| editor.move_end(true)))
                .on_action(edit_action::<SelectAll>(&ctx, EditorState::select_all));
            if self.multiline {
                root = root
                    .on_action(edit_action::<CaretUp>(&ctx, |editor| editor.move_lines(-1, false)))
                    .on_action(edit_action::<CaretDown>(&ctx, |editor| editor.move_lines(1, false)))
                    .on_action(edit_action::<ExtendUp>(&ctx, |editor| editor.move_lines(-1, true)))
                    .on_action(edit_action::<ExtendDown>(&ctx, |editor| editor.move_lines(1, true)));
            }
            // Secure text never reaches the clipboard.
            if !self.masked {
                root = root.on_action({
                    let id = ctx.id.clone();
                    move |_: &CopyText, _window, cx| {
                        let selected = editor_for(&id).selected_text();
                        if !selected.is_empty() {
                            cx.write_to_clipboard(ClipboardItem::new_string(selected));
                        }
                    }
                });
            }
        }

        if editable {
            root = root
                .cursor_text()
                .on_action(edit_action::<Backspace>(&ctx, |editor| {
                    editor.delete_backward();
                }))
                .on_action(edit_action::<Delete>(&ctx, |editor| {
                    editor.delete_forward();
                }))
                .on_action({
                    let ctx = ctx.clone();
                    move |_: &PasteText, window, cx| {
                        let Some(text) = cx.read_from_clipboard().and_then(|item| item.text())
                        else {
                            return;
                        };
                        let before = editor_for(&ctx.id);
                        let mut editor = before.clone();
                        if editor.insert_text(&ctx.sanitize(&text)) {
                            editor.clamp_to_max_length(ctx.max_length);
                        }
                        ctx.commit(&before.value, editor, window, cx);
                    }
                });
            if !self.masked {
                root = root.on_action({
                    let ctx = ctx.clone();
                    move |_: &CutText, window, cx| {
                        let before = editor_for(&ctx.id);
                        let selected = before.selected_text();
                        if selected.is_empty() {
                            return;
                        }
                        cx.write_to_clipboard(ClipboardItem::new_string(selected));
                        let mut editor = before.clone();
                        editor.delete_backward();
                        ctx.commit(&before.value, editor, window, cx);
                    }
                });
            }
            root = if self.multiline {
                root.on_action(edit_action::<Newline>(&ctx, |editor| {
                    editor.insert_text("\n");
                }))
            } else {
                root.on_action({
                    let ctx = ctx.clone();
                    move |_: &Submit, window, cx| {
                        let value = editor_for(&ctx.id).value;
                        if let Some(handler) = ctx.handlers.on_submit.as_ref() {
                            (handler)(&value, window, cx);
                        }
                    }
                })
            };
        } else {
            root = root.cursor_default();
        }

        let show_placeholder = state.editor.is_empty() && self.placeholder.is_some();
        if show_placeholder {
            let mut placeholder = div()
                .w_full()
                .truncate()
                .text_color(self.placeholder_color)
                .child(self.placeholder.clone().unwrap_or_default());
            if self.align == TextAlign::Right {
                placeholder = placeholder.text_right();
            }
            root = root.child(placeholder);
        } else if self.multiline {
            root = root.child(self.render_lines(&state, &display));
        } else {
            let mut row = div().relative().left(px(-state.scroll_x)).w_full().flex();
            if self.align == TextAlign::Right {
                row = row.justify_end();
            }
            root = root.child(row.child(text_run(
                &display,
                state.editor.selection,
                self.selection_color,
            )));
        }

        if editable && focused && state.editor.selection.is_none() {
            root = root.child(self.render_caret(window, &state));
        }

        root
    }
}
