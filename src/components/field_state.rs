//! Authoritative state of one text field.
//!
//! Nothing here touches gpui: input callbacks mutate the state and return the
//! [`FieldEvent`]s the caller's handlers should observe, in order. The gpui
//! layer in `text_field` owns dispatch, frame requests and the settle timer.

use std::time::{Duration, Instant};

use crate::animation::{AnimatedValue, SettleTicket};

/// Extra height added to measured multiline content.
pub const CONTENT_HEIGHT_PADDING: f32 = if cfg!(any(target_os = "macos", target_os = "ios")) {
    5.0
} else {
    1.0
};

/// Three-point focus progress: errored wins over focused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FocusState {
    Errored,
    Neutral,
    Focused,
}

impl FocusState {
    pub fn resolve(error_present: bool, focused: bool) -> Self {
        if error_present {
            FocusState::Errored
        } else if focused {
            FocusState::Focused
        } else {
            FocusState::Neutral
        }
    }

    pub fn value(self) -> f32 {
        match self {
            FocusState::Errored => -1.0,
            FocusState::Neutral => 0.0,
            FocusState::Focused => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldEvent {
    Focus,
    Blur,
    ChangeText(String),
    Change(String),
    ContentSizeChange(f32),
    Submit(String),
}

/// The editable element a field controls.
pub trait EntryPrimitive {
    fn focus(&mut self);
    fn blur(&mut self);
    /// Empties the content without emitting a change notification.
    fn clear(&mut self);
    fn is_focused(&self) -> bool;
}

/// Behavioural subset of the field configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldProps {
    pub value: Option<String>,
    pub default_value: Option<String>,
    pub error: Option<String>,
    pub character_restriction: Option<usize>,
    pub disabled: bool,
    pub editable: bool,
    pub secure_text_entry: bool,
    pub clear_text_on_focus: bool,
    pub font_size: f32,
}

impl Default for FieldProps {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            error: None,
            character_restriction: None,
            disabled: false,
            editable: true,
            secure_text_entry: false,
            clear_text_on_focus: false,
            font_size: 16.0,
        }
    }
}

impl FieldProps {
    /// The error property, with an empty message treated as absent.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }

    /// Configured limit. A zero limit still restricts; only the counter hides it.
    pub fn limit(&self) -> Option<usize> {
        self.character_restriction
    }

    pub fn accepts_focus(&self) -> bool {
        !self.disabled && self.editable
    }
}

#[derive(Clone, Debug)]
pub struct FieldState {
    props: FieldProps,
    text: String,
    focused: bool,
    received_focus: bool,
    error: Option<String>,
    errored: bool,
    secure_text_entry: bool,
    content_height: f32,
    focus_state: FocusState,
    focus: AnimatedValue,
    pending_settle: Option<SettleTicket>,
    released: bool,
}

impl FieldState {
    pub fn new(props: FieldProps) -> Self {
        Self::new_at(props, Instant::now())
    }

    pub fn new_at(props: FieldProps, now: Instant) -> Self {
        let error = props.error_message().map(str::to_string);
        let errored = error.is_some();
        let focus_state = FocusState::resolve(errored, false);
        Self {
            text: props.value.clone().unwrap_or_default(),
            focused: false,
            received_focus: false,
            error,
            errored,
            secure_text_entry: props.secure_text_entry,
            content_height: props.font_size * 1.5,
            focus_state,
            focus: AnimatedValue::new_at(focus_state.value(), now),
            pending_settle: None,
            released: false,
            props,
        }
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn received_focus(&self) -> bool {
        self.received_focus
    }

    /// Error message currently shown in the helper row. It may lag the
    /// property while the focus animation settles.
    pub fn displayed_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn errored(&self) -> bool {
        self.errored
    }

    pub fn secure_text_entry(&self) -> bool {
        self.secure_text_entry
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus_state
    }

    pub fn focus_progress_at(&self, now: Instant) -> f32 {
        self.focus.value_at(now)
    }

    pub fn is_animating_at(&self, now: Instant) -> bool {
        self.focus.is_running_at(now)
    }

    pub fn pending_settle(&self) -> Option<SettleTicket> {
        self.pending_settle
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Applies a new set of properties coming from the owner.
    pub fn sync_props(
        &mut self,
        props: FieldProps,
        duration: Duration,
        now: Instant,
    ) -> Option<SettleTicket> {
        if props.value != self.props.value {
            self.text = props.value.clone().unwrap_or_default();
        }
        if let Some(message) = props.error_message() {
            if self.error.as_deref() != Some(message) {
                self.error = Some(message.to_string());
            }
        }
        self.errored = props.error_message().is_some();
        if props.secure_text_entry != self.props.secure_text_entry {
            self.secure_text_entry = props.secure_text_entry;
        }
        self.props = props;
        self.reconcile(duration, now)
    }

    /// Retargets the focus channel if the (errored, focused) pair changed state.
    fn reconcile(&mut self, duration: Duration, now: Instant) -> Option<SettleTicket> {
        let next = FocusState::resolve(self.errored, self.focused);
        if next == self.focus_state {
            return None;
        }
        log::trace!("field focus state {:?} -> {:?}", self.focus_state, next);
        self.focus_state = next;
        let ticket = self.focus.retarget_at(next.value(), duration, now);
        self.pending_settle = Some(ticket);
        Some(ticket)
    }

    pub fn focus(&self, entry: &mut impl EntryPrimitive) -> bool {
        if !self.props.accepts_focus() {
            return false;
        }
        entry.focus();
        true
    }

    pub fn blur(&self, entry: &mut impl EntryPrimitive) {
        entry.blur();
    }

    /// Clears the primitive and synthesises the change the primitive omits.
    pub fn clear(&mut self, entry: &mut impl EntryPrimitive) -> FieldEvent {
        entry.clear();
        self.on_change_text(String::new())
    }

    pub fn value(&self) -> &str {
        if self.shows_default_value() {
            self.props.default_value.as_deref().unwrap_or_default()
        } else {
            &self.text
        }
    }

    pub fn shows_default_value(&self) -> bool {
        !(self.received_focus || self.props.value.is_some() || self.props.default_value.is_none())
    }

    pub fn is_focused(&self, entry: &impl EntryPrimitive) -> bool {
        entry.is_focused()
    }

    /// True when the typed text is longer than the configured limit.
    pub fn is_restricted(&self) -> bool {
        self.props
            .limit()
            .is_some_and(|limit| limit < self.text.chars().count())
    }

    pub fn toggle_secure_entry(&mut self) -> bool {
        self.secure_text_entry = !self.secure_text_entry;
        self.secure_text_entry
    }

    pub fn on_focus(
        &mut self,
        entry: &mut impl EntryPrimitive,
        duration: Duration,
        now: Instant,
    ) -> Vec<FieldEvent> {
        let mut events = vec![FieldEvent::Focus];
        if self.props.clear_text_on_focus {
            events.push(self.clear(entry));
        }
        self.focused = true;
        self.received_focus = true;
        self.reconcile(duration, now);
        events
    }

    pub fn on_blur(&mut self, duration: Duration, now: Instant) -> Vec<FieldEvent> {
        self.focused = false;
        self.reconcile(duration, now);
        vec![FieldEvent::Blur]
    }

    pub fn on_change_text(&mut self, text: String) -> FieldEvent {
        self.text.clone_from(&text);
        FieldEvent::ChangeText(text)
    }

    pub fn on_change(&self, text: String) -> FieldEvent {
        FieldEvent::Change(text)
    }

    pub fn on_content_size_change(&mut self, height: f32) -> FieldEvent {
        let measured = if height.is_finite() { height.ceil() } else { 0.0 };
        self.content_height = (self.props.font_size * 1.5).max(measured + CONTENT_HEIGHT_PADDING);
        FieldEvent::ContentSizeChange(height)
    }

    pub fn on_submit(&self, text: String) -> FieldEvent {
        FieldEvent::Submit(text)
    }

    /// The pending settle ticket when its animation has run out at `now`.
    pub fn due_settle(&self, now: Instant) -> Option<SettleTicket> {
        self.pending_settle.filter(|ticket| ticket.is_due(now))
    }

    /// Settles a finished focus animation: the displayed error message is
    /// replaced by whatever the error property holds now. Tickets from
    /// superseded runs, or issued before [`FieldState::release`], do nothing.
    pub fn complete_focus_animation(&mut self, ticket: SettleTicket) -> bool {
        if self.released || !self.focus.is_current(ticket) {
            return false;
        }
        self.pending_settle = None;
        self.error = self.props.error_message().map(str::to_string);
        log::debug!(
            "field settled at {:?}, error shown: {}",
            self.focus_state,
            self.error.is_some()
        );
        true
    }

    pub fn release(&mut self) {
        self.released = true;
        self.pending_settle = None;
    }
}
