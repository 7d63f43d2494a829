use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use gpui::Rgba;

use super::{control, text_entry};
use super::field_state::{EntryPrimitive, FieldEvent, FieldProps, FieldState, FocusState};
use super::field_style::{AffixVisuals, CounterVisuals, FieldLook, FieldVisuals};
use super::text_field::{
    FIELD_STATE, TextFieldHandle, settle_after, settle_field, take_pending_events,
};
use crate::theme::{FieldMetrics, FieldPalette};

const DURATION: Duration = Duration::from_millis(225);

static STATE_TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

struct StateTestGuard {
    _lock: MutexGuard<'static, ()>,
}

fn guard() -> StateTestGuard {
    let lock = match STATE_TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    control::clear_all();
    StateTestGuard { _lock: lock }
}

impl Drop for StateTestGuard {
    fn drop(&mut self) {
        control::clear_all();
    }
}

#[derive(Default)]
struct FakeEntry {
    focused: bool,
    cleared: usize,
}

impl EntryPrimitive for FakeEntry {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn clear(&mut self) {
        self.cleared += 1;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

fn palette() -> FieldPalette {
    FieldPalette::FALLBACK
}

fn look() -> FieldLook {
    FieldLook {
        palette: palette(),
        metrics: FieldMetrics::default(),
        scale_factor: 2.0,
        has_placeholder: false,
        has_title: false,
        multiline: false,
        fixed_height: None,
    }
}

fn props(configure: impl FnOnce(&mut FieldProps)) -> FieldProps {
    let mut props = FieldProps::default();
    configure(&mut props);
    props
}

fn assert_color(actual: Rgba, expected: Rgba) {
    let close = (actual.r - expected.r).abs() < 1e-4
        && (actual.g - expected.g).abs() < 1e-4
        && (actual.b - expected.b).abs() < 1e-4
        && (actual.a - expected.a).abs() < 1e-4;
    assert!(close, "{actual:?} != {expected:?}");
}

#[test]
fn affix_opacity_target_for_every_flag_pair() {
    assert_eq!(AffixVisuals::opacity_target(false, false), 0.0);
    assert_eq!(AffixVisuals::opacity_target(true, false), 1.0);
    assert_eq!(AffixVisuals::opacity_target(false, true), 1.0);
    assert_eq!(AffixVisuals::opacity_target(true, true), 1.0);
}

#[test]
fn focus_state_ignores_arrival_order() {
    let start = Instant::now();
    for (error, focused) in [(false, false), (true, false), (false, true), (true, true)] {
        let expected = if error {
            -1.0
        } else if focused {
            1.0
        } else {
            0.0
        };
        let error_props = props(|props| {
            props.error = error.then(|| "Required".to_string());
        });

        // Error first, then focus.
        let mut first = FieldState::new_at(FieldProps::default(), start);
        first.sync_props(error_props.clone(), DURATION, start);
        if focused {
            first.on_focus(&mut FakeEntry::default(), DURATION, start);
        }

        // Focus first, then error.
        let mut second = FieldState::new_at(FieldProps::default(), start);
        if focused {
            second.on_focus(&mut FakeEntry::default(), DURATION, start);
        }
        second.sync_props(error_props, DURATION, start);

        for state in [&first, &second] {
            assert_eq!(state.focus_state().value(), expected);
            assert_eq!(state.focus_progress_at(start + DURATION), expected);
        }
    }
}

#[test]
fn counter_is_empty_without_a_limit() {
    for count in [0, 1, 5, 500] {
        assert_eq!(CounterVisuals::derive(count, None, &palette()).label(), None);
        assert_eq!(CounterVisuals::derive(count, Some(0), &palette()).label(), None);
    }
}

#[test]
fn counter_turns_red_only_past_the_limit() {
    let palette = palette();
    assert_color(CounterVisuals::derive(4, Some(5), &palette).color, palette.base);
    assert_color(CounterVisuals::derive(5, Some(5), &palette).color, palette.base);
    assert_color(CounterVisuals::derive(6, Some(5), &palette).color, palette.error);
}

#[test]
fn value_precedence_covers_every_combination() {
    let start = Instant::now();

    // No focus yet, no external value, default set: default wins.
    let state = FieldState::new_at(
        props(|props| props.default_value = Some("fallback".into())),
        start,
    );
    assert_eq!(state.value(), "fallback");

    // External value set: internal text wins over the default.
    let state = FieldState::new_at(
        props(|props| {
            props.value = Some("typed".into());
            props.default_value = Some("fallback".into());
        }),
        start,
    );
    assert_eq!(state.value(), "typed");

    // Received focus: internal text wins even though it is empty.
    let mut state = FieldState::new_at(
        props(|props| props.default_value = Some("fallback".into())),
        start,
    );
    state.on_focus(&mut FakeEntry::default(), DURATION, start);
    assert_eq!(state.value(), "");

    // Nothing configured: the empty internal text.
    let state = FieldState::new_at(FieldProps::default(), start);
    assert_eq!(state.value(), "");
}

#[test]
fn clear_emits_exactly_one_empty_change() {
    let mut state = FieldState::new(props(|props| props.value = Some("hello".into())));
    let mut entry = FakeEntry::default();
    let event = state.clear(&mut entry);
    assert_eq!(event, FieldEvent::ChangeText(String::new()));
    assert_eq!(entry.cleared, 1);
    assert_eq!(state.text(), "");
    assert_eq!(state.value(), "");
}

#[test]
fn clear_text_on_focus_orders_focus_before_change() {
    let mut state = FieldState::new(props(|props| {
        props.value = Some("stale".into());
        props.clear_text_on_focus = true;
    }));
    let mut entry = FakeEntry::default();
    let events = state.on_focus(&mut entry, DURATION, Instant::now());
    assert_eq!(
        events,
        vec![FieldEvent::Focus, FieldEvent::ChangeText(String::new())]
    );
    assert!(state.focused());
    assert!(state.received_focus());
}

#[test]
fn restriction_boundary_is_not_restricted() {
    let mut state = FieldState::new(props(|props| props.character_restriction = Some(3)));
    state.on_change_text("abc".into());
    assert!(!state.is_restricted());
    state.on_change_text("abcd".into());
    assert!(state.is_restricted());

    let mut unlimited = FieldState::new(FieldProps::default());
    unlimited.on_change_text("a very long text".into());
    assert!(!unlimited.is_restricted());
}

#[test]
fn counter_scenario_under_the_limit() {
    let now = Instant::now();
    let state = FieldState::new_at(
        props(|props| {
            props.value = Some("abc".into());
            props.character_restriction = Some(5);
        }),
        now,
    );
    let visuals = FieldVisuals::derive(&state, &look(), now);
    assert_eq!(visuals.counter.label().as_deref(), Some("3 / 5"));
    assert!(!visuals.restricted);
    assert!(!state.is_restricted());
    assert_color(visuals.counter.color, palette().base);
}

#[test]
fn counter_scenario_over_the_limit_forces_error_underline() {
    let now = Instant::now();
    let mut state = FieldState::new_at(props(|props| props.character_restriction = Some(5)), now);
    state.on_focus(&mut FakeEntry::default(), DURATION, now);
    for text in ["a", "ab", "abc", "abcd", "abcde", "abcdef"] {
        state.on_change_text(text.into());
    }
    let visuals = FieldVisuals::derive(&state, &look(), now + DURATION / 2);
    assert_eq!(visuals.counter.label().as_deref(), Some("6 / 5"));
    assert!(visuals.restricted);
    assert!(state.is_restricted());
    assert_color(visuals.counter.color, palette().error);
    assert_color(visuals.border_color, palette().error);
    assert_eq!(visuals.border_width, 2.0);
}

#[test]
fn zero_limit_restricts_any_text_but_hides_the_counter() {
    let now = Instant::now();
    let mut state = FieldState::new_at(props(|props| props.character_restriction = Some(0)), now);
    assert!(!state.is_restricted());

    state.on_change_text("a".into());
    assert!(state.is_restricted());
    let visuals = FieldVisuals::derive(&state, &look(), now);
    assert!(visuals.restricted);
    assert_color(visuals.border_color, palette().error);
    assert_eq!(visuals.counter.label(), None);
}

#[test]
fn error_scenario_shows_error_and_hides_title() {
    let now = Instant::now();
    let state = FieldState::new_at(props(|props| props.error = Some("Required".into())), now);
    assert_eq!(state.focus_state(), FocusState::Errored);
    assert_eq!(state.displayed_error(), Some("Required"));

    let mut look = look();
    look.has_title = true;
    let visuals = FieldVisuals::derive(&state, &look, now);
    assert_eq!(visuals.focus_progress, -1.0);
    assert_eq!(visuals.error_opacity, 1.0);
    assert_eq!(visuals.title_opacity, 0.0);
}

#[test]
fn clearing_error_while_focused_settles_on_focused() {
    let start = Instant::now();
    let errored = props(|props| props.error = Some("Required".into()));
    let mut state = FieldState::new_at(errored.clone(), start);
    state.on_focus(&mut FakeEntry::default(), DURATION, start);
    assert_eq!(state.focus_state(), FocusState::Errored);

    let later = start + Duration::from_millis(10);
    let ticket = state
        .sync_props(FieldProps::default(), DURATION, later)
        .expect("clearing the error retargets");
    assert_eq!(state.focus_state(), FocusState::Focused);
    assert!(!state.errored());
    // Message stays visible while the animation runs.
    assert_eq!(state.displayed_error(), Some("Required"));
    assert!(state.focus_progress_at(later) < 0.0);

    let settled_at = later + DURATION;
    assert_eq!(state.due_settle(settled_at), Some(ticket));
    assert_eq!(state.focus_progress_at(settled_at), 1.0);
    assert!(state.complete_focus_animation(ticket));
    assert_eq!(state.displayed_error(), None);
    assert_eq!(state.pending_settle(), None);
}

#[test]
fn superseded_and_released_tickets_do_nothing() {
    let start = Instant::now();
    let mut state = FieldState::new_at(FieldProps::default(), start);
    let first = state
        .sync_props(props(|props| props.error = Some("Bad".into())), DURATION, start)
        .expect("error retargets");
    let second = state
        .sync_props(FieldProps::default(), DURATION, start)
        .expect("clearing retargets");
    assert!(!state.complete_focus_animation(first));
    assert_eq!(state.displayed_error(), Some("Bad"));

    state.release();
    assert!(!state.complete_focus_animation(second));
    assert!(state.is_released());
    assert_eq!(state.displayed_error(), Some("Bad"));
}

#[test]
fn content_size_grows_with_padding() {
    let mut state = FieldState::new(FieldProps::default());
    let event = state.on_content_size_change(40.2);
    assert_eq!(event, FieldEvent::ContentSizeChange(40.2));
    assert_eq!(
        state.content_height(),
        41.0 + super::field_state::CONTENT_HEIGHT_PADDING
    );
    state.on_content_size_change(3.0);
    assert_eq!(state.content_height(), 24.0);
}

#[test]
fn store_backed_settle_runs_after_the_delay() {
    let _guard = guard();
    let start = Instant::now();
    let duration = Duration::from_millis(5);
    let ticket = FIELD_STATE.with(
        "settle-field",
        || FieldState::new_at(FieldProps::default(), start),
        |state| {
            state.sync_props(
                props(|props| props.error = Some("Taken".into())),
                duration,
                start,
            )
        },
    );
    let ticket = ticket.expect("error retargets");
    FIELD_STATE.with_existing("settle-field", |state| {
        state.sync_props(FieldProps::default(), duration, start)
    });

    // The first run was superseded by the second.
    assert!(!futures::executor::block_on(settle_after(
        "settle-field".to_string(),
        ticket
    )));
    let current = FIELD_STATE
        .with_existing("settle-field", |state| state.pending_settle())
        .flatten()
        .expect("pending ticket");
    assert!(futures::executor::block_on(settle_after(
        "settle-field".to_string(),
        current
    )));
    let handle = TextFieldHandle::new("settle-field");
    assert_eq!(
        FIELD_STATE.with_existing("settle-field", |state| state.displayed_error().is_none()),
        Some(true)
    );
    assert_eq!(handle.value().as_deref(), Some(""));
}

#[test]
fn release_drops_state_and_invalidates_pending_settles() {
    let _guard = guard();
    let start = Instant::now();
    let ticket = FIELD_STATE
        .with(
            "released-field",
            || FieldState::new_at(FieldProps::default(), start),
            |state| {
                state.on_change_text("abcdef".into());
                state.sync_props(
                    props(|props| {
                        props.error = Some("Bad".into());
                        props.character_restriction = Some(5);
                    }),
                    DURATION,
                    start,
                )
            },
        )
        .expect("error retargets");

    let handle = TextFieldHandle::new("released-field");
    assert!(handle.is_restricted());
    handle.release();
    assert!(!FIELD_STATE.contains("released-field"));
    assert!(!settle_field("released-field", ticket));
    assert_eq!(handle.value(), None);
    assert!(!handle.is_restricted());
}

#[test]
fn entry_adopts_owner_values_only_when_they_change() {
    let _guard = guard();
    assert_eq!(text_entry::adopt_value("entry-sync", "abc"), "abc");
    text_entry::type_text("entry-sync", "d");
    assert_eq!(text_entry::adopt_value("entry-sync", "abcd"), "abcd");
    assert_eq!(text_entry::entry_value("entry-sync").as_deref(), Some("abcd"));
    assert_eq!(text_entry::adopt_value("entry-sync", "xyz"), "xyz");
}

#[test]
fn clearing_the_entry_is_silent_and_sticks() {
    let _guard = guard();
    text_entry::adopt_value("entry-clear", "hello");
    text_entry::clear_entry("entry-clear");
    assert_eq!(text_entry::entry_value("entry-clear").as_deref(), Some(""));
    assert_eq!(text_entry::adopt_value("entry-clear", ""), "");
}

#[test]
fn handle_clear_queues_one_empty_change_for_the_next_render() {
    let _guard = guard();
    FIELD_STATE.set(
        "cleared-field",
        FieldState::new(props(|props| props.value = Some("hello".into()))),
    );
    let handle = TextFieldHandle::new("cleared-field");
    let mut entry = FakeEntry::default();

    let event = handle.clear_entry(&mut entry);
    assert_eq!(event, Some(FieldEvent::ChangeText(String::new())));
    assert_eq!(entry.cleared, 1);
    assert_eq!(handle.value().as_deref(), Some(""));

    assert_eq!(
        take_pending_events("cleared-field"),
        vec![FieldEvent::ChangeText(String::new())]
    );
    assert!(take_pending_events("cleared-field").is_empty());
}

#[test]
fn handle_clear_without_a_rendered_field_queues_nothing() {
    let _guard = guard();
    let handle = TextFieldHandle::new("never-rendered");
    assert_eq!(handle.clear_entry(&mut FakeEntry::default()), None);
    assert!(take_pending_events("never-rendered").is_empty());
}
