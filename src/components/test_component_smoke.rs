use super::*;
use crate::contracts::{ComponentThemeOverridable, Disableable, FieldLike, MotionAware};
use crate::motion::{MotionConfig, MotionLevel};
use crate::style::{LineType, TextAlign};
use gpui::{AnyElement, IntoElement, Rgba, div};

fn into_any(element: impl IntoElement) -> AnyElement {
    element.into_any_element()
}

fn gray() -> Rgba {
    Rgba {
        r: 0.5,
        g: 0.5,
        b: 0.5,
        a: 1.0,
    }
}

#[test]
fn smoke_parts_render_into_any_element() {
    let _ = into_any(Affix::prefix("$").active(true).focused(false));
    let _ = into_any(Affix::suffix("kg").motion(MotionConfig::new().level(MotionLevel::None)));
    let _ = into_any(Affix::prefix("").themed(|patch| patch));
    let _ = into_any(Counter::new(3, Some(5)).font_size(12.0));
    let _ = into_any(Counter::new(3, None));
    let _ = into_any(Helper::new(Some("Required".into())).color(gray()).opacity(0.5));
    let _ = into_any(Helper::new(None).align(TextAlign::Right));
    let _ = into_any(Label::new("Email").active(true).focused(true).errored(false));
    let _ = into_any(Line::new(LineType::Dotted, 1.0, gray()));
    let _ = into_any(Line::new(LineType::None, 1.0, gray()));
    let _ = into_any(Icon::named("eye").size(24.0));
}

#[test]
fn smoke_entry_variants_render_into_any_element() {
    let _ = into_any(TextEntry::new().value("hello").placeholder("Type here"));
    let _ = into_any(TextEntry::new().multiline(true).value("one\ntwo"));
    let _ = into_any(TextEntry::new().masked(true).read_only(true).max_length(Some(8)));
    let _ = into_any(
        TextEntry::new()
            .disabled(true)
            .on_change_text(|_, _, _| {})
            .on_submit(|_, _, _| {}),
    );
}

#[test]
fn smoke_text_field_configurations_render_into_any_element() {
    let _ = into_any(TextField::new().label("Name"));
    let _ = into_any(
        TextField::new()
            .with_id("smoke-email")
            .label("Email")
            .title("We never share it")
            .error("Required")
            .placeholder("you@example.com")
            .character_restriction(40)
            .prefix("@")
            .suffix(".com")
            .on_change_text(|_, _, _| {})
            .on_focus(|_, _| {})
            .on_blur(|_, _| {}),
    );
    let _ = into_any(
        TextField::new()
            .label("Password")
            .secure_text_entry(true)
            .entry_attributes(EntryAttributes {
                submit_behavior: SubmitBehavior::BlurAndSubmit,
                ..EntryAttributes::default()
            })
            .on_submit(|_, _, _| {}),
    );
    let _ = into_any(
        TextField::new()
            .label("Notes")
            .multiline(true)
            .height(120.0)
            .on_content_size_change(|_, _, _| {}),
    );
    let _ = into_any(
        TextField::new()
            .label("Locked")
            .value("read me")
            .disabled(true)
            .disabled_line_type(LineType::Dashed),
    );
    let _ = into_any(
        TextField::new()
            .label("Search")
            .suffix_icon("magnify")
            .render_accessory(|| div().into_any_element())
            .tint_color("#6200ee")
            .motion(MotionConfig::new().duration_ms(120)),
    );
    let _ = into_any(Disableable::disabled(TextField::new(), true));
}
