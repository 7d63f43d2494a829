pub mod affix;
pub mod control;
pub mod counter;
pub mod field_state;
pub mod field_style;
pub mod helper;
pub mod icon;
pub mod label;
pub mod line;
pub mod text_entry;
pub mod text_entry_state;
pub mod text_field;
pub mod utils;

pub use affix::Affix;
pub use control::{StateStore, clear_all};
pub use counter::Counter;
pub use field_state::{
    CONTENT_HEIGHT_PADDING, EntryPrimitive, FieldEvent, FieldProps, FieldState, FocusState,
};
pub use field_style::{
    AffixVisuals, CounterVisuals, FieldLook, FieldVisuals, LabelStyle, LabelVisuals,
};
pub use helper::Helper;
pub use icon::Icon;
pub use label::Label;
pub use line::{Line, line_segments};
pub use text_entry::{EntryControl, EntryHandlers, TextEntry, bind_entry_keys, focus_handle_for};
pub use text_entry_state::EditorState;
pub use text_field::{
    EntryAttributes, FieldConfig, FieldHandlers, ResolvedField, SubmitBehavior, TextField,
    TextFieldHandle, settle_after, settle_field,
};

#[cfg(test)]
mod test_component_smoke;
#[cfg(test)]
mod test_field_logic;
