pub mod animation;
pub mod components;
pub mod contracts;
pub mod error;
pub mod i18n;
pub mod icon;
pub mod id;
pub mod motion;
pub mod prelude;
pub mod provider;
pub mod style;
pub mod theme;

pub use crate::components::{
    Affix, Counter, EntryAttributes, FieldConfig, Helper, Label, Line, SubmitBehavior, TextEntry,
    TextField, TextFieldHandle,
};
pub use crate::contracts::{ComponentThemeOverridable, Disableable, FieldLike, MotionAware};
pub use crate::error::{FieldError, FieldResult};
pub use crate::provider::FieldProvider;
pub use crate::style::{AffixKind, LayoutDirection, LineType, StrokeWidth};
