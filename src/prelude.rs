pub use crate::components::{
    Affix, Counter, EntryAttributes, FieldConfig, FieldEvent, Helper, Icon, Label, Line,
    SubmitBehavior, TextEntry, TextField, TextFieldHandle,
};
pub use crate::contracts::{ComponentThemeOverridable, Disableable, FieldLike, MotionAware};
pub use crate::error::{FieldError, FieldResult};
pub use crate::id::ComponentId;
pub use crate::motion::{Easing, MotionConfig, MotionLevel};
pub use crate::provider::FieldProvider;
pub use crate::style::{AffixKind, LayoutDirection, LineType, StrokeWidth, TextAlign};
pub use crate::theme::{ColorScheme, ColorValue, Theme, ThemePatch};
