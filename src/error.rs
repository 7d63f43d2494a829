use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    InvalidMetric { name: &'static str, value: f32 },
    InvalidColor { name: &'static str, value: String },
    InvalidDuration { value_ms: u64 },
    InvalidProportion { value: f32 },
    StatePoisoned(&'static str),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InvalidMetric { name, value } => {
                write!(f, "`{name}` must be a finite, non-negative size, got {value}")
            }
            FieldError::InvalidColor { name, value } => {
                write!(f, "`{name}` is not a recognised color: {value:?}")
            }
            FieldError::InvalidDuration { value_ms } => {
                write!(f, "animation duration of {value_ms}ms exceeds the 60s limit")
            }
            FieldError::InvalidProportion { value } => {
                write!(f, "icon size proportion must be positive, got {value}")
            }
            FieldError::StatePoisoned(context) => {
                write!(f, "{context} store lock was poisoned")
            }
        }
    }
}

impl std::error::Error for FieldError {}

pub type FieldResult<T> = Result<T, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_option() {
        let error = FieldError::InvalidMetric {
            name: "font_size",
            value: -2.0,
        };
        assert!(error.to_string().contains("font_size"));

        let error = FieldError::InvalidColor {
            name: "tint_color",
            value: "blurple".into(),
        };
        assert!(error.to_string().contains("blurple"));
    }
}
