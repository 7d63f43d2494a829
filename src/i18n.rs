use crate::style::LayoutDirection;

const RTL_LANGUAGES: [&str; 10] = ["ar", "arc", "ckb", "dv", "fa", "he", "ps", "sd", "ur", "yi"];

/// Layout direction implied by a BCP 47 locale tag such as `he-IL` or `ar_EG`.
pub fn direction_for_locale(tag: &str) -> LayoutDirection {
    let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
    let language = normalized.split('-').next().unwrap_or_default();
    if RTL_LANGUAGES.contains(&language) {
        LayoutDirection::Rtl
    } else {
        LayoutDirection::Ltr
    }
}

#[cfg(feature = "i18n")]
pub fn system_direction() -> LayoutDirection {
    sys_locale::get_locale()
        .map(|tag| direction_for_locale(&tag))
        .unwrap_or(LayoutDirection::Ltr)
}

#[cfg(not(feature = "i18n"))]
pub fn system_direction() -> LayoutDirection {
    LayoutDirection::Ltr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_to_left_languages_are_detected() {
        assert_eq!(direction_for_locale("he-IL"), LayoutDirection::Rtl);
        assert_eq!(direction_for_locale("ar_EG"), LayoutDirection::Rtl);
        assert_eq!(direction_for_locale("FA"), LayoutDirection::Rtl);
    }

    #[test]
    fn other_languages_stay_left_to_right() {
        assert_eq!(direction_for_locale("en-US"), LayoutDirection::Ltr);
        assert_eq!(direction_for_locale("hr"), LayoutDirection::Ltr);
        assert_eq!(direction_for_locale(""), LayoutDirection::Ltr);
    }
}
