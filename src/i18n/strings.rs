/// All localized user-facing strings for a locale
///
/// Strings are stored in their raw, unescaped form. When embedding into
/// HTML attributes or markup, escape them with `compile::escape` first.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    /// Message attached to a broken cross-reference, shown when the
    /// referenced note does not exist
    pub broken_reference_notice: &'static str,

    /// Title fallback for a note whose frontmatter carries no title
    pub untitled_note: &'static str,

    /// Body text for the not-found page when a requested note is missing
    pub note_not_found: &'static str,

    /// Body text for the error page when a note fails to render
    pub note_render_failed: &'static str,
}

impl LocaleStrings {
    /// Get the string bundle for a locale.
    ///
    /// Bundles are compile-time constants, so this is a pure lookup with
    /// nothing to load and nothing to release.
    pub fn for_locale(locale: crate::i18n::Locale) -> &'static LocaleStrings {
        match locale.code() {
            "en" => &ENGLISH_STRINGS,
            _ => &KOREAN_STRINGS,
        }
    }
}

// ==================== Korean Strings ====================

/// Korean locale strings (default)
pub static KOREAN_STRINGS: LocaleStrings = LocaleStrings {
    broken_reference_notice: "아직 존재하지 않는 노트입니다",
    untitled_note: "제목 없는 노트",
    note_not_found: "노트를 찾을 수 없습니다",
    note_render_failed: "노트를 표시하는 중 문제가 발생했습니다",
};

// ==================== English Strings ====================

/// English locale strings
pub static ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    broken_reference_notice: "This note does not exist yet",
    untitled_note: "Untitled note",
    note_not_found: "Note not found",
    note_render_failed: "Something went wrong while rendering this note",
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    // ==================== Korean Strings Tests ====================

    #[test]
    fn test_korean_broken_reference_notice_not_empty() {
        assert!(!KOREAN_STRINGS.broken_reference_notice.is_empty());
        assert!(KOREAN_STRINGS.broken_reference_notice.contains("노트"));
    }

    #[test]
    fn test_korean_untitled_note_not_empty() {
        assert!(!KOREAN_STRINGS.untitled_note.is_empty());
    }

    #[test]
    fn test_korean_note_not_found_not_empty() {
        assert!(!KOREAN_STRINGS.note_not_found.is_empty());
    }

    #[test]
    fn test_korean_note_render_failed_not_empty() {
        assert!(!KOREAN_STRINGS.note_render_failed.is_empty());
    }

    // ==================== English Strings Tests ====================

    #[test]
    fn test_english_broken_reference_notice_not_empty() {
        assert!(!ENGLISH_STRINGS.broken_reference_notice.is_empty());
        assert!(ENGLISH_STRINGS
            .broken_reference_notice
            .contains("does not exist"));
    }

    #[test]
    fn test_english_untitled_note_not_empty() {
        assert!(!ENGLISH_STRINGS.untitled_note.is_empty());
    }

    // ==================== Bundle Mapping Tests ====================

    #[test]
    fn test_for_locale_korean() {
        let strings = LocaleStrings::for_locale(Locale::KOREAN);
        assert!(std::ptr::eq(strings, &KOREAN_STRINGS));
    }

    #[test]
    fn test_for_locale_english() {
        let strings = LocaleStrings::for_locale(Locale::ENGLISH);
        assert!(std::ptr::eq(strings, &ENGLISH_STRINGS));
    }

    #[test]
    fn test_bundles_differ_between_locales() {
        assert_ne!(
            KOREAN_STRINGS.broken_reference_notice,
            ENGLISH_STRINGS.broken_reference_notice
        );
        assert_ne!(KOREAN_STRINGS.untitled_note, ENGLISH_STRINGS.untitled_note);
    }
}
