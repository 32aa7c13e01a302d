//! Locale type: flexible, validated locale representation.
//!
//! This module provides the `Locale` type, a small copyable value that is
//! guaranteed to refer to a supported, enabled entry in the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};

/// A validated locale.
///
/// This type represents a locale that has been validated against the
/// registry. It ensures that only supported, enabled locales can be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639-1 locale tag (e.g., "ko", "en")
    code: &'static str,
}

impl Locale {
    /// The Korean locale (the garden's default).
    pub const KOREAN: Locale = Locale { code: "ko" };

    /// The English locale.
    pub const ENGLISH: Locale = Locale { code: "en" };

    /// Create a Locale from a locale tag string.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 locale tag (e.g., "ko", "en")
    ///
    /// # Returns
    /// * `Ok(Locale)` if the tag is valid and the locale is enabled
    /// * `Err` if the tag is not found or the locale is disabled
    ///
    /// # Example
    /// ```ignore
    /// let english = Locale::from_code("en")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Locale> {
        let registry = LocaleRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale {
                code: config.code, // Use the static str from the registry
            }),
            Some(_) => bail!("Locale '{}' is not enabled", code),
            None => bail!("Unknown locale tag: '{}'", code),
        }
    }

    /// Create a Locale directly from a registry entry.
    ///
    /// Registry entries are already validated, so this cannot fail.
    pub(crate) fn from_config(config: &LocaleConfig) -> Locale {
        Locale { code: config.code }
    }

    /// Get the default locale.
    ///
    /// This is the locale used whenever negotiation fails or no preference
    /// is expressed.
    ///
    /// # Returns
    /// The default Locale (Korean).
    pub fn default_locale() -> Locale {
        let config = LocaleRegistry::get().default_locale();
        Locale { code: config.code }
    }

    /// Get the ISO 639-1 locale tag.
    ///
    /// # Returns
    /// The locale tag as a static string (e.g., "ko", "en").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Returns
    /// A reference to the `LocaleConfig` for this locale.
    ///
    /// # Panics
    /// Panics if the locale tag is not found in the registry. This should
    /// never happen if the Locale was constructed properly (via `from_code`
    /// or constants).
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale tag should always be valid")
    }

    /// Get the English name of the locale.
    ///
    /// # Returns
    /// The locale name in English (e.g., "Korean", "English").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the locale.
    ///
    /// # Returns
    /// The locale name in its native form (e.g., "한국어", "English").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Check if this is the default locale.
    ///
    /// # Returns
    /// `true` if this is the fallback locale, `false` otherwise.
    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_korean_constant() {
        let korean = Locale::KOREAN;
        assert_eq!(korean.code(), "ko");
        assert_eq!(korean.name(), "Korean");
        assert!(korean.is_default());
    }

    #[test]
    fn test_english_constant() {
        let english = Locale::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.name(), "English");
        assert!(!english.is_default());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_korean() {
        let locale = Locale::from_code("ko").expect("Should succeed");
        assert_eq!(locale.code(), "ko");
        assert_eq!(locale.name(), "Korean");
    }

    #[test]
    fn test_from_code_english() {
        let locale = Locale::from_code("en").expect("Should succeed");
        assert_eq!(locale.code(), "en");
        assert_eq!(locale.name(), "English");
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Locale::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        let result = Locale::from_code("");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_code_rejects_uppercase() {
        let result = Locale::from_code("KO");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_code_rejects_region_qualified_tag() {
        let result = Locale::from_code("en-US");
        assert!(result.is_err());
    }

    // ==================== default_locale Tests ====================

    #[test]
    fn test_default_locale_returns_korean() {
        let default = Locale::default_locale();
        assert_eq!(default.code(), "ko");
        assert!(default.is_default());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_locale_equality() {
        let locale1 = Locale::KOREAN;
        let locale2 = Locale::from_code("ko").unwrap();
        assert_eq!(locale1, locale2);
    }

    #[test]
    fn test_locale_inequality() {
        let korean = Locale::KOREAN;
        let english = Locale::ENGLISH;
        assert_ne!(korean, english);
    }

    #[test]
    fn test_locale_copy() {
        let locale1 = Locale::ENGLISH;
        let locale2 = locale1; // Copy
        assert_eq!(locale1, locale2); // Both still valid
    }

    #[test]
    fn test_locale_debug() {
        let locale = Locale::ENGLISH;
        let debug = format!("{:?}", locale);
        assert!(debug.contains("en"));
    }

    // ==================== Config Access Tests ====================

    #[test]
    fn test_config_access() {
        let locale = Locale::KOREAN;
        let config = locale.config();
        assert_eq!(config.code, "ko");
        assert_eq!(config.name, "Korean");
        assert_eq!(config.native_name, "한국어");
    }

    #[test]
    fn test_native_name() {
        let korean = Locale::KOREAN;
        let english = Locale::ENGLISH;
        assert_eq!(korean.native_name(), "한국어");
        assert_eq!(english.native_name(), "English");
    }
}
