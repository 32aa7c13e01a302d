//! Locale registry: single source of truth for all supported locales.
//!
//! This module provides a centralized registry of the locales the garden
//! serves content in. It uses a singleton pattern with `OnceLock` to ensure
//! thread-safe initialization and access; the registry is immutable after
//! construction, so handing out `&'static` references is safe everywhere.

use std::sync::OnceLock;

/// Configuration for a supported locale.
///
/// Contains all metadata and settings for a specific locale, including
/// its tag, names, enabled status, and whether it's the default locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 locale tag (e.g., "ko", "en")
    pub code: &'static str,

    /// English name of the locale (e.g., "Korean", "English")
    pub name: &'static str,

    /// Native name of the locale (e.g., "한국어", "English")
    pub native_name: &'static str,

    /// Whether this is the default locale used when resolution fails
    /// (only one should be true)
    pub is_default: bool,

    /// Whether this locale is enabled for serving
    pub enabled: bool,
}

/// Global locale registry.
///
/// The registry contains all supported locales and provides methods to query
/// and access them. It's initialized once on first access and remains
/// immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    ///
    /// This method initializes the registry on first call and returns a
    /// reference to the singleton instance on subsequent calls.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its tag.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 locale tag (e.g., "ko", "en")
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales.
    ///
    /// # Returns
    /// A vector of references to all locale configurations where `enabled`
    /// is true.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get all locales (including disabled ones).
    ///
    /// # Returns
    /// A vector of references to all locale configurations.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the default locale configuration.
    ///
    /// The default locale is the fallback used whenever negotiation fails
    /// or an unknown tag is requested. There should be exactly one.
    ///
    /// # Returns
    /// A reference to the default locale configuration.
    ///
    /// # Panics
    /// Panics if no default locale is found or if multiple default locales
    /// are defined (this indicates a configuration error).
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check whether a candidate tag is a supported, enabled locale.
    ///
    /// Matching is exact: case-sensitive, no normalization, no partial
    /// matches. The empty string and unknown tags are invalid.
    ///
    /// # Arguments
    /// * `candidate` - The locale tag to check
    ///
    /// # Returns
    /// `true` if the locale exists and is enabled, `false` otherwise.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.get_by_code(candidate)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }
}

/// Default locale configurations.
///
/// This function returns the set of locales the garden ships with.
/// Korean is the default; English is the secondary locale.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            is_default: true,
            enabled: true,
        },
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: false,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_korean() {
        let registry = LocaleRegistry::get();
        let config = registry.get_by_code("ko");

        assert!(config.is_some());
        let config = config.unwrap();
        assert_eq!(config.code, "ko");
        assert_eq!(config.name, "Korean");
        assert_eq!(config.native_name, "한국어");
        assert!(config.is_default);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_english() {
        let registry = LocaleRegistry::get();
        let config = registry.get_by_code("en");

        assert!(config.is_some());
        let config = config.unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
        assert_eq!(config.native_name, "English");
        assert!(!config.is_default);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LocaleRegistry::get();
        let config = registry.get_by_code("fr");
        assert!(config.is_none());
    }

    #[test]
    fn test_list_enabled_contains_korean_and_english() {
        let registry = LocaleRegistry::get();
        let enabled = registry.list_enabled();

        assert_eq!(enabled.len(), 2);
        assert!(enabled.iter().any(|locale| locale.code == "ko"));
        assert!(enabled.iter().any(|locale| locale.code == "en"));
    }

    #[test]
    fn test_list_all_contains_korean_and_english() {
        let registry = LocaleRegistry::get();
        let all = registry.list_all();

        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|locale| locale.code == "ko"));
        assert!(all.iter().any(|locale| locale.code == "en"));
    }

    #[test]
    fn test_default_locale_returns_korean() {
        let registry = LocaleRegistry::get();
        let default = registry.default_locale();

        assert_eq!(default.code, "ko");
        assert!(default.is_default);
    }

    #[test]
    fn test_is_valid_korean() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_valid("ko"));
    }

    #[test]
    fn test_is_valid_english() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_valid("en"));
    }

    #[test]
    fn test_is_valid_nonexistent() {
        let registry = LocaleRegistry::get();
        assert!(!registry.is_valid("fr"));
    }

    #[test]
    fn test_is_valid_empty_string() {
        let registry = LocaleRegistry::get();
        assert!(!registry.is_valid(""));
    }

    #[test]
    fn test_is_valid_is_case_sensitive() {
        let registry = LocaleRegistry::get();
        assert!(!registry.is_valid("KO"));
        assert!(!registry.is_valid("En"));
    }

    #[test]
    fn test_is_valid_rejects_partial_and_region_tags() {
        let registry = LocaleRegistry::get();
        assert!(!registry.is_valid("k"));
        assert!(!registry.is_valid("ko-KR"));
        assert!(!registry.is_valid("en-US"));
    }

    #[test]
    fn test_locale_config_clone() {
        let config = LocaleConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            is_default: true,
            enabled: true,
        };

        let cloned = config.clone();
        assert_eq!(config.code, cloned.code);
        assert_eq!(config.name, cloned.name);
    }
}
