//! Internationalization (i18n) module for the bilingual garden.
//!
//! This module provides a centralized, extensible architecture for managing
//! the locales content is served in. All locale-related logic, localized
//! strings, negotiation, and date formatting is contained here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Type-safe Locale type validated against the registry
//! - `strings`: Centralized localized strings, one immutable bundle per locale
//! - `resolver`: Path and Accept-Language negotiation for locale redirects
//! - `date`: Timezone-invariant, locale-aware date formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Locale, LocaleRegistry};
//!
//! // Get the default locale (Korean)
//! let default = Locale::default_locale();
//!
//! // Create a locale from a tag
//! let english = Locale::from_code("en")?;
//!
//! // List all enabled locales
//! let locales = LocaleRegistry::get().list_enabled();
//! ```

mod date;
mod locale;
mod registry;
mod resolver;
mod strings;

pub use date::{format_display_date, FormattedDate};
pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
pub use resolver::{
    has_locale_prefix, is_excluded_path, locale_redirect_target, preferred_locale,
};
pub use strings::{LocaleStrings, ENGLISH_STRINGS, KOREAN_STRINGS};
