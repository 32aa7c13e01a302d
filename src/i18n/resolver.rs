//! Locale negotiation: path inspection and Accept-Language parsing.
//!
//! Pure functions that decide whether an inbound request needs a locale
//! prefix, and which locale to prefix it with. The HTTP layer in `server`
//! wraps these in a redirect middleware; everything here is synchronous and
//! stateless so it can be tested without a running server.

use crate::i18n::{Locale, LocaleRegistry};

/// Check whether a path is excluded from locale handling.
///
/// Excluded are API paths (`/api`), internal framework paths (`/_next`),
/// and asset requests, identified by a file extension in the final path
/// segment.
///
/// # Arguments
/// * `path` - The request path, starting with `/`
///
/// # Returns
/// `true` if the path must never receive a locale redirect.
pub fn is_excluded_path(path: &str) -> bool {
    if path == "/api" || path.starts_with("/api/") {
        return true;
    }
    if path == "/_next" || path.starts_with("/_next/") {
        return true;
    }

    // Asset requests: final segment carries a file extension
    path.rsplit('/')
        .next()
        .map(|segment| segment.contains('.'))
        .unwrap_or(false)
}

/// Check whether a path already starts with a supported locale segment.
///
/// Matches `/<locale>` exactly or `/<locale>/...` for any enabled locale.
///
/// # Arguments
/// * `path` - The request path
/// * `registry` - The locale registry to check against
pub fn has_locale_prefix(path: &str, registry: &LocaleRegistry) -> bool {
    registry.list_enabled().iter().any(|locale| {
        let bare = format!("/{}", locale.code);
        path == bare || path.starts_with(&format!("{}/", bare))
    })
}

/// Determine the preferred locale from an Accept-Language header value.
///
/// Takes the first comma-separated entry, ignores any quality parameter on
/// it, strips the region subtag (text after a hyphen), and checks the
/// result against the registry. Matching is case-sensitive; anything that
/// misses falls back to the default locale.
///
/// # Arguments
/// * `accept_language` - The raw header value, if the request carried one
/// * `registry` - The locale registry to check membership against
///
/// # Returns
/// The matched locale, or the default locale when the header is absent or
/// names nothing supported.
pub fn preferred_locale(accept_language: Option<&str>, registry: &LocaleRegistry) -> Locale {
    let header = match accept_language {
        Some(value) => value,
        None => return Locale::default_locale(),
    };

    let first = header.split(',').next().unwrap_or("");
    let tag = first.split(';').next().unwrap_or("").trim();
    let primary = tag.split('-').next().unwrap_or("").trim();

    match registry.get_by_code(primary) {
        Some(config) if config.enabled => Locale::from_config(config),
        _ => Locale::default_locale(),
    }
}

/// Compute the redirect target for a request, if one is needed.
///
/// Returns `None` when the path is excluded from locale handling or already
/// carries a locale prefix. Otherwise returns the original path with the
/// negotiated locale prepended as the first segment; the root path `/`
/// redirects to `/<locale>`.
///
/// # Arguments
/// * `path` - The request path
/// * `accept_language` - The raw Accept-Language value, if present
/// * `registry` - The locale registry
pub fn locale_redirect_target(
    path: &str,
    accept_language: Option<&str>,
    registry: &LocaleRegistry,
) -> Option<String> {
    if is_excluded_path(path) || has_locale_prefix(path, registry) {
        return None;
    }

    let locale = preferred_locale(accept_language, registry);
    if path == "/" {
        Some(format!("/{}", locale.code()))
    } else {
        Some(format!("/{}{}", locale.code(), path))
    }
}
