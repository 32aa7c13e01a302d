//! Filesystem-backed content store.
//!
//! Notes live under `<root>/<locale>/<slug>.md`. The store reads and
//! parses on demand without caching, so edits on disk are visible to the
//! next load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::compile::{CompileError, ContentDocument};
use crate::i18n::Locale;

/// Failure loading content from disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No note exists for the locale and slug
    #[error("note not found: {locale}/{slug}")]
    NotFound { locale: String, slug: String },

    /// The content root is missing or not a directory
    #[error("content root is not a directory: {0}")]
    MissingRoot(PathBuf),

    /// The note exists but its source cannot be parsed
    #[error("note '{slug}' is malformed: {source}")]
    Malformed {
        slug: String,
        #[source]
        source: CompileError,
    },

    /// Filesystem failure other than a missing note
    #[error("content store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store rooted at a directory of per-locale note trees.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Open a store over an existing content root.
    ///
    /// # Arguments
    /// * `root` - Directory holding one subdirectory per locale
    ///
    /// # Returns
    /// The store, or `StoreError::MissingRoot` when the directory does
    /// not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::MissingRoot(root));
        }
        debug!(root = %root.display(), "Opened content store");
        Ok(ContentStore { root })
    }

    /// The content root this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load and parse one note.
    ///
    /// Slugs that could escape the per-locale directory are treated as
    /// absent rather than touching the filesystem.
    pub fn load(&self, locale: Locale, slug: &str) -> Result<ContentDocument, StoreError> {
        if !is_safe_slug(slug) {
            return Err(self.not_found(locale, slug));
        }

        let path = self.note_path(locale, slug);
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(self.not_found(locale, slug));
            }
            Err(err) => return Err(StoreError::Io(err)),
        };

        debug!(locale = locale.code(), slug, "Loaded note source");
        ContentDocument::parse(slug, locale, &source).map_err(|source| StoreError::Malformed {
            slug: slug.to_string(),
            source,
        })
    }

    /// Slugs of every note a locale has, sorted.
    ///
    /// A locale directory that does not exist yet reads as empty.
    pub fn list_slugs(&self, locale: Locale) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(locale.code());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                slugs.push(stem.to_string());
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    /// Slug-to-route table for a locale's notes.
    pub fn route_table(&self, locale: Locale) -> Result<HashMap<String, String>, StoreError> {
        let mut routes = HashMap::new();
        for slug in self.list_slugs(locale)? {
            let route = format!("/{}/notes/{}", locale.code(), slug);
            routes.insert(slug, route);
        }
        Ok(routes)
    }

    fn note_path(&self, locale: Locale, slug: &str) -> PathBuf {
        self.root.join(locale.code()).join(format!("{slug}.md"))
    }

    fn not_found(&self, locale: Locale, slug: &str) -> StoreError {
        StoreError::NotFound {
            locale: locale.code().to_string(),
            slug: slug.to_string(),
        }
    }
}

/// A slug must stay inside its locale directory: no separators, no
/// dot-relative names.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains('/') && !slug.contains('\\') && !slug.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ==================== Test Helpers ====================

    fn seeded_store() -> (TempDir, ContentStore) {
        let dir = tempfile::tempdir().expect("Should create temp dir");

        fs::create_dir_all(dir.path().join("ko")).expect("Should create ko dir");
        fs::write(
            dir.path().join("ko/ownership.md"),
            "---\ntitle: 소유권\ndate: 2025-12-06\n---\n\n본문입니다.\n",
        )
        .expect("Should write note");
        fs::write(
            dir.path().join("ko/borrowing.md"),
            "---\ntitle: 빌림\n---\n\n[[ownership]] 참고.\n",
        )
        .expect("Should write note");
        fs::write(dir.path().join("ko/notes.txt"), "not a note").expect("Should write file");

        let store = ContentStore::open(dir.path()).expect("Should open store");
        (dir, store)
    }

    // ==================== Open Tests ====================

    #[test]
    fn test_open_missing_root_fails() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let result = ContentStore::open(dir.path().join("does-not-exist"));

        assert!(matches!(result, Err(StoreError::MissingRoot(_))));
    }

    #[test]
    fn test_open_existing_root() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let store = ContentStore::open(dir.path()).expect("Should open store");

        assert_eq!(store.root(), dir.path());
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_load_note() {
        let (_dir, store) = seeded_store();
        let document = store.load(Locale::KOREAN, "ownership").expect("Should load");

        assert_eq!(document.slug, "ownership");
        assert_eq!(document.locale, Locale::KOREAN);
        assert_eq!(document.frontmatter.title.as_deref(), Some("소유권"));
        assert!(document.body.contains("본문입니다"));
    }

    #[test]
    fn test_load_missing_note_is_not_found() {
        let (_dir, store) = seeded_store();
        let result = store.load(Locale::KOREAN, "nope");

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_load_missing_locale_dir_is_not_found() {
        let (_dir, store) = seeded_store();
        let result = store.load(Locale::ENGLISH, "ownership");

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_load_rejects_escaping_slugs() {
        let (dir, store) = seeded_store();
        // A real file outside the locale tree must stay unreachable
        fs::write(dir.path().join("secret.md"), "top secret").expect("Should write file");

        for slug in ["../secret", "ko/../../secret", "", "..", ".hidden", "a\\b"] {
            let result = store.load(Locale::KOREAN, slug);
            assert!(
                matches!(result, Err(StoreError::NotFound { .. })),
                "slug {:?} should read as absent",
                slug
            );
        }
    }

    #[test]
    fn test_load_malformed_note() {
        let (dir, store) = seeded_store();
        fs::write(
            dir.path().join("ko/broken.md"),
            "---\ntitle: never closed\n",
        )
        .expect("Should write note");

        let result = store.load(Locale::KOREAN, "broken");
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    // ==================== Listing Tests ====================

    #[test]
    fn test_list_slugs_sorted() {
        let (_dir, store) = seeded_store();
        let slugs = store.list_slugs(Locale::KOREAN).expect("Should list");

        assert_eq!(slugs, vec!["borrowing", "ownership"]);
    }

    #[test]
    fn test_list_slugs_ignores_non_markdown() {
        let (_dir, store) = seeded_store();
        let slugs = store.list_slugs(Locale::KOREAN).expect("Should list");

        assert!(!slugs.contains(&"notes".to_string()));
    }

    #[test]
    fn test_list_slugs_missing_locale_dir_is_empty() {
        let (_dir, store) = seeded_store();
        let slugs = store.list_slugs(Locale::ENGLISH).expect("Should list");

        assert!(slugs.is_empty());
    }

    #[test]
    fn test_route_table() {
        let (_dir, store) = seeded_store();
        let routes = store.route_table(Locale::KOREAN).expect("Should build table");

        assert_eq!(
            routes.get("ownership").map(String::as_str),
            Some("/ko/notes/ownership")
        );
        assert_eq!(
            routes.get("borrowing").map(String::as_str),
            Some("/ko/notes/borrowing")
        );
        assert_eq!(routes.len(), 2);
    }
}
