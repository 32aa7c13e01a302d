//! Theme-pair syntax highlighting for fenced code blocks.
//!
//! Every fenced block is rendered twice, once per theme of the light/dark
//! pair, so the embedding page can switch themes without a runtime
//! highlighting pass. The syntax and theme sets are process-wide read-only
//! constants, loaded once.

use std::sync::OnceLock;

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use tracing::warn;

use super::escape::escape;

/// Shared syntax definitions (initialized lazily)
fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Shared theme definitions (initialized lazily)
fn theme_set() -> &'static ThemeSet {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults)
}

/// The light/dark theme pair code blocks are rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePair {
    /// Theme name used for the light variant
    pub light: &'static str,

    /// Theme name used for the dark variant
    pub dark: &'static str,
}

impl Default for ThemePair {
    fn default() -> Self {
        ThemePair {
            light: "InspiredGitHub",
            dark: "base16-ocean.dark",
        }
    }
}

/// A fenced code block rendered for both themes of the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedBlock {
    /// Pre-rendered HTML for the light theme
    pub light_html: String,

    /// Pre-rendered HTML for the dark theme
    pub dark_html: String,
}

impl HighlightedBlock {
    /// Render the pair as a single fragment.
    ///
    /// Each variant carries a `data-theme` attribute; the page's stylesheet
    /// shows one and hides the other.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"code-block\"><div data-theme=\"light\">{}</div><div data-theme=\"dark\">{}</div></div>",
            self.light_html, self.dark_html
        )
    }
}

/// Highlighter over the shared syntax set and a theme pair.
#[derive(Debug, Clone)]
pub struct CodeHighlighter {
    themes: ThemePair,
}

impl CodeHighlighter {
    /// Create a highlighter for a theme pair.
    pub fn new(themes: ThemePair) -> Self {
        CodeHighlighter { themes }
    }

    /// The theme pair this highlighter renders for.
    pub fn themes(&self) -> &ThemePair {
        &self.themes
    }

    /// Highlight a code block for both themes.
    ///
    /// # Arguments
    /// * `code` - The raw code text
    /// * `language` - The fence language token, if one was given
    ///
    /// # Returns
    /// The block rendered once per theme. An unknown language falls back to
    /// plain-text highlighting; a failed render degrades to an escaped
    /// `<pre>` block. Never an error.
    pub fn highlight(&self, code: &str, language: Option<&str>) -> HighlightedBlock {
        HighlightedBlock {
            light_html: self.render(code, language, self.themes.light),
            dark_html: self.render(code, language, self.themes.dark),
        }
    }

    /// Render code for one theme of the pair.
    fn render(&self, code: &str, language: Option<&str>, theme_name: &str) -> String {
        let syntaxes = syntax_set();
        let syntax = language
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .and_then(|token| syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

        let theme = match theme_set().themes.get(theme_name) {
            Some(theme) => theme,
            None => {
                warn!("Unknown highlight theme '{}', rendering plain", theme_name);
                return plain_pre(code);
            }
        };

        match highlighted_html_for_string(code, syntaxes, syntax, theme) {
            Ok(html) => html,
            Err(err) => {
                warn!("Highlighting failed for '{:?}': {}", language, err);
                plain_pre(code)
            }
        }
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        CodeHighlighter::new(ThemePair::default())
    }
}

/// Escaped, unstyled fallback rendering.
fn plain_pre(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape(code))
}
