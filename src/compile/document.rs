//! Content data model: documents, frontmatter, and cross-references.

use crate::i18n::Locale;
use serde_json::Value;
use std::collections::BTreeMap;

/// Frontmatter metadata parsed from the block preceding a note's body.
///
/// Well-known keys get typed fields; everything else lands in `extra` as
/// untyped values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Display title of the note
    pub title: Option<String>,

    /// Raw publication date string (formatted later, per locale)
    pub date: Option<String>,

    /// Topic tags
    pub tags: Vec<String>,

    /// Remaining key/value pairs, untyped
    pub extra: BTreeMap<String, Value>,
}

/// A loaded content document.
///
/// Created when content is loaded from storage; immutable thereafter. One
/// instance is compiled per request.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    /// URL-safe identifier of the note
    pub slug: String,

    /// Locale the note is written in
    pub locale: Locale,

    /// Parsed frontmatter metadata
    pub frontmatter: Frontmatter,

    /// Raw source text as loaded, frontmatter included
    pub source: String,

    /// Body text following the frontmatter block
    pub body: String,
}

impl ContentDocument {
    /// Parse raw source text into a document.
    ///
    /// Splits the frontmatter block off the body and parses it. An opened
    /// but never closed frontmatter fence is the one structurally fatal
    /// condition and surfaces as `CompileError::MalformedSource`.
    ///
    /// # Arguments
    /// * `slug` - The note's identifier
    /// * `locale` - The locale the note belongs to
    /// * `source` - The raw file contents
    pub fn parse(slug: &str, locale: Locale, source: &str) -> Result<Self, super::CompileError> {
        let (frontmatter, body) = super::frontmatter::split_frontmatter(source)?;
        Ok(ContentDocument {
            slug: slug.to_string(),
            locale,
            frontmatter,
            source: source.to_string(),
            body: body.to_string(),
        })
    }

    /// Collect the cross-reference tokens embedded in the body.
    ///
    /// References inside fenced or indented code are not tokens and are
    /// not collected.
    pub fn cross_references(&self) -> Vec<CrossReference> {
        super::collect_references(&self.body)
    }
}

/// A wikilink token found inside a document.
///
/// Written as `[[slug]]` or `[[slug|label]]`; the label defaults to the
/// slug when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Target note identifier
    pub slug: String,

    /// Display label
    pub label: String,
}

/// The outcome of resolving a cross-reference.
///
/// Every reference in a document yields exactly one of these; none is left
/// unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceOutcome {
    /// The slug maps to a live internal route; rendered as a navigable link.
    Resolved {
        reference: CrossReference,
        route: String,
    },

    /// The slug has no target; rendered as a non-navigable, visually
    /// distinct marker.
    Broken { reference: CrossReference },
}

impl ReferenceOutcome {
    /// The reference this outcome was produced for.
    pub fn reference(&self) -> &CrossReference {
        match self {
            ReferenceOutcome::Resolved { reference, .. } => reference,
            ReferenceOutcome::Broken { reference } => reference,
        }
    }

    /// Whether the reference resolved to a live route.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ReferenceOutcome::Resolved { .. })
    }
}
