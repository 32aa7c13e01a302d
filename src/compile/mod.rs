//! Content compiler: markdown to themed, reference-resolved HTML.
//!
//! The pipeline runs in strict order per document: parse the body with
//! GFM extensions and wikilink syntax, linkify bare URLs, replace fenced
//! code with theme-pair highlighted fragments, resolve every wikilink
//! through a `SlugResolver` collaborator, then serialize the rewritten
//! event stream to HTML.
//!
//! Resolutions for one document run concurrently and are reassembled in
//! source order. Per-reference failures degrade to Broken markers; only a
//! structurally broken document or a failed collaborator aborts
//! compilation, as the two variants of `CompileError`.

mod document;
mod escape;
mod frontmatter;
mod highlight;
mod links;

pub use document::{ContentDocument, CrossReference, Frontmatter, ReferenceOutcome};
pub use escape::{escape, escape_attr};
pub use highlight::{CodeHighlighter, HighlightedBlock, ThemePair};
pub use links::{HttpResolver, ResolveError, SlugResolver, StaticResolver};

use futures::future::join_all;
use pulldown_cmark::{html, CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};
use thiserror::Error;
use tracing::debug;

use crate::i18n::{format_display_date, FormattedDate, LocaleStrings};
use crate::metrics::PipelineMetrics;

/// Compilation failure, distinguishing bad source from a failed
/// collaborator.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The document source could not be parsed at all
    #[error("malformed source: {0}")]
    MalformedSource(String),

    /// The slug resolution collaborator failed mid-compilation
    #[error("reference resolver unavailable: {0}")]
    ResolverUnavailable(#[from] ResolveError),
}

/// The renderable result of compiling one document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// Rendered HTML body
    pub html: String,

    /// Title from frontmatter, if any
    pub title: Option<String>,

    /// Publication date formatted for the document's locale
    pub date: FormattedDate,

    /// Every cross-reference with its resolution outcome, in source order
    pub references: Vec<ReferenceOutcome>,
}

/// A stretch of the lowered event stream: either plain events or a
/// cross-reference awaiting resolution.
enum Segment<'a> {
    Events(Vec<Event<'a>>),
    Reference(usize),
}

/// The markdown compiler: parse, highlight, resolve, serialize.
///
/// Stateless apart from the theme pair; one instance can compile any
/// number of documents concurrently.
pub struct ContentCompiler {
    highlighter: CodeHighlighter,
}

impl ContentCompiler {
    /// Create a compiler with the default theme pair.
    pub fn new() -> Self {
        ContentCompiler {
            highlighter: CodeHighlighter::default(),
        }
    }

    /// Create a compiler with a specific theme pair.
    pub fn with_themes(themes: ThemePair) -> Self {
        ContentCompiler {
            highlighter: CodeHighlighter::new(themes),
        }
    }

    /// Compile a document into renderable output.
    ///
    /// # Arguments
    /// * `document` - The loaded document to compile
    /// * `resolver` - The collaborator answering slug lookups
    ///
    /// # Returns
    /// The compiled document, or a `CompileError` when the collaborator
    /// fails. Broken references do not fail compilation.
    pub async fn compile(
        &self,
        document: &ContentDocument,
        resolver: &dyn SlugResolver,
    ) -> Result<CompiledDocument, CompileError> {
        let strings = LocaleStrings::for_locale(document.locale);
        let (segments, references) = self.lower(&document.body);

        debug!(
            slug = %document.slug,
            locale = document.locale.code(),
            references = references.len(),
            "Compiling note"
        );

        let outcomes = match resolve_references(&references, resolver).await {
            Ok(outcomes) => outcomes,
            Err(err) => {
                PipelineMetrics::global().record_compile_failure();
                return Err(err);
            }
        };

        let mut events: Vec<Event> = Vec::new();
        for segment in segments {
            match segment {
                Segment::Events(run) => events.extend(run),
                Segment::Reference(index) => events.push(Event::InlineHtml(
                    reference_markup(&outcomes[index], strings).into(),
                )),
            }
        }

        let mut html_out = String::with_capacity(document.body.len() * 2);
        html::push_html(&mut html_out, events.into_iter());

        let metrics = PipelineMetrics::global();
        metrics.record_document_compiled();
        for outcome in &outcomes {
            if outcome.is_resolved() {
                metrics.record_reference_resolved();
            } else {
                metrics.record_reference_broken();
            }
        }

        Ok(CompiledDocument {
            html: html_out,
            title: document.frontmatter.title.clone(),
            date: format_display_date(document.frontmatter.date.as_deref(), document.locale),
            references: outcomes,
        })
    }

    /// Lower the body into segments, collecting cross-references for
    /// later resolution. Fenced code is pre-rendered and bare URLs in
    /// plain text become links on the way.
    fn lower<'a>(&self, body: &'a str) -> (Vec<Segment<'a>>, Vec<CrossReference>) {
        let mut parser = Parser::new_ext(body, markdown_options());
        let mut segments: Vec<Segment<'a>> = Vec::new();
        let mut current: Vec<Event<'a>> = Vec::new();
        let mut references: Vec<CrossReference> = Vec::new();
        // Text inside a link, an image or indented code must stay as-is
        let mut suppress_autolink = 0usize;

        while let Some(event) = parser.next() {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let mut code = String::new();
                    for inner in parser.by_ref() {
                        match inner {
                            Event::Text(text) => code.push_str(&text),
                            Event::End(TagEnd::CodeBlock) => break,
                            _ => {}
                        }
                    }
                    let block = self.highlighter.highlight(&code, fence_language(&info));
                    current.push(Event::Html(block.to_html().into()));
                }
                Event::Start(Tag::Link {
                    link_type: LinkType::WikiLink { .. },
                    dest_url,
                    ..
                }) => {
                    let label = gather_link_label(&mut parser);
                    let slug = dest_url.trim().to_string();
                    let label = if label.is_empty() { slug.clone() } else { label };

                    if !current.is_empty() {
                        segments.push(Segment::Events(std::mem::take(&mut current)));
                    }
                    segments.push(Segment::Reference(references.len()));
                    references.push(CrossReference { slug, label });
                }
                event @ (Event::Start(Tag::Link { .. })
                | Event::Start(Tag::Image { .. })
                | Event::Start(Tag::CodeBlock(CodeBlockKind::Indented))) => {
                    suppress_autolink += 1;
                    current.push(event);
                }
                event @ (Event::End(TagEnd::Link)
                | Event::End(TagEnd::Image)
                | Event::End(TagEnd::CodeBlock)) => {
                    suppress_autolink = suppress_autolink.saturating_sub(1);
                    current.push(event);
                }
                Event::Text(text) if suppress_autolink == 0 => match autolink_text(&text) {
                    Some(linked) => current.extend(linked),
                    None => current.push(Event::Text(text)),
                },
                other => current.push(other),
            }
        }

        if !current.is_empty() {
            segments.push(Segment::Events(current));
        }

        (segments, references)
    }
}

impl Default for ContentCompiler {
    fn default() -> Self {
        ContentCompiler::new()
    }
}

/// Markdown options: GFM extensions plus wikilink syntax.
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_GFM);
    options.insert(Options::ENABLE_WIKILINKS);
    options
}

/// First token of a fence info string ("rust,no_run" → "rust").
fn fence_language(info: &str) -> Option<&str> {
    info.split([',', ' '])
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Concatenated text content of a link's children, up to the closing tag.
fn gather_link_label<'a, I>(events: &mut I) -> String
where
    I: Iterator<Item = Event<'a>>,
{
    let mut label = String::new();
    for event in events {
        match event {
            Event::Text(text) => label.push_str(&text),
            Event::Code(code) => label.push_str(&code),
            Event::End(TagEnd::Link) => break,
            _ => {}
        }
    }
    label
}

/// Split bare http(s)/www URLs in a text event into link events.
///
/// Returns `None` when the text contains no linkable URL so the caller
/// can keep the original borrowed event.
fn autolink_text<'a>(text: &str) -> Option<Vec<Event<'a>>> {
    let mut events: Vec<Event<'a>> = Vec::new();
    let mut copied = 0usize;
    let mut search = 0usize;

    while let Some((start, marker)) = next_url_marker(text, search) {
        if !autolink_boundary_ok(text, start) {
            search = start + marker.len();
            continue;
        }
        let tail = &text[start..];
        let end = tail
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(tail.len());
        let url = trim_url_end(&tail[..end]);
        if !is_linkable_url(url, marker) {
            search = start + marker.len();
            continue;
        }

        if copied < start {
            events.push(Event::Text(text[copied..start].to_string().into()));
        }
        // www autolinks carry no scheme; the href needs one
        let href = if marker == "www." {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: href.into(),
            title: "".into(),
            id: "".into(),
        }));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::End(TagEnd::Link));

        copied = start + url.len();
        search = copied;
    }

    if copied == 0 {
        return None;
    }
    if copied < text.len() {
        events.push(Event::Text(text[copied..].to_string().into()));
    }
    Some(events)
}

/// Earliest URL marker at or after `from`.
fn next_url_marker(text: &str, from: usize) -> Option<(usize, &'static str)> {
    ["https://", "http://", "www."]
        .into_iter()
        .filter_map(|marker| text[from..].find(marker).map(|at| (from + at, marker)))
        .min_by_key(|(at, _)| *at)
}

/// A URL may start at the beginning of the text or after whitespace or
/// light punctuation, never inside a word.
fn autolink_boundary_ok(text: &str, at: usize) -> bool {
    match text[..at].chars().next_back() {
        None => true,
        Some(prev) => prev.is_whitespace() || matches!(prev, '(' | '*' | '_' | '~'),
    }
}

/// Strip trailing prose punctuation, keeping parentheses that are
/// balanced within the URL itself.
fn trim_url_end(mut url: &str) -> &str {
    loop {
        let last = match url.chars().next_back() {
            Some(last) => last,
            None => return url,
        };
        let trailing = matches!(
            last,
            '.' | ',' | ':' | ';' | '!' | '?' | '*' | '_' | '~' | '\'' | '"'
        );
        let unbalanced_paren =
            last == ')' && url.matches(')').count() > url.matches('(').count();
        if trailing || unbalanced_paren {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            return url;
        }
    }
}

/// A candidate counts as a URL once something resembling a host follows
/// the marker.
fn is_linkable_url(url: &str, marker: &str) -> bool {
    let rest = match url.strip_prefix(marker) {
        Some(rest) => rest,
        None => return false,
    };
    match rest.chars().next() {
        Some(first) if first.is_alphanumeric() => {}
        _ => return false,
    }
    if marker == "www." {
        return true;
    }
    let host = rest.split('/').next().unwrap_or(rest);
    host.contains('.')
}

/// Collect the cross-references in a body without compiling it.
pub(crate) fn collect_references(body: &str) -> Vec<CrossReference> {
    let mut parser = Parser::new_ext(body, markdown_options());
    let mut references = Vec::new();

    while let Some(event) = parser.next() {
        if let Event::Start(Tag::Link {
            link_type: LinkType::WikiLink { .. },
            dest_url,
            ..
        }) = event
        {
            let label = gather_link_label(&mut parser);
            let slug = dest_url.trim().to_string();
            let label = if label.is_empty() { slug.clone() } else { label };
            references.push(CrossReference { slug, label });
        }
    }

    references
}

/// Resolve every reference concurrently, keeping source order.
///
/// A reference with an empty slug is malformed and degrades straight to
/// Broken without consulting the resolver.
async fn resolve_references(
    references: &[CrossReference],
    resolver: &dyn SlugResolver,
) -> Result<Vec<ReferenceOutcome>, CompileError> {
    let lookups = references.iter().map(|reference| async move {
        if reference.slug.is_empty() {
            return Ok(None);
        }
        resolver.resolve(&reference.slug).await
    });

    // join_all keeps results in input order even when lookups finish out
    // of order
    let results = join_all(lookups).await;

    let mut outcomes = Vec::with_capacity(references.len());
    for (reference, result) in references.iter().zip(results) {
        match result {
            Ok(Some(route)) => outcomes.push(ReferenceOutcome::Resolved {
                reference: reference.clone(),
                route,
            }),
            Ok(None) => outcomes.push(ReferenceOutcome::Broken {
                reference: reference.clone(),
            }),
            Err(err) => return Err(CompileError::ResolverUnavailable(err)),
        }
    }

    Ok(outcomes)
}

/// Render a resolution outcome as inline HTML.
///
/// Resolved references become navigable links carrying `data-wikilink`;
/// broken ones become inert, struck-through spans carrying
/// `data-wikilink-broken` and the localized missing-note message.
fn reference_markup(outcome: &ReferenceOutcome, strings: &LocaleStrings) -> String {
    match outcome {
        ReferenceOutcome::Resolved { reference, route } => format!(
            "<a href=\"{}\" data-wikilink data-slug=\"{}\">{}</a>",
            escape_attr(route),
            escape_attr(&reference.slug),
            escape(&reference.label),
        ),
        ReferenceOutcome::Broken { reference } => format!(
            "<span data-wikilink-broken data-slug=\"{}\" title=\"{}\"><s>{}</s></span>",
            escape_attr(&reference.slug),
            escape_attr(strings.broken_reference_notice),
            escape(&reference.label),
        ),
    }
}
