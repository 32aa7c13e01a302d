//! HTTP surface: locale redirects, note pages, ops endpoints.
//!
//! Routes:
//! - `GET /healthz` - liveness check
//! - `GET /metrics` - pipeline metrics report as JSON
//! - `GET /:locale/notes/:slug` - compiled note page
//!
//! Everything else passes through the locale redirect middleware: a
//! request without a locale prefix is answered with a temporary redirect
//! into the visitor's preferred locale, except for API, framework and
//! asset paths, which are never rewritten.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::compile::{
    escape, escape_attr, CompiledDocument, ContentCompiler, HttpResolver, SlugResolver,
    StaticResolver,
};
use crate::config::Config;
use crate::i18n::{locale_redirect_target, Locale, LocaleRegistry, LocaleStrings};
use crate::metrics::{MetricsReport, PipelineMetrics};
use crate::store::{ContentStore, StoreError};

/// Paths served as-is, never locale-redirected
const OPS_PATHS: &[&str] = &["/healthz", "/metrics"];

/// Shared resolver for locales that somehow have no entry of their own
static EMPTY_RESOLVER: OnceLock<StaticResolver> = OnceLock::new();

fn empty_resolver() -> &'static StaticResolver {
    EMPTY_RESOLVER.get_or_init(StaticResolver::default)
}

// ==================== Application State ====================

/// Shared state handed to every request handler.
pub struct AppState {
    store: ContentStore,
    compiler: ContentCompiler,
    resolvers: HashMap<&'static str, Arc<dyn SlugResolver>>,
}

impl AppState {
    /// Assemble the application state for a configuration.
    ///
    /// With `RESOLVER_URL` set, every locale resolves references through
    /// the remote endpoint. Otherwise each locale resolves against the
    /// store's own route table, snapshotted at startup.
    pub fn new(config: &Config, store: ContentStore) -> anyhow::Result<Self> {
        let registry = LocaleRegistry::get();
        let mut resolvers: HashMap<&'static str, Arc<dyn SlugResolver>> = HashMap::new();

        match &config.resolver_url {
            Some(url) => {
                info!(url = url.as_str(), "Resolving references through remote endpoint");
                let remote: Arc<dyn SlugResolver> = Arc::new(HttpResolver::new(url.clone()));
                for locale_config in registry.list_enabled() {
                    resolvers.insert(locale_config.code, Arc::clone(&remote));
                }
            }
            None => {
                for locale_config in registry.list_enabled() {
                    let locale = Locale::from_config(locale_config);
                    let routes = store.route_table(locale)?;
                    info!(
                        locale = locale.code(),
                        notes = routes.len(),
                        "Built local route table"
                    );
                    resolvers.insert(locale_config.code, Arc::new(StaticResolver::new(routes)));
                }
            }
        }

        Ok(AppState {
            store,
            compiler: ContentCompiler::new(),
            resolvers,
        })
    }

    /// Resolver answering reference lookups for a locale.
    fn resolver_for(&self, locale: Locale) -> &dyn SlugResolver {
        match self.resolvers.get(locale.code()) {
            Some(resolver) => resolver.as_ref(),
            None => empty_resolver(),
        }
    }
}

// ==================== Router ====================

/// Build the application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_report))
        .route("/:locale/notes/:slug", get(note_page))
        .fallback(fallback_page)
        .layer(middleware::from_fn(locale_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Middleware ====================

/// Redirect locale-less page requests into the visitor's preferred
/// locale.
async fn locale_redirect(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if OPS_PATHS.contains(&path) {
        return next.run(request).await;
    }

    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    if let Some(target) = locale_redirect_target(path, accept_language, LocaleRegistry::get()) {
        // The redirect target is path-only; carry the query along
        let target = match request.uri().query() {
            Some(query) => format!("{target}?{query}"),
            None => target,
        };
        PipelineMetrics::global().record_redirect_issued();
        info!(from = path, to = target.as_str(), "Locale redirect");
        return Redirect::temporary(&target).into_response();
    }

    next.run(request).await
}

// ==================== Handlers ====================

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics_report() -> Json<MetricsReport> {
    Json(PipelineMetrics::global().report())
}

/// Load, compile and render one note.
async fn note_page(
    State(state): State<Arc<AppState>>,
    Path((locale_code, slug)): Path<(String, String)>,
) -> Response {
    let locale = match Locale::from_code(&locale_code) {
        Ok(locale) => locale,
        Err(_) => return not_found_page(Locale::default_locale()),
    };

    let document = match state.store.load(locale, &slug) {
        Ok(document) => document,
        Err(StoreError::NotFound { .. }) => return not_found_page(locale),
        Err(err) => {
            // Malformed notes count as compile failures even though the
            // store caught them first
            if matches!(err, StoreError::Malformed { .. }) {
                PipelineMetrics::global().record_compile_failure();
            }
            warn!(error = %err, locale = locale.code(), slug, "Failed to load note");
            return render_failure_page(locale);
        }
    };

    match state.compiler.compile(&document, state.resolver_for(locale)).await {
        Ok(compiled) => Html(render_note(locale, &compiled)).into_response(),
        Err(err) => {
            warn!(error = %err, locale = locale.code(), slug, "Failed to compile note");
            render_failure_page(locale)
        }
    }
}

/// Localized not-found page for anything the router does not know.
async fn fallback_page(request: Request) -> Response {
    let locale = request
        .uri()
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(|segment| Locale::from_code(segment).ok())
        .unwrap_or_else(Locale::default_locale);

    not_found_page(locale)
}

// ==================== Page Rendering ====================

/// Minimal HTML shell around a rendered body.
fn page_shell(locale: Locale, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<article>\n{}</article>\n</body>\n</html>\n",
        escape_attr(locale.code()),
        escape(title),
        body,
    )
}

/// Render a compiled note into a full page.
fn render_note(locale: Locale, compiled: &CompiledDocument) -> String {
    let strings = LocaleStrings::for_locale(locale);
    let title = compiled.title.as_deref().unwrap_or(strings.untitled_note);

    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    if !compiled.date.is_sentinel() {
        body.push_str(&format!(
            "<time datetime=\"{}\">{}</time>\n",
            escape_attr(&compiled.date.date_time),
            escape(&compiled.date.text),
        ));
    }
    body.push_str(&compiled.html);
    if !body.ends_with('\n') {
        body.push('\n');
    }

    page_shell(locale, title, &body)
}

fn not_found_page(locale: Locale) -> Response {
    let strings = LocaleStrings::for_locale(locale);
    let body = format!("<p>{}</p>\n", escape(strings.note_not_found));
    (
        StatusCode::NOT_FOUND,
        Html(page_shell(locale, strings.note_not_found, &body)),
    )
        .into_response()
}

fn render_failure_page(locale: Locale) -> Response {
    let strings = LocaleStrings::for_locale(locale);
    let body = format!("<p>{}</p>\n", escape(strings.note_render_failed));
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page_shell(locale, strings.note_render_failed, &body)),
    )
        .into_response()
}
