//! Slug resolution: mapping wikilink targets to internal routes.
//!
//! The compiler queries a `SlugResolver` for every cross-reference it
//! finds. The interface returns futures: resolutions for one document run
//! concurrently and the compiler reassembles them in source order, so an
//! asynchronous collaborator cannot scramble output.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of the resolution collaborator itself.
///
/// "No such note" is not an error; it's an `Ok(None)` answer.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup request could not complete
    #[error("resolver request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The lookup service answered with an unexpected status
    #[error("resolver returned status {0}")]
    Status(u16),
}

/// Maps a reference slug to an internal route, or reports no match.
#[async_trait]
pub trait SlugResolver: Send + Sync {
    /// Resolve a slug.
    ///
    /// # Returns
    /// * `Ok(Some(route))` - the slug maps to a live internal route
    /// * `Ok(None)` - no note with this slug exists
    /// * `Err` - the collaborator itself is unavailable
    async fn resolve(&self, slug: &str) -> Result<Option<String>, ResolveError>;
}

// ==================== Static Resolver ====================

/// Resolver over an immutable in-memory route table.
///
/// Built from the content store at startup; never fails.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    routes: HashMap<String, String>,
}

impl StaticResolver {
    /// Create a resolver from a slug → route table.
    pub fn new(routes: HashMap<String, String>) -> Self {
        StaticResolver { routes }
    }

    /// Add a single route.
    pub fn insert(&mut self, slug: impl Into<String>, route: impl Into<String>) {
        self.routes.insert(slug.into(), route.into());
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[async_trait]
impl SlugResolver for StaticResolver {
    async fn resolve(&self, slug: &str) -> Result<Option<String>, ResolveError> {
        Ok(self.routes.get(slug).cloned())
    }
}

// ==================== HTTP Resolver ====================

/// Resolver backed by a remote lookup service.
///
/// Queries `GET {base}/resolve/{slug}`; a 200 answer carries
/// `{"route": "..."}` and a 404 means no such note. Anything else is a
/// collaborator failure.
pub struct HttpResolver {
    client: reqwest::Client,
    base_url: String,
}

/// Successful lookup payload
#[derive(Debug, Deserialize)]
struct ResolvePayload {
    route: String,
}

impl HttpResolver {
    /// Create a resolver for a service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpResolver {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SlugResolver for HttpResolver {
    async fn resolve(&self, slug: &str) -> Result<Option<String>, ResolveError> {
        let url = format!("{}/resolve/{}", self.base_url.trim_end_matches('/'), slug);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let payload: ResolvePayload = response.json().await?;
                Ok(Some(payload.route))
            }
            status => Err(ResolveError::Status(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== StaticResolver Tests ====================

    #[tokio::test]
    async fn test_static_resolver_hit() {
        let mut resolver = StaticResolver::default();
        resolver.insert("borrowing", "/ko/notes/borrowing");

        let route = resolver.resolve("borrowing").await.expect("Should resolve");
        assert_eq!(route, Some("/ko/notes/borrowing".to_string()));
    }

    #[tokio::test]
    async fn test_static_resolver_miss() {
        let resolver = StaticResolver::default();
        let route = resolver.resolve("missing").await.expect("Should resolve");
        assert_eq!(route, None);
    }

    #[test]
    fn test_static_resolver_len() {
        let mut resolver = StaticResolver::default();
        assert!(resolver.is_empty());
        resolver.insert("a", "/ko/notes/a");
        resolver.insert("b", "/ko/notes/b");
        assert_eq!(resolver.len(), 2);
    }

    // ==================== HttpResolver Tests ====================

    #[tokio::test]
    async fn test_http_resolver_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve/borrowing"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "route": "/ko/notes/borrowing"
                })),
            )
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(server.uri());
        let route = resolver.resolve("borrowing").await.expect("Should resolve");
        assert_eq!(route, Some("/ko/notes/borrowing".to_string()));
    }

    #[tokio::test]
    async fn test_http_resolver_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(server.uri());
        let route = resolver.resolve("missing").await.expect("Should resolve");
        assert_eq!(route, None);
    }

    #[tokio::test]
    async fn test_http_resolver_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve/anything"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(server.uri());
        let result = resolver.resolve("anything").await;
        assert!(matches!(result, Err(ResolveError::Status(500))));
    }

    #[tokio::test]
    async fn test_http_resolver_invalid_payload_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(server.uri());
        let result = resolver.resolve("garbled").await;
        assert!(matches!(result, Err(ResolveError::Http(_))));
    }

    #[tokio::test]
    async fn test_http_resolver_trims_trailing_slash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve/note"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "route": "/en/notes/note" })),
            )
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(format!("{}/", server.uri()));
        let route = resolver.resolve("note").await.expect("Should resolve");
        assert_eq!(route, Some("/en/notes/note".to_string()));
    }
}
