//! Locale-aware markdown pipeline and preview server for a bilingual
//! digital garden.
//!
//! Notes are GFM markdown with wikilink cross-references, stored per
//! locale on disk. The crate compiles them into themed HTML with every
//! reference resolved to a route or marked broken, negotiates a locale
//! for incoming requests, and serves the result over a small axum
//! surface.

pub mod compile;
pub mod config;
pub mod i18n;
pub mod metrics;
pub mod progress;
pub mod server;
pub mod store;
