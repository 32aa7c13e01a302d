//! Pipeline metrics and observability module.
//!
//! This module provides metrics tracking for the content pipeline,
//! including compiled documents, reference resolution outcomes, and
//! locale redirects.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Counters for the content pipeline.
pub struct PipelineMetrics {
    /// Number of documents compiled successfully
    documents_compiled: AtomicUsize,

    /// Number of compilations that failed
    compile_failures: AtomicUsize,

    /// Number of cross-references resolved to a route
    references_resolved: AtomicUsize,

    /// Number of cross-references left broken
    references_broken: AtomicUsize,

    /// Number of locale redirects issued to incoming requests
    redirects_issued: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<PipelineMetrics> = OnceLock::new();

impl PipelineMetrics {
    /// Create a fresh set of counters, all at zero.
    ///
    /// Production code shares the `global()` instance; independent
    /// instances keep tests free of cross-talk.
    pub fn new() -> Self {
        PipelineMetrics {
            documents_compiled: AtomicUsize::new(0),
            compile_failures: AtomicUsize::new(0),
            references_resolved: AtomicUsize::new(0),
            references_broken: AtomicUsize::new(0),
            redirects_issued: AtomicUsize::new(0),
        }
    }

    /// Get the global pipeline metrics instance.
    ///
    /// This method initializes the metrics on first call and returns a
    /// reference to the singleton instance on subsequent calls.
    pub fn global() -> &'static PipelineMetrics {
        METRICS.get_or_init(PipelineMetrics::new)
    }

    /// Record a successfully compiled document.
    pub fn record_document_compiled(&self) {
        self.documents_compiled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed compilation.
    pub fn record_compile_failure(&self) {
        self.compile_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cross-reference that resolved to a route.
    pub fn record_reference_resolved(&self) {
        self.references_resolved.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cross-reference that stayed broken.
    pub fn record_reference_broken(&self) {
        self.references_broken.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a locale redirect issued to a request.
    pub fn record_redirect_issued(&self) {
        self.redirects_issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current compiled document count.
    pub fn documents_compiled(&self) -> usize {
        self.documents_compiled.load(Ordering::Relaxed)
    }

    /// Get the current compile failure count.
    pub fn compile_failures(&self) -> usize {
        self.compile_failures.load(Ordering::Relaxed)
    }

    /// Get the current resolved reference count.
    pub fn references_resolved(&self) -> usize {
        self.references_resolved.load(Ordering::Relaxed)
    }

    /// Get the current broken reference count.
    pub fn references_broken(&self) -> usize {
        self.references_broken.load(Ordering::Relaxed)
    }

    /// Get the current redirect count.
    pub fn redirects_issued(&self) -> usize {
        self.redirects_issued.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let compiled = self.documents_compiled();
        let failures = self.compile_failures();
        let attempts = compiled + failures;
        let compile_success_rate = if attempts > 0 {
            (compiled as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        let resolved = self.references_resolved();
        let broken = self.references_broken();
        let total_references = resolved + broken;
        let broken_reference_rate = if total_references > 0 {
            (broken as f64 / total_references as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            documents_compiled: compiled,
            compile_failures: failures,
            compile_success_rate,
            references_resolved: resolved,
            references_broken: broken,
            broken_reference_rate,
            redirects_issued: self.redirects_issued(),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        PipelineMetrics::new()
    }
}

/// Metrics report containing current pipeline statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of documents compiled successfully
    pub documents_compiled: usize,

    /// Number of compilations that failed
    pub compile_failures: usize,

    /// Compilation success rate as a percentage (0-100)
    pub compile_success_rate: f64,

    /// Number of cross-references resolved to a route
    pub references_resolved: usize,

    /// Number of cross-references left broken
    pub references_broken: usize,

    /// Broken reference rate as a percentage (0-100)
    pub broken_reference_rate: f64,

    /// Number of locale redirects issued
    pub redirects_issued: usize,
}
