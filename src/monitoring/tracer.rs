/*!
 * Tracing
 * Subscriber setup and per-operation spans for the engine
 */

use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Level, Span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use uuid::Uuid;

/// Operations running longer than this are reported at warn level
const SLOW_OPERATION: Duration = Duration::from_millis(100);

/// Install the global subscriber
///
/// - `RUST_LOG` filters events (default `info`)
/// - `GC_TRACE_JSON=1` switches to one JSON object per line
///
/// A subscriber that is already installed wins; calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = matches!(
        std::env::var("GC_TRACE_JSON").as_deref(),
        Ok("1") | Ok("true")
    );

    let output: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer()
            .json()
            .with_thread_names(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    };

    if tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .is_ok()
    {
        info!(json, "Tracing initialized");
    }
}

/// Fresh id for correlating the log lines of one operation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one engine operation
///
/// The elapsed time is logged when the span is dropped.
pub struct OperationSpan {
    span: Span,
    trace_id: String,
    started: Instant,
}

impl OperationSpan {
    pub fn new(operation: &'static str) -> Self {
        let trace_id = generate_trace_id();
        let span = tracing::span!(
            Level::DEBUG,
            "gc_operation",
            operation,
            trace_id = %trace_id,
            algorithm = tracing::field::Empty,
            reclaimed_bytes = tracing::field::Empty,
        );
        Self {
            span,
            trace_id,
            started: Instant::now(),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record_algorithm(&self, name: &str) {
        self.span.record("algorithm", name);
    }

    pub fn record_reclaimed(&self, bytes: usize) {
        self.span.record("reclaimed_bytes", bytes);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let _guard = self.span.enter();
        if elapsed > SLOW_OPERATION {
            warn!(elapsed_ms = elapsed.as_millis() as u64, "Slow GC operation");
        } else {
            debug!(elapsed_us = elapsed.as_micros() as u64, "GC operation finished");
        }
    }
}

#[inline]
pub fn span_operation(operation: &'static str) -> OperationSpan {
    OperationSpan::new(operation)
}
