//! Spans for HTTP exchanges.

use std::time::Instant;
use tracing::{info_span, Span};

/// Create a span covering one request/response exchange.
pub fn request_span(method: &str, url: &str) -> Span {
    info_span!(
        "http_request",
        method = %method,
        url = %url,
        status = tracing::field::Empty,
        error = tracing::field::Empty,
    )
}

/// Create a span for a mock transport call.
pub fn mock_span(queued: usize) -> Span {
    info_span!("mock_start", queued = queued)
}

/// Record an HTTP status on the current span.
pub fn record_status(status: u16) {
    Span::current().record("status", status);
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
    }
}
