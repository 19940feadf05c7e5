//! Span definitions for orchestrated exchanges and individual provider calls.

use std::time::Instant;

use tracing::{Level, Span, field, span};

use crate::budget::CallOrigin;

/// Span covering one orchestrator exchange and every tool call it triggers.
pub struct ExchangeSpan;

impl ExchangeSpan {
    pub fn new(exchange_id: &str, model: &str, budgeted: bool) -> Span {
        span!(
            Level::INFO,
            "llm.exchange",
            exchange_id = exchange_id,
            model = model,
            budgeted = budgeted,
            otel.name = "llm.exchange",
            tool_calls = field::Empty,
            total_cost_cents = field::Empty,
        )
    }
}

/// Tracks one provider call made through the execution guard.
pub struct LlmCallSpan {
    span: Span,
    start: Instant,
}

impl LlmCallSpan {
    pub fn new(model: &str, origin: &CallOrigin, provider: &str, max_tokens: Option<u64>) -> Self {
        let span = span!(
            Level::INFO,
            "llm.call",
            model = model,
            origin = %origin,
            provider = provider,
            max_tokens = max_tokens,
            otel.name = "llm.call",
            remaining_cents = field::Empty,
            input_tokens = field::Empty,
            output_tokens = field::Empty,
            latency_ms = field::Empty,
            is_error = field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn record_remaining(&self, remaining_cents: u64) {
        self.span.record("remaining_cents", remaining_cents);
    }

    pub fn record_usage(&self, input_tokens: u64, output_tokens: u64) {
        self.span.record("input_tokens", input_tokens);
        self.span.record("output_tokens", output_tokens);
    }

    pub fn record_error(&self, error: &crate::Error) {
        self.span.record("is_error", true);
        tracing::debug!(parent: &self.span, error = %error, "Provider call failed");
    }

    pub fn finish(self) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.span.record("latency_ms", latency_ms);
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
