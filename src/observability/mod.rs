//! Structured tracing for guarded LLM calls.
//!
//! Spans are emitted with `tracing`; install any subscriber (for example
//! `tracing-subscriber`) to collect them. The library never installs one.

mod spans;

pub use spans::{ExchangeSpan, LlmCallSpan};
