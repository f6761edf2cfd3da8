//! Observability for the CLI: structured logging via `tracing-subscriber`.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary.

mod tracing_init;

pub use tracing_init::*;
