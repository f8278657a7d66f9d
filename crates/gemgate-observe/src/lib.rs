//! Observability for Gemgate: subscriber setup and log level selection.

pub mod tracing_setup;

pub use tracing_setup::{default_level, init_tracing, shutdown_tracing};
