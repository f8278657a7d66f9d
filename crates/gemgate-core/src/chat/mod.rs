//! Chat request handling.

pub mod orchestrator;
