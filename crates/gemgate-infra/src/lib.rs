//! Infrastructure layer for Gemgate.
//!
//! Contains implementations of the ports defined in `gemgate-core`:
//! HTTP file download into temp files, the Gemini REST client (file upload
//! and chat), TOML configuration loading, and environment secret lookup.

pub mod config;
pub mod fetch;
pub mod gemini;
pub mod secret;
