//! Gemini REST API provider.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
