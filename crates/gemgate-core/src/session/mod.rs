//! In-memory conversation history keyed by caller-supplied identifiers.

pub mod store;
