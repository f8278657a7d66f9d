//! Business logic and provider trait definitions for Gemgate.
//!
//! This crate defines the "ports" (file fetching, file upload, chat) that the
//! infrastructure layer implements, plus the session store and the request
//! orchestrator. It depends only on `gemgate-types` -- never on
//! `gemgate-infra` or any HTTP crate.

pub mod chat;
pub mod file;
pub mod llm;
pub mod session;
