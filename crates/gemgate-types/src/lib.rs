//! Shared domain types for Gemgate.
//!
//! Conversation turns and their parts, proxy configuration, and the error
//! enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
