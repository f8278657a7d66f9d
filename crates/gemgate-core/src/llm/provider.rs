//! ChatProvider trait definition.
//!
//! Uses RPITIT (native async fn in traits, Rust 2024 edition). The
//! orchestrator is generic over the provider, so no object-safe wrapper is
//! needed.

use std::future::Future;

use gemgate_types::chat::{ChatReply, Turn};
use gemgate_types::error::LlmError;

/// Remote chat-completion capability.
///
/// Implementations live in gemgate-infra (e.g., `GeminiProvider`).
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Continue the conversation described by `history`.
    ///
    /// The last turn of `history` is the user turn being answered; it is not
    /// sent a second time.
    fn generate(
        &self,
        history: &[Turn],
    ) -> impl Future<Output = Result<ChatReply, LlmError>> + Send;
}
