//! Chat orchestrator: the request handler behind `POST /api/gemini`.
//!
//! One call to [`ChatOrchestrator::handle`] runs the whole exchange:
//!
//! 1. resolve the session for the caller's id (created if absent)
//! 2. if a link is present: download it, classify its MIME type, upload it
//! 3. append the user turn (`[file, prompt]` or `[prompt]`)
//! 4. ask the chat provider to continue the conversation
//! 5. append the model turn and return its text
//!
//! The session guard is held from step 2 to step 5, so two requests with the
//! same id run one after the other. A download or upload failure leaves the
//! history untouched. A chat failure leaves the user turn in place.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{Instrument, error, info, info_span, warn};

use gemgate_types::chat::{ChatReply, Part, RemoteFileRef, Turn};
use gemgate_types::config::TimeoutConfig;
use gemgate_types::error::{FetchError, LlmError, ProxyError, UploadError};

use crate::file::mime;
use crate::file::{FileFetcher, FileUploader};
use crate::llm::provider::ChatProvider;
use crate::session::store::SessionStore;

/// Validated input of one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInput {
    pub prompt: String,
    pub session_id: String,
    /// URL of a file to attach. Never `Some("")`.
    pub link: Option<String>,
}

impl ChatInput {
    /// Build an input; an empty link counts as no link.
    pub fn new(
        prompt: impl Into<String>,
        session_id: impl Into<String>,
        link: Option<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: session_id.into(),
            link: link.filter(|l| !l.is_empty()),
        }
    }
}

/// Composes fetcher, uploader, chat provider, and session store.
///
/// Generic over the three ports so gemgate-core never depends on
/// gemgate-infra; `AppState` pins the concrete types.
pub struct ChatOrchestrator<F: FileFetcher, U: FileUploader, C: ChatProvider> {
    fetcher: Arc<F>,
    uploader: Arc<U>,
    chat: Arc<C>,
    sessions: SessionStore,
    timeouts: TimeoutConfig,
}

impl<F: FileFetcher, U: FileUploader, C: ChatProvider> ChatOrchestrator<F, U, C> {
    pub fn new(fetcher: Arc<F>, uploader: Arc<U>, chat: Arc<C>, sessions: SessionStore) -> Self {
        Self {
            fetcher,
            uploader,
            chat,
            sessions,
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Override the per-stage timeouts.
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The session store this orchestrator appends to.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one chat request end to end.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::Download`] if the linked file cannot be fetched
    /// - [`ProxyError::Upload`] if the provider rejects the file
    /// - [`ProxyError::Unhandled`] for anything else (chat failure, etc.)
    pub async fn handle(&self, input: ChatInput) -> Result<ChatReply, ProxyError> {
        let span = info_span!(
            "gemgate.chat",
            session_id = %input.session_id,
            has_link = input.link.is_some(),
            provider = self.chat.name(),
        );
        self.handle_inner(input).instrument(span).await
    }

    async fn handle_inner(&self, input: ChatInput) -> Result<ChatReply, ProxyError> {
        let session = self.sessions.get_or_create(&input.session_id);
        let mut history = session.lock().await;

        let user_turn = match input.link.as_deref() {
            Some(link) => {
                let file = self.attach(link).await?;
                Turn::user(vec![Part::file(file), Part::text(input.prompt.as_str())])
            }
            None => Turn::user(vec![Part::text(input.prompt.as_str())]),
        };

        history.append(user_turn)?;

        let reply = match timeout(self.timeouts.chat(), self.chat.generate(history.turns())).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(error = %e, turns = history.len(), "Chat call failed; user turn kept");
                return Err(e.into());
            }
            Err(_) => {
                error!(timeout_secs = self.timeouts.chat_secs, "Chat call timed out; user turn kept");
                return Err(LlmError::Timeout.into());
            }
        };

        history.append(Turn::model_text(reply.text.as_str()))?;

        info!(
            turns = history.len(),
            input_tokens = reply.usage.input_tokens,
            output_tokens = reply.usage.output_tokens,
            "Chat exchange complete"
        );

        Ok(reply)
    }

    /// Download, classify, and upload a linked file.
    ///
    /// The temporary file is removed when this returns.
    async fn attach(&self, link: &str) -> Result<RemoteFileRef, ProxyError> {
        let file = match timeout(self.timeouts.download(), self.fetcher.fetch(link)).await {
            Ok(Ok(file)) => file,
            Ok(Err(e)) => {
                warn!(error = %e, url = %link, "File download failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(url = %link, timeout_secs = self.timeouts.download_secs, "File download timed out");
                return Err(FetchError::Timeout.into());
            }
        };

        let mime_type = mime::classify(&file.path().to_string_lossy());

        let uploaded = timeout(
            self.timeouts.upload(),
            self.uploader.upload(file.path(), mime_type),
        )
        .await;

        match uploaded {
            Ok(Ok(remote)) => {
                info!(
                    url = %file.source_url(),
                    bytes = file.bytes(),
                    mime_type,
                    remote = %remote.name,
                    "File attached"
                );
                Ok(remote)
            }
            Ok(Err(e)) => {
                warn!(error = %e, url = %link, mime_type, "File upload failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(url = %link, timeout_secs = self.timeouts.upload_secs, "File upload timed out");
                Err(UploadError::Timeout.into())
            }
        }
    }
}
