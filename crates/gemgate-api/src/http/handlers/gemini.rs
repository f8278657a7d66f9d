//! POST /api/gemini
//!
//! Forwards a prompt, with an optional linked document, to Gemini and
//! returns the reply text. History is kept per `customId`.
//!
//! The exchange runs in its own task and finishes even if the caller
//! disconnects.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use gemgate_core::chat::orchestrator::ChatInput;
use gemgate_types::error::ProxyError;

use crate::http::error::AppError;
use crate::http::response::MessageResponse;
use crate::state::AppState;

/// Request body. Missing fields take their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub custom_id: String,
    /// URL of a document to attach; empty means none.
    #[serde(default)]
    pub link: Option<String>,
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<GeminiRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::MalformedBody(e.body_text()))?;

    let input = ChatInput::new(body.prompt, body.custom_id, body.link);

    let orchestrator = state.orchestrator.clone();
    let reply = tokio::spawn(async move { orchestrator.handle(input).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Chat task failed");
            ProxyError::Unhandled(e.to_string())
        })??;

    Ok(Json(MessageResponse::new(reply.text)))
}
