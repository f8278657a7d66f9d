//! GeminiProvider -- concrete [`ChatProvider`] and [`FileUploader`] for the
//! Gemini REST API.
//!
//! - Upload: `POST /upload/v1beta/files` (multipart: JSON metadata + media)
//! - Chat: `POST /v1beta/models/{model}:generateContent`
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `x-goog-api-key` header.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part as FormPart};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::io::ReaderStream;
use tracing::{Instrument, debug, info_span, warn};

use gemgate_core::file::FileUploader;
use gemgate_core::llm::provider::ChatProvider;
use gemgate_types::chat::{ChatReply, Part, RemoteFileRef, Turn, Usage};
use gemgate_types::config::{GeminiConfig, GenerationConfig};
use gemgate_types::error::{LlmError, UploadError};

use super::types::{
    Content, ErrorEnvelope, FileData, GeminiPart, GenerateContentRequest, GenerateContentResponse,
    UploadFileMetadata, UploadMetadata, UploadResponse,
};

/// Gemini model provider.
///
/// One instance serves both the upload and the chat port; share it behind an
/// `Arc`.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiProvider {
    /// Create a provider from configuration and a resolved API key.
    pub fn new(api_key: SecretString, config: &GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            generation: config.generation.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn generate_url(&self) -> String {
        self.url(&format!("/v1beta/models/{}:generateContent", self.model))
    }

    /// Convert history into a [`GenerateContentRequest`].
    ///
    /// Consecutive turns with the same role are merged into one content
    /// entry; Gemini expects roles to alternate.
    fn to_gemini_request(&self, history: &[Turn]) -> GenerateContentRequest {
        let mut contents: Vec<Content> = Vec::with_capacity(history.len());

        for turn in history {
            let role = turn.role.to_string();
            let parts = turn.parts.iter().map(to_gemini_part);
            match contents.last_mut() {
                Some(last) if last.role == role => last.parts.extend(parts),
                _ => contents.push(Content {
                    role,
                    parts: parts.collect(),
                }),
            }
        }

        GenerateContentRequest {
            contents,
            generation_config: (&self.generation).into(),
        }
    }

    /// Pull the most useful message out of a Gemini error body.
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(status) => format!("{status}: {}", envelope.error.message),
                None => envelope.error.message,
            },
            Err(_) => body.to_string(),
        }
    }
}

fn to_gemini_part(part: &Part) -> GeminiPart {
    match part {
        Part::Text { text } => GeminiPart::Text { text: text.clone() },
        Part::File { file } => GeminiPart::File {
            file_data: FileData {
                mime_type: file.mime_type.clone(),
                file_uri: file.uri.clone(),
            },
        },
    }
}

impl FileUploader for GeminiProvider {
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<RemoteFileRef, UploadError> {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?
            .len();

        let metadata = serde_json::to_string(&UploadMetadata {
            file: UploadFileMetadata {
                display_name: display_name.clone(),
            },
        })
        .map_err(|e| UploadError::Io(e.to_string()))?;

        let metadata_part = FormPart::text(metadata)
            .mime_str("application/json")
            .map_err(|e| UploadError::InvalidMimeType(e.to_string()))?;
        let media_part = FormPart::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            size,
        )
        .file_name(display_name)
        .mime_str(mime_type)
        .map_err(|e| UploadError::InvalidMimeType(format!("{mime_type}: {e}")))?;

        let form = Form::new()
            .part("metadata", metadata_part)
            .part("file", media_part);

        let span = info_span!(
            "gen_ai.upload",
            gen_ai.system = "gemini",
            file.size = size,
            file.mime_type = %mime_type,
        );

        async move {
            let response = self
                .client
                .post(self.url("/upload/v1beta/files"))
                .header("x-goog-api-key", self.api_key.expose_secret())
                .header("X-Goog-Upload-Protocol", "multipart")
                .multipart(form)
                .send()
                .await
                .map_err(|e| UploadError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(UploadError::Rejected {
                    status: status.as_u16(),
                    message: Self::error_message(&body),
                });
            }

            let uploaded: UploadResponse = response
                .json()
                .await
                .map_err(|e| UploadError::Deserialization(e.to_string()))?;

            debug!(name = %uploaded.file.name, "File uploaded");

            Ok(RemoteFileRef {
                name: uploaded.file.name,
                uri: uploaded.file.uri,
                mime_type: uploaded
                    .file
                    .mime_type
                    .unwrap_or_else(|| mime_type.to_string()),
            })
        }
        .instrument(span)
        .await
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, history: &[Turn]) -> Result<ChatReply, LlmError> {
        let body = self.to_gemini_request(history);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = "gemini",
            gen_ai.request.model = %self.model,
            gen_ai.request.max_tokens = self.generation.max_output_tokens,
            gen_ai.request.temperature = self.generation.temperature,
            gen_ai.request.contents = body.contents.len(),
        );

        async move {
            let response = self
                .client
                .post(self.generate_url())
                .header("x-goog-api-key", self.api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Provider {
                    message: format!("HTTP request failed: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(match status.as_u16() {
                    401 | 403 => LlmError::AuthenticationFailed,
                    429 => LlmError::RateLimited,
                    _ => LlmError::Provider {
                        message: format!("HTTP {status}: {}", Self::error_message(&error_body)),
                    },
                });
            }

            let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            })?;

            let Some(text) = gemini_resp.text() else {
                warn!(
                    finish_reason = gemini_resp.finish_reason().unwrap_or("none"),
                    "Gemini returned no text"
                );
                return Err(LlmError::EmptyResponse);
            };
            let usage = gemini_resp.usage_metadata.unwrap_or_default();

            Ok(ChatReply {
                text,
                model: gemini_resp
                    .model_version
                    .unwrap_or_else(|| self.model.clone()),
                usage: Usage {
                    input_tokens: usage.prompt_token_count,
                    output_tokens: usage.candidates_token_count,
                },
            })
        }
        .instrument(span)
        .await
    }
}
