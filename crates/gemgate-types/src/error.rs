use thiserror::Error;

/// Errors from downloading a linked file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty url")]
    EmptyUrl,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported file type: '{0}'")]
    UnsupportedExtension(String),

    #[error("download failed: HTTP {0}")]
    Status(u16),

    #[error("download failed: {0}")]
    Network(String),

    #[error("temp file error: {0}")]
    Io(String),

    #[error("download timed out")]
    Timeout,
}

/// Errors from uploading a file to the model provider.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected: HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("upload failed: {0}")]
    Network(String),

    #[error("cannot read file for upload: {0}")]
    Io(String),

    #[error("invalid mime type: {0}")]
    InvalidMimeType(String),

    #[error("unexpected upload response: {0}")]
    Deserialization(String),

    #[error("upload timed out")]
    Timeout,
}

/// Errors from the remote chat capability.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("chat call timed out")]
    Timeout,
}

/// Errors from session history mutation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a turn must contain at least one part")]
    EmptyTurn,
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Errors from resolving secrets.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret '{0}' not found in environment")]
    NotFound(String),

    #[error("secret '{0}' is empty")]
    Empty(String),
}

/// The closed set of request failures.
///
/// Every failure while handling a chat request ends up as one of these
/// three kinds; the HTTP layer maps each to a fixed message.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Download(#[from] FetchError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("unhandled failure: {0}")]
    Unhandled(String),
}

impl ProxyError {
    pub const DOWNLOAD_MESSAGE: &'static str = "Failed to download file";
    pub const UPLOAD_MESSAGE: &'static str = "Failed to upload file to Gemini";
    pub const UNHANDLED_MESSAGE: &'static str = "Internal Server Error";

    /// Message safe to show the caller. Never includes error detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::Download(_) => Self::DOWNLOAD_MESSAGE,
            ProxyError::Upload(_) => Self::UPLOAD_MESSAGE,
            ProxyError::Unhandled(_) => Self::UNHANDLED_MESSAGE,
        }
    }
}

impl From<LlmError> for ProxyError {
    fn from(e: LlmError) -> Self {
        ProxyError::Unhandled(e.to_string())
    }
}

impl From<SessionError> for ProxyError {
    fn from(e: SessionError) -> Self {
        ProxyError::Unhandled(e.to_string())
    }
}
