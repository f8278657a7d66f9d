//! HTTP file fetcher.
//!
//! Downloads a linked document with a single GET and streams the body into a
//! uniquely named temp file, chunk by chunk, so large files never sit in
//! memory. The temp file keeps the source extension as its suffix.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use gemgate_core::file::mime::{SupportedExtension, extension_of};
use gemgate_core::file::{FetchedFile, FileFetcher};
use gemgate_types::error::FetchError;

/// [`FileFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFileFetcher {
    client: reqwest::Client,
}

impl HttpFileFetcher {
    /// Create a fetcher with its own HTTP client.
    ///
    /// Only the connect phase is bounded here; the orchestrator bounds the
    /// whole download.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Resolve the allow-listed extension of `url`'s last path segment.
    ///
    /// Query string and fragment are ignored.
    fn supported_extension(url: &reqwest::Url) -> Result<SupportedExtension, FetchError> {
        let ext = extension_of(url.path());
        ext.and_then(SupportedExtension::from_extension)
            .ok_or_else(|| FetchError::UnsupportedExtension(ext.unwrap_or_default().to_string()))
    }
}

impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, FetchError> {
        if url.is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let extension = Self::supported_extension(&parsed)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let temp = tempfile::Builder::new()
            .prefix("gemgate-")
            .suffix(extension.extension())
            .tempfile()
            .map_err(|e| FetchError::Io(e.to_string()))?;
        let (file, path) = temp.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut body = response.bytes_stream();
        let mut bytes: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network(format!("response body read: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
            bytes += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| FetchError::Io(e.to_string()))?;

        debug!(url = %url, path = %path.display(), bytes, "File downloaded");

        Ok(FetchedFile::new(path, url, bytes))
    }
}
