//! File retrieval and upload ports.
//!
//! - `FileFetcher`: downloads a linked file into a temporary location
//! - `FileUploader`: hands a local file to the model provider
//! - `mime`: the extension allow-list and MIME classifier shared by both

pub mod mime;

use std::future::Future;
use std::path::Path;

use tempfile::TempPath;

use gemgate_types::chat::RemoteFileRef;
use gemgate_types::error::{FetchError, UploadError};

/// A downloaded file living in a temporary location.
///
/// The file is removed from disk when this value is dropped.
#[derive(Debug)]
pub struct FetchedFile {
    path: TempPath,
    source_url: String,
    bytes: u64,
}

impl FetchedFile {
    pub fn new(path: TempPath, source_url: impl Into<String>, bytes: u64) -> Self {
        Self {
            path,
            source_url: source_url.into(),
            bytes,
        }
    }

    /// Local path of the temporary file. Keeps the source extension.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Number of bytes written to disk.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

/// Downloads a file referenced by URL.
///
/// Implementations make a single attempt (no retries), reject extensions
/// outside [`mime::SupportedExtension`], and stream the body to disk.
pub trait FileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedFile, FetchError>> + Send;
}

/// Uploads a local file to the model provider.
pub trait FileUploader: Send + Sync {
    fn upload(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> impl Future<Output = Result<RemoteFileRef, UploadError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_file_removed_on_drop() {
        let temp = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap()
            .into_temp_path();
        let path = temp.to_path_buf();

        let fetched = FetchedFile::new(temp, "https://example.test/a.txt", 0);
        assert!(fetched.path().exists());
        assert_eq!(fetched.path().extension().unwrap(), "txt");
        assert_eq!(fetched.source_url(), "https://example.test/a.txt");

        drop(fetched);
        assert!(!path.exists());
    }
}
