//! MIME classification and the download extension allow-list.
//!
//! Both the fetcher's allow-list check and the upload MIME type come from the
//! single [`SupportedExtension`] table, so the two can never disagree.

/// MIME type used for anything outside the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// File extensions accepted for download, each with its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedExtension {
    Pdf,
    Docx,
    Doc,
    Html,
    Txt,
}

impl SupportedExtension {
    pub const ALL: [SupportedExtension; 5] = [
        SupportedExtension::Pdf,
        SupportedExtension::Docx,
        SupportedExtension::Doc,
        SupportedExtension::Html,
        SupportedExtension::Txt,
    ];

    /// The extension including its leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            SupportedExtension::Pdf => ".pdf",
            SupportedExtension::Docx => ".docx",
            SupportedExtension::Doc => ".doc",
            SupportedExtension::Html => ".html",
            SupportedExtension::Txt => ".txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            SupportedExtension::Pdf => "application/pdf",
            SupportedExtension::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SupportedExtension::Doc => "application/msword",
            SupportedExtension::Html => "text/html",
            SupportedExtension::Txt => "text/plain",
        }
    }

    /// Exact, case-sensitive match on a dotted extension (e.g. ".pdf").
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.extension() == ext)
    }

    /// Match by suffix of a path or file name.
    pub fn from_suffix(path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| path.ends_with(e.extension()))
    }
}

/// Map a path, file name, or extension to a MIME type.
///
/// Total: unrecognized input maps to [`OCTET_STREAM`]. A bare extension
/// without the dot (e.g. "pdf") is accepted as well.
pub fn classify(path_or_extension: &str) -> &'static str {
    SupportedExtension::from_suffix(path_or_extension)
        .or_else(|| {
            SupportedExtension::ALL
                .into_iter()
                .find(|e| &e.extension()[1..] == path_or_extension)
        })
        .map(SupportedExtension::mime_type)
        .unwrap_or(OCTET_STREAM)
}

/// Extension (with dot) of the last segment of a `/`-separated path.
///
/// Leading dots of the file name do not start an extension, so ".txt" has
/// none while "notes.txt" has ".txt".
pub fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(dot) if dot > leading_dots => Some(&name[dot..]),
        _ => None,
    }
}
