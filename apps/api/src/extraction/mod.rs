//! Text Extractor: turns an uploaded document into plain text.
//!
//! Accepted uploads: `.txt`, `.doc`, `.docx`, `.pdf`. The kind is taken from
//! the content type first and the extension second. Legacy binary `.doc`
//! passes the upload filter but has no decoder.

mod docx;

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "doc", "docx", "pdf"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("file type not allowed: {0}")]
    Disallowed(String),

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ExtractionError {
    /// Message safe to show the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractionError::Disallowed(_) => "Only TXT, DOC, DOCX, and PDF files are allowed",
            ExtractionError::Unsupported(_)
            | ExtractionError::Pdf(_)
            | ExtractionError::Docx(_)
            | ExtractionError::Join(_) => "Failed to parse file content",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    Docx,
    Pdf,
}

impl FileKind {
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ExtractionError::Disallowed(file_name.to_string()));
        }

        let content_type = content_type.unwrap_or_default().to_lowercase();
        if content_type.contains("text/plain") {
            Ok(FileKind::PlainText)
        } else if content_type.contains("wordprocessing") || extension == "docx" {
            Ok(FileKind::Docx)
        } else if content_type.contains("pdf") || extension == "pdf" {
            Ok(FileKind::Pdf)
        } else if extension == "txt" {
            Ok(FileKind::PlainText)
        } else {
            Err(ExtractionError::Unsupported(file_name.to_string()))
        }
    }
}

/// Extracts text on the blocking pool. A decoder panic surfaces as `Join`.
pub async fn extract_text(bytes: Bytes, kind: FileKind) -> Result<String, ExtractionError> {
    let len = bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_blocking(&bytes, kind)).await??;
    debug!("Extracted {} chars from {len} byte {kind:?} upload", text.len());
    Ok(text)
}

fn extract_blocking(bytes: &[u8], kind: FileKind) -> Result<String, ExtractionError> {
    match kind {
        FileKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        FileKind::Docx => docx::extract(bytes),
        FileKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
        }
    }
}
