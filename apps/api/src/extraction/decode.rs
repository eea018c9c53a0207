//! Document decoding — uploaded CV bytes to plain text.
//!
//! PDFs go through `pdf-extract`; everything else must already be UTF-8 text.
//! This is the only place an `ExtractionError` can originate.

use bytes::Bytes;
use tracing::warn;

use crate::errors::MatchError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// A CV upload as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedDocument {
    pub fn is_pdf(&self) -> bool {
        self.data.starts_with(PDF_MAGIC)
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }
}

/// Decodes a document to text. CPU-bound: call through [`decode_document_blocking`]
/// from async code.
pub fn decode_document(doc: &UploadedDocument) -> Result<String, MatchError> {
    if doc.data.is_empty() {
        return Err(MatchError::Extraction("document is empty".to_string()));
    }

    let text = if doc.is_pdf() {
        pdf_extract::extract_text_from_mem(&doc.data).map_err(|e| {
            warn!("PDF decode failed for {:?}: {e}", doc.file_name);
            MatchError::Extraction(format!("unreadable PDF: {e}"))
        })?
    } else {
        String::from_utf8(doc.data.to_vec()).map_err(|_| {
            warn!("Non-text upload rejected: {:?}", doc.file_name);
            MatchError::Extraction("document is neither a PDF nor UTF-8 text".to_string())
        })?
    };

    if text.trim().is_empty() {
        return Err(MatchError::Extraction(
            "document contains no readable text".to_string(),
        ));
    }

    Ok(text)
}

/// Runs [`decode_document`] on the blocking pool. A panic inside the PDF
/// decoder surfaces as an extraction failure.
pub async fn decode_document_blocking(doc: UploadedDocument) -> Result<String, MatchError> {
    tokio::task::spawn_blocking(move || decode_document(&doc))
        .await
        .map_err(|e| {
            warn!("Document decoder aborted: {e}");
            MatchError::Extraction("document decoder aborted".to_string())
        })?
}
