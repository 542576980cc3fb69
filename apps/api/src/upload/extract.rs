//! Text extraction adapter: staged file path + declared MIME type → plain text.

use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::upload::staging::{MIME_DOC, MIME_DOCX, MIME_PDF};

/// Extracted text shorter than this (after trimming) is treated as a failed
/// extraction — most likely a scanned or image-only document.
pub const MIN_EXTRACTED_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to extract text from document: {0}")]
    Docx(String),

    #[error("Unsupported file type for text extraction. Please use PDF or DOCX.")]
    UnsupportedType,

    #[error("Could not extract meaningful text from the file. It may be a scanned image or an empty document.")]
    TooLittleText,
}

/// Extracts plain text from a staged file. Blocking; handlers call this via
/// `spawn_blocking`.
pub fn extract_text(path: &Path, content_type: &str) -> Result<String, ExtractionError> {
    let text = match content_type {
        MIME_PDF => {
            pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?
        }
        MIME_DOCX => extract_docx(path)?,
        MIME_DOC => {
            // No dedicated reader for old-style .doc; the DOCX parser covers
            // the common case of a mislabeled DOCX and fails cleanly otherwise.
            warn!("Attempting to parse legacy .doc file; results may vary");
            extract_docx(path)?
        }
        _ => return Err(ExtractionError::UnsupportedType),
    };

    enforce_minimum_length(text)
}

fn enforce_minimum_length(text: String) -> Result<String, ExtractionError> {
    if text.trim().chars().count() < MIN_EXTRACTED_CHARS {
        return Err(ExtractionError::TooLittleText);
    }
    Ok(text)
}

fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}
