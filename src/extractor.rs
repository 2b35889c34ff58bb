//! Document text extraction for uploaded contracts.
//!
//! Converts a raw byte buffer of a declared MIME type into plain text.
//! PDF extraction goes through `pdf-extract`; DOCX files are unzipped and the
//! text runs of `word/document.xml` are collected.

use crate::errors::AppError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// MIME type for PDF uploads.
pub const MIME_PDF: &str = "application/pdf";

/// MIME type for DOCX uploads.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A text extractor for one document format.
pub trait DocumentExtractor: Send + Sync {
    /// Extract plain text from the document bytes.
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError>;

    /// MIME types this extractor handles.
    fn supported_types(&self) -> &[&str];

    /// Check if this extractor handles the given MIME type.
    fn supports(&self, mime_type: &str) -> bool {
        self.supported_types().contains(&mime_type)
    }

    /// Human-readable name for log messages.
    fn name(&self) -> &str;
}

/// PDF text extraction via the `pdf-extract` crate.
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::DocumentParseError(format!("Failed to parse PDF: {}", e)))
    }

    fn supported_types(&self) -> &[&str] {
        &[MIME_PDF]
    }

    fn name(&self) -> &str {
        "pdf"
    }
}

/// DOCX text extraction.
///
/// A DOCX file is a zip archive; the document body lives in
/// `word/document.xml`. Text is carried by `w:t` elements, paragraphs by
/// `w:p`, so we concatenate text runs and emit a newline per paragraph.
pub struct DocxExtractor;

impl DocumentExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            AppError::DocumentParseError(format!("Failed to open DOCX archive: {}", e))
        })?;

        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                AppError::DocumentParseError(format!("DOCX is missing word/document.xml: {}", e))
            })?
            .read_to_string(&mut document_xml)
            .map_err(|e| {
                AppError::DocumentParseError(format!("Failed to read DOCX document body: {}", e))
            })?;

        let mut reader = Reader::from_str(&document_xml);
        let mut text = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:t" => in_text_run = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => text.push('\n'),
                Ok(Event::Text(t)) if in_text_run => {
                    let chunk = t.unescape().map_err(|e| {
                        AppError::DocumentParseError(format!("Invalid DOCX text content: {}", e))
                    })?;
                    text.push_str(&chunk);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AppError::DocumentParseError(format!(
                        "Invalid DOCX XML: {}",
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(text)
    }

    fn supported_types(&self) -> &[&str] {
        &[MIME_DOCX]
    }

    fn name(&self) -> &str {
        "docx"
    }
}

static PDF_EXTRACTOR: PdfExtractor = PdfExtractor;
static DOCX_EXTRACTOR: DocxExtractor = DocxExtractor;

/// Look up the extractor for a declared MIME type.
fn extractor_for(mime_type: &str) -> Option<&'static dyn DocumentExtractor> {
    if PDF_EXTRACTOR.supports(mime_type) {
        Some(&PDF_EXTRACTOR)
    } else if DOCX_EXTRACTOR.supports(mime_type) {
        Some(&DOCX_EXTRACTOR)
    } else {
        None
    }
}

/// Extract plain text from an uploaded document.
///
/// Rejects unsupported MIME types with `UnsupportedMediaType` before any
/// extraction is attempted. A supported document that yields only whitespace
/// (e.g. a scanned, image-only PDF) is treated as unparsable.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Result<String, AppError> {
    let extractor = extractor_for(mime_type)
        .ok_or_else(|| AppError::UnsupportedMediaType(mime_type.to_string()))?;

    tracing::info!(
        "Extracting text from {} upload ({} bytes)",
        extractor.name(),
        bytes.len()
    );

    let text = extractor.extract(bytes)?;

    if text.trim().is_empty() {
        return Err(AppError::DocumentParseError(
            "Document contains no extractable text".to_string(),
        ));
    }

    tracing::debug!("Extracted {} characters of text", text.chars().count());
    Ok(text)
}
