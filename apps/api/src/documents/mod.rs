//! Uploaded document handling: media type detection and plain-text extraction.
//!
//! Bytes stay in memory for the duration of the request; nothing is written to disk.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub mod upload;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TEXT_MIME: &str = "text/plain";

/// Archive entry holding the body of a Word document.
const DOCX_BODY_ENTRY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type")]
    Unsupported,

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
    Unsupported,
}

impl MediaType {
    /// Detects the media type from the declared content type, falling back to
    /// the file extension when no specific type was declared.
    pub fn detect(content_type: Option<&str>, filename: Option<&str>) -> Self {
        let declared = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match declared.as_str() {
            PDF_MIME => MediaType::Pdf,
            DOCX_MIME => MediaType::Docx,
            TEXT_MIME => MediaType::PlainText,
            "" | "application/octet-stream" => filename
                .map(MediaType::from_extension)
                .unwrap_or(MediaType::Unsupported),
            _ => MediaType::Unsupported,
        }
    }

    fn from_extension(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            MediaType::Pdf
        } else if lower.ends_with(".docx") {
            MediaType::Docx
        } else if lower.ends_with(".txt") {
            MediaType::PlainText
        } else {
            MediaType::Unsupported
        }
    }
}

/// Decodes an uploaded document into plain text.
pub fn extract_text(bytes: &[u8], media_type: MediaType) -> Result<String, ExtractionError> {
    match media_type {
        MediaType::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        MediaType::Docx => extract_docx(bytes),
        MediaType::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        MediaType::Unsupported => Err(ExtractionError::Unsupported),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut entry = archive
        .by_name(DOCX_BODY_ENTRY)
        .map_err(|e| ExtractionError::Docx(format!("{DOCX_BODY_ENTRY}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    Ok(document_xml_to_text(&xml))
}

fn xml_patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"<w:tab\b[^>]*/>").expect("valid tab pattern"),
            Regex::new(r"<w:br\b[^>]*/>|</w:p>").expect("valid break pattern"),
            Regex::new(r"<[^>]*>").expect("valid tag pattern"),
        )
    })
}

/// Flattens WordprocessingML to text: one line per paragraph, tabs and
/// breaks preserved, every other tag dropped.
fn document_xml_to_text(xml: &str) -> String {
    let (tab, line_break, tag) = xml_patterns();

    let text = tab.replace_all(xml, "\t");
    let text = line_break.replace_all(&text, "\n");
    let text = tag.replace_all(&text, "");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.trim_end().to_string()
}
