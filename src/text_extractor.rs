//! Raw text extraction for plain text, PDF and DOCX payloads.

use crate::document::DocumentKind;
use crate::error::ExtractError;
use std::io::Cursor;
use tracing::debug;

/// Dispatch extraction by document kind.
pub fn extract_text(kind: DocumentKind, data: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::PlainText => Ok(extract_plain_text(data)),
        DocumentKind::Pdf => extract_pdf_text(data),
        DocumentKind::WordDoc => extract_docx_text(data),
    }
}

/// Lossy UTF-8 decode. Invalid sequences become U+FFFD instead of failing.
fn extract_plain_text(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Extract text from a PDF using lopdf, one segment per page in page order.
///
/// A page that fails to decode contributes an empty segment rather than
/// aborting the document.
fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractError> {
    use lopdf::Document;

    let doc = Document::load_from(Cursor::new(data)).map_err(|e| ExtractError::ExtractionFailure {
        kind: "pdf",
        detail: format!("Failed to load PDF: {}", e),
    })?;

    let pages = doc.get_pages();
    let mut segments = Vec::with_capacity(pages.len());

    for page_num in pages.keys() {
        let segment = match doc.extract_text(&[*page_num]) {
            Ok(content) => content.trim_matches(['\r', '\n']).to_string(),
            Err(e) => {
                debug!("No text on page {}: {}", page_num, e);
                String::new()
            }
        };
        segments.push(segment);
    }

    debug!("PDF extraction: {} pages", segments.len());
    Ok(segments.join("\n"))
}

/// Extract paragraph text from a DOCX package using docx-rs.
///
/// Only top-level paragraphs are read; tables and images are skipped.
fn extract_docx_text(data: &[u8]) -> Result<String, ExtractError> {
    use docx_rs::DocumentChild;

    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::ExtractionFailure {
        kind: "docx",
        detail: format!("Failed to read DOCX: {:?}", e),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    debug!("DOCX extraction: {} paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

/// Concatenate the text runs of one paragraph.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    use docx_rs::{ParagraphChild, RunChild};

    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}
