//! Uploaded document and its format, derived from the filename extension.

use crate::error::ExtractError;

/// Raw upload as received by the transport layer.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    WordDoc,
}

impl DocumentKind {
    /// Dispatch on the filename extension (case-insensitive). No content sniffing.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        };

        match ext.as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::WordDoc),
            _ => Err(ExtractError::UnsupportedFormat { extension: ext }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::WordDoc => "docx",
        }
    }
}
