//! Error taxonomy for one extraction request.
//!
//! Every variant is terminal for the request that raised it and is surfaced
//! to the caller as its own kind; nothing is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The filename extension is not one of txt, pdf, docx.
    #[error("Unsupported file type: .{extension}. Supported: .txt, .pdf, .docx")]
    UnsupportedFormat { extension: String },

    /// The payload is malformed for its declared format.
    #[error("Failed to extract text from {kind} document: {detail}")]
    ExtractionFailure { kind: &'static str, detail: String },

    /// Nothing left after normalization; no inference call is made.
    #[error("Document contains no extractable text")]
    EmptyDocument,

    /// Connection failure, timeout, non-success status or undecodable body.
    #[error("Inference server error: {0}")]
    Inference(String),

    /// The model answer is empty or not a valid result object.
    #[error("Model answer is not valid JSON: {0}")]
    Parse(String),

    /// Staging the upload to temporary storage failed.
    #[error("Failed to stage upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl ExtractError {
    /// Stable tag reported alongside the message in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::ExtractionFailure { .. } => "extraction_failure",
            Self::EmptyDocument => "empty_document",
            Self::Inference(_) => "inference_error",
            Self::Parse(_) => "parse_error",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Inference(format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::Inference(format!("connection failed: {}", err))
        } else {
            Self::Inference(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            ExtractError::UnsupportedFormat { extension: "exe".to_string() },
            ExtractError::ExtractionFailure { kind: "pdf", detail: "bad xref".to_string() },
            ExtractError::EmptyDocument,
            ExtractError::Inference("refused".to_string()),
            ExtractError::Parse("not json".to_string()),
            ExtractError::Storage(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
        ];
        let mut kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_unsupported_message_names_extension() {
        let err = ExtractError::UnsupportedFormat { extension: "exe".to_string() };
        assert!(err.to_string().contains(".exe"));
    }
}
