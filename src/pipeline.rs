//! Extraction pipeline orchestrator.
//!
//! Document → text → normalized text → prompt → model answer → structured
//! result, short-circuiting on the first failure.

use crate::config::Settings;
use crate::document::{Document, DocumentKind};
use crate::error::ExtractError;
use crate::normalize::normalize;
use crate::ollama::OllamaClient;
use crate::parser::parse_answer;
use crate::prompt::{build_prompt, PROMPT_VERSION};
use crate::schema::Extraction;
use crate::text_extractor::extract_text;
use crate::upload_store::UploadStore;
use anyhow::Result;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Pipeline {
    client: OllamaClient,
    uploads: UploadStore,
    max_chars: usize,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_parts(
            OllamaClient::from_settings(settings)?,
            UploadStore::new(&settings.upload_dir),
            settings.max_chars,
        ))
    }

    pub fn with_parts(client: OllamaClient, uploads: UploadStore, max_chars: usize) -> Self {
        Self {
            client,
            uploads,
            max_chars,
        }
    }

    /// Run one document through the pipeline.
    ///
    /// The staged upload lives only inside this call and is removed on every
    /// return path.
    pub async fn run(&self, document: &Document) -> Result<Extraction, ExtractError> {
        let request_id = Uuid::new_v4();
        info!(
            "[{}] Starting extraction for: {} ({} bytes)",
            request_id,
            document.filename,
            document.data.len()
        );

        let result = self.run_inner(document).await;
        match &result {
            Ok(_) => info!("[{}] Extraction complete: {}", request_id, document.filename),
            Err(e) => warn!("[{}] Extraction failed ({}): {}", request_id, e.kind(), e),
        }
        result
    }

    async fn run_inner(&self, document: &Document) -> Result<Extraction, ExtractError> {
        let kind = DocumentKind::from_filename(&document.filename)?;

        let staged = self.uploads.stage(document, kind)?;
        let raw = extract_text(kind, &staged.read()?)?;
        debug!("Extracted {} chars from {:?} document", raw.chars().count(), kind);

        let text = normalize(&raw, self.max_chars);
        if text.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let request = build_prompt(self.client.model(), &text);
        debug!(
            "Prompt {} built: {} chars of document text",
            PROMPT_VERSION,
            text.chars().count()
        );

        let answer = self.client.generate(&request).await?;
        debug!("Raw model answer length: {} chars", answer.len());

        let extracted_features = parse_answer(&answer)?;

        Ok(Extraction {
            filename: document.filename.clone(),
            extracted_features,
        })
    }
}
