//! Ollama `/api/generate` client.

use crate::config::Settings;
use crate::error::ExtractError;
use crate::prompt::PromptRequest;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Client for a local Ollama-compatible inference server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.ollama_url, &settings.model, settings.inference_timeout)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one non-streaming generate request and return the model's answer text.
    ///
    /// A missing `response` field yields an empty string; the parser decides
    /// whether that is usable.
    pub async fn generate(&self, request: &PromptRequest) -> Result<String, ExtractError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(
            "Sending request to Ollama: model={} prompt={} chars",
            request.model,
            request.prompt.len()
        );

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractError::Inference(format!(
                "Ollama API error ({}): {}",
                status,
                error_text.chars().take(500).collect::<String>()
            )));
        }

        let answer: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Inference(format!("Failed to decode Ollama response: {}", e)))?;

        info!(
            "Ollama response: model={} {} chars (prompt tokens: {}, completion tokens: {}, {} ms)",
            answer.model.as_deref().unwrap_or(&request.model),
            answer.response.len(),
            answer.prompt_eval_count.unwrap_or_default(),
            answer.eval_count.unwrap_or_default(),
            answer.total_duration.unwrap_or_default() / 1_000_000
        );

        Ok(answer.response)
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: String,
    /// Nanoseconds.
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}
