//! HTTP client for the text-generation gateway (Ollama-compatible API).
//!
//! Generation failures never propagate as errors: callers always receive
//! text, and failures are rendered into well-known sentinel strings so a
//! dead gateway degrades the catalog instead of breaking it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

use crate::config::Config;
use crate::errors::CatalogError;

/// Why a generation attempt produced no text.
#[derive(Debug)]
enum GenerationError {
    /// The gateway could not be reached at all.
    Connect(String),
    /// The gateway responded, but with a non-success status or an
    /// unreadable body.
    Failed(String),
}

impl GenerationError {
    /// Render the failure as the sentinel text callers store and return.
    fn into_sentinel(self) -> String {
        match self {
            GenerationError::Connect(detail) => {
                format!("Error: Failed to connect to LLM server. ({})", detail)
            }
            GenerationError::Failed(detail) => {
                format!("Error: LLM generation failed. ({})", detail)
            }
        }
    }
}

/// Capability for producing book and review summaries.
///
/// Handlers and services depend on this trait rather than the concrete
/// HTTP client, so tests can substitute a canned generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Summarize raw book content for a titled book.
    async fn generate_book_summary(&self, content: &str, title: &str) -> String;

    /// Summarize the sentiment and themes of concatenated review texts.
    async fn generate_review_summary(&self, reviews_text: &str) -> String;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Text-generation client backed by an Ollama-compatible gateway.
#[derive(Clone)]
pub struct LlmClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Full URL of the generate endpoint.
    generate_url: String,

    /// Model name passed on every request.
    model: String,
}

impl LlmClient {
    /// Create a new gateway client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_seconds))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                error!(target: "catalog.services.llm", error = %e, "Failed to build HTTP client");
                CatalogError::Internal
            })?;

        Ok(Self {
            client,
            generate_url: format!("{}/api/generate", config.llm_base_url),
            model: config.llm_model.clone(),
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.generate_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "catalog.services.llm", error = %e, "Gateway unreachable");
                GenerationError::Connect(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: "catalog.services.llm", status = %status, "Gateway returned error status");
            return Err(GenerationError::Failed(format!(
                "gateway returned status {}",
                status
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            warn!(target: "catalog.services.llm", error = %e, "Failed to parse gateway response");
            GenerationError::Failed(e.to_string())
        })?;

        Ok(body.response.trim().to_string())
    }

    async fn generate_or_sentinel(&self, prompt: &str) -> String {
        match self.generate_text(prompt).await {
            Ok(text) => text,
            Err(e) => e.into_sentinel(),
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate_book_summary(&self, content: &str, title: &str) -> String {
        let prompt = format!(
            "You are a professional book summarizer. Summarize the following book content \
             for the book titled '{}' in approximately 150 words. Content: {}",
            title, content
        );
        self.generate_or_sentinel(&prompt).await
    }

    async fn generate_review_summary(&self, reviews_text: &str) -> String {
        let prompt = format!(
            "You are a critical review analyst. Based on the following user reviews, \
             provide a concise, neutral summary of the overall sentiment and common themes. \
             Reviews: {}",
            reviews_text
        );
        self.generate_or_sentinel(&prompt).await
    }
}
