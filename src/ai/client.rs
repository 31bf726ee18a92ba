//! HTTP summarizer backend (`OpenAI` Responses API)
//!
//! Maps the widget's type/format/length/context onto model instructions and
//! exposes the result through the [`SummarizerBackend`] traits.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{DownloadMonitor, DownloadProgress, SummarizerBackend, SummarizerSession};
use crate::core::models::{SummarizerOptions, SummaryFormat, SummaryLength, SummaryType};
use crate::errors::WidgetError;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const DEFAULT_MODEL: &str = "gpt-5-mini";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[must_use]
pub fn build_instructions(options: &SummarizerOptions) -> String {
    let shape = match options.summary_type {
        SummaryType::KeyPoints => "Extract the most important points as a bulleted list.",
        SummaryType::Tldr => "Write a short, direct overview a busy reader can skim.",
        SummaryType::Teaser => "Write an intriguing teaser that makes the reader want more.",
        SummaryType::Headline => "Write a single headline capturing the main point.",
    };
    let size = match (options.summary_type, options.length) {
        (SummaryType::KeyPoints, SummaryLength::Short) => "Use at most 3 bullets.",
        (SummaryType::KeyPoints, SummaryLength::Medium) => "Use at most 5 bullets.",
        (SummaryType::KeyPoints, SummaryLength::Long) => "Use at most 7 bullets.",
        (SummaryType::Headline, SummaryLength::Short) => "Use at most 12 words.",
        (SummaryType::Headline, SummaryLength::Medium) => "Use at most 17 words.",
        (SummaryType::Headline, SummaryLength::Long) => "Use at most 22 words.",
        (_, SummaryLength::Short) => "Use one sentence.",
        (_, SummaryLength::Medium) => "Use at most three sentences.",
        (_, SummaryLength::Long) => "Use at most five sentences.",
    };
    let markup = match options.format {
        SummaryFormat::Markdown => "Format the output as Markdown.",
        SummaryFormat::PlainText => "Output plain text with no Markdown syntax.",
    };

    let mut instructions = format!("{shape} {size} {markup} Output only the summary.");
    if let Some(context) = options.shared_context.as_deref().map(str::trim)
        && !context.is_empty()
    {
        instructions.push_str(" Shared context: ");
        instructions.push_str(context);
    }
    instructions
}

/// Pulls the generated text out of a Responses API payload.
#[must_use]
pub fn extract_output_text(response: &Value) -> Option<String> {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let collected: Vec<&str> = response
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| {
            part.get("text").and_then(Value::as_str).or_else(|| {
                part.get("text")
                    .and_then(|t| t.get("value"))
                    .and_then(Value::as_str)
            })
        })
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// Backend that is available whenever an API key is configured.
pub struct LlmBackend {
    api_key: Option<String>,
    org_id: Option<String>,
    model_name: String,
}

impl LlmBackend {
    #[must_use]
    pub fn new(api_key: Option<String>, org_id: Option<String>, model_name: Option<String>) -> Self {
        Self {
            api_key,
            org_id,
            model_name: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl SummarizerBackend for LlmBackend {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn create(
        &self,
        options: SummarizerOptions,
        monitor: DownloadMonitor,
    ) -> Result<Arc<dyn SummarizerSession>, WidgetError> {
        let api_key = self.api_key.clone().ok_or(WidgetError::BackendUnavailable)?;
        // Nothing to download for a remote model.
        monitor.report(DownloadProgress {
            loaded: 1,
            total: Some(1),
        });
        info!(
            summary_type = %options.summary_type,
            format = %options.format,
            length = %options.length,
            model = %self.model_name,
            "Created remote summarizer session"
        );
        Ok(Arc::new(LlmSession {
            api_key,
            org_id: self.org_id.clone(),
            model_name: self.model_name.clone(),
            instructions: build_instructions(&options),
            destroyed: AtomicBool::new(false),
        }))
    }
}

struct LlmSession {
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    instructions: String,
    destroyed: AtomicBool,
}

#[async_trait]
impl SummarizerSession for LlmSession {
    async fn summarize(&self, input: &str) -> Result<String, WidgetError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(WidgetError::Backend("Session has been destroyed".to_string()));
        }

        #[cfg(feature = "debug-logs")]
        info!("Summarizing input:\n{}", input);

        let request_body = json!({
            "model": self.model_name,
            "instructions": self.instructions,
            "input": input,
        });

        let mut request = HTTP_CLIENT
            .post(RESPONSES_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body);
        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(WidgetError::Backend(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await?;
        debug!("Received summarizer response");
        extract_output_text(&response_json)
            .ok_or_else(|| WidgetError::Backend("No text in response".to_string()))
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}
