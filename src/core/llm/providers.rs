use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::{ClasslensError, Result};
use crate::config::LlmConfig;
use super::summarizer::{ClassSummarizer, ClassSummary, SummaryParser, build_summary_prompt};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Factory function to create the summarizer selected by config.
///
/// `api_key_override` (e.g. from the command line) wins over the configured
/// key and the provider's environment variable.
pub fn create_summarizer(
    config: &LlmConfig,
    api_key_override: Option<&str>,
) -> Result<Box<dyn ClassSummarizer>> {
    let api_key = api_key_override
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.resolve_api_key())
        .ok_or_else(|| ClasslensError::Config(format!(
            "API key required for provider {} (set llm.api_key, --api-key or {})",
            config.provider,
            config.api_key_env_var()
        )))?;

    match config.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiSummarizer::new(config, api_key)?)),
        "openai" => Ok(Box::new(OpenAiSummarizer::new(config, api_key)?)),
        _ => Err(ClasslensError::Config(
            format!("Unsupported LLM provider: {}", config.provider)
        )),
    }
}

/// Google Gemini generateContent provider
pub struct GeminiSummarizer {
    config: LlmConfig,
    api_key: String,
    client: reqwest::Client,
    parser: SummaryParser,
}

impl GeminiSummarizer {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            api_key,
            client: reqwest::Client::new(),
            parser: SummaryParser::new()?,
        })
    }

    fn endpoint(&self) -> String {
        let base_url = self.config.base_url.as_deref().unwrap_or(GEMINI_BASE_URL);
        format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ClassSummarizer for GeminiSummarizer {
    async fn summarize(&self, source_text: &str) -> Result<ClassSummary> {
        let prompt = build_summary_prompt(&self.config.source_language, source_text);

        let payload = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature.unwrap_or(0.1),
                "maxOutputTokens": self.config.max_tokens.unwrap_or(2048)
            }
        });

        let response = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClasslensError::Summarization(
                format!("Gemini request failed: {}", e.without_url())
            ))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_data: serde_json::Value = response.json().await.unwrap_or_default();
            let message = error_data["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(ClasslensError::Summarization(
                format!("Gemini API error {}: {}", status, message)
            ));
        }

        let response_data: serde_json::Value = response.json().await
            .map_err(|e| ClasslensError::Summarization(
                format!("Failed to read Gemini response: {}", e.without_url())
            ))?;

        let text = response_data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| ClasslensError::Summarization("No response generated".to_string()))?;

        debug!("Gemini returned {} characters", text.len());
        self.parser.parse(text)
    }

    fn provider_name(&self) -> &str {
        "Google Gemini"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// OpenAI chat-completions provider
pub struct OpenAiSummarizer {
    config: LlmConfig,
    api_key: String,
    client: reqwest::Client,
    parser: SummaryParser,
}

impl OpenAiSummarizer {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            api_key,
            client: reqwest::Client::new(),
            parser: SummaryParser::new()?,
        })
    }
}

#[async_trait]
impl ClassSummarizer for OpenAiSummarizer {
    async fn summarize(&self, source_text: &str) -> Result<ClassSummary> {
        let prompt = build_summary_prompt(&self.config.source_language, source_text);
        let base_url = self.config.base_url.as_deref().unwrap_or(OPENAI_BASE_URL);

        let payload = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You extract structured summaries of source classes and answer with JSON only."
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": self.config.max_tokens.unwrap_or(2048),
            "temperature": self.config.temperature.unwrap_or(0.1)
        });

        let response = self.client
            .post(format!("{}/v1/chat/completions", base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClasslensError::Summarization(
                format!("OpenAI request failed: {}", e.without_url())
            ))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClasslensError::Summarization(
                format!("OpenAI API error {}: {}", status, error_text)
            ));
        }

        let response_data: serde_json::Value = response.json().await
            .map_err(|e| ClasslensError::Summarization(
                format!("Failed to read OpenAI response: {}", e.without_url())
            ))?;

        let text = response_data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClasslensError::Summarization("No response generated".to_string()))?;

        if let Some(usage) = response_data.get("usage") {
            debug!("OpenAI tokens used: {}", usage["total_tokens"]);
        }
        self.parser.parse(text)
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
