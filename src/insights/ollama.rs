//! Remote insight generation through the Ollama chat API.
//!
//! One non-streaming request per assessment. The model is asked for a JSON
//! object with an `insights` string and a `recommendations` string array;
//! anything else is reported as [`ProviderError::Malformed`].

use super::{InsightRequest, Insights, RemoteInsights};
use crate::error::ProviderError;
use crate::scoring::{challenges, strengths};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Ollama client.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    /// Optional bearer token for hosted, authenticated endpoints.
    pub api_key: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.7,
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
struct InsightPayload {
    insights: String,
    recommendations: Vec<String>,
}

/// Insight generator backed by an Ollama server.
pub struct OllamaInsights {
    config: OllamaConfig,
    http_client: reqwest::Client,
}

impl OllamaInsights {
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        info!(
            "Initializing insight generator with model {} at {}",
            config.model_name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn send_prompt(&self, prompt: String) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.config.ollama_url.trim_end_matches('/'));

        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            stream: false,
            format: "json",
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                ProviderError::Transport(format!(
                    "cannot connect to Ollama at {}",
                    self.config.ollama_url
                ))
            } else {
                ProviderError::Transport(format!("failed to send request: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::Malformed(format!("failed to parse Ollama response: {}", e))
            })?;

        Ok(chat_response.message.content)
    }
}

#[async_trait]
impl RemoteInsights for OllamaInsights {
    fn name(&self) -> &str {
        &self.config.model_name
    }

    async fn generate(&self, request: &InsightRequest<'_>) -> Result<Insights, ProviderError> {
        let prompt = build_prompt(request);
        debug!("Sending insight prompt ({} chars)", prompt.len());
        let content = self.send_prompt(prompt).await?;
        parse_insights(&content)
    }
}

/// Build the user prompt for an assessment.
pub fn build_prompt(request: &InsightRequest<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyze this AI use case assessment and provide insights:\n\n");
    prompt.push_str(&format!("Use Case: {}\n", request.use_case.name));
    prompt.push_str(&format!(
        "Description: {}\n",
        request.use_case.description.as_deref().unwrap_or("N/A")
    ));
    prompt.push_str(&format!(
        "Normalized Score: {}/100\n\n",
        request.normalized_score
    ));

    prompt.push_str("Category Scores:\n");
    for (category, score) in request.category_scores {
        prompt.push_str(&format!("- {}: {}/100\n", category, score.normalized));
    }

    prompt.push_str("\nTop Strengths (score 4-5):\n");
    for s in strengths(request.scores, request.top_n) {
        prompt.push_str(&format!("- {} ({}/5)\n", s.dimension, s.score));
    }

    prompt.push_str("\nKey Challenges (score 1-2):\n");
    for s in challenges(request.scores, request.top_n) {
        prompt.push_str(&format!("- {} ({}/5)\n", s.dimension, s.score));
    }

    prompt.push_str(
        "\nProvide:\n\
         1. A concise analysis of the overall readiness and viability (2-3 sentences)\n\
         2. Top 3 specific, actionable recommendations to improve this use case's score\n\n\
         Format your response as JSON:\n\
         {\"insights\": \"your analysis here\", \"recommendations\": \
         [\"recommendation 1\", \"recommendation 2\", \"recommendation 3\"]}",
    );

    prompt
}

/// Parse the model's answer into insights.
///
/// Text around the outermost JSON object (such as a code fence) is ignored.
pub fn parse_insights(content: &str) -> Result<Insights, ProviderError> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &content[s..=e],
        _ => {
            return Err(ProviderError::Malformed(
                "response contains no JSON object".to_string(),
            ))
        }
    };

    let payload: InsightPayload = serde_json::from_str(json)
        .map_err(|e| ProviderError::Malformed(format!("unexpected insight shape: {}", e)))?;

    Ok(Insights {
        text: payload.insights,
        recommendations: payload.recommendations,
    })
}

const SYSTEM_PROMPT: &str =
    "You are an AI strategy consultant specializing in enterprise AI implementation. \
     Answer only with a JSON object.";
