//! OpenAI-compatible chat-completions backend with streamed responses.
//!
//! Serves both local servers (LM Studio, llama.cpp, Ollama's `/v1`) and hosted
//! APIs that require a bearer token (OpenRouter, Groq).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::diff::StagedDiff;
use crate::commit::message::CommitMessage;
use crate::commit::prompt::build_user_prompt;
use crate::error::{BackendError, ParseError, TransportError};
use crate::llm::backend::{Backend, ProgressSink};
use crate::llm::extract::extract_last_code_block;
use crate::llm::model::ModelId;

use super::stream::{SseDecoder, StreamAccumulator};

/// Upper bound on generated tokens per request.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Identifies this tool to hosted APIs that attribute traffic by app.
const APP_REFERER: &str = "https://github.com/commitcraft/commitcraft";
const APP_TITLE: &str = "commitcraft";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Chat-completions backend, optionally authenticated.
#[derive(Debug, Clone)]
pub struct ChatCompletionsBackend {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
}

impl ChatCompletionsBackend {
    /// Unauthenticated backend for a local server. Models are discovered via `/models`.
    pub fn local(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Hosted backend using a bearer token. Model discovery is skipped.
    pub fn authenticated(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::local(base_url)
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Read an error body without masking the original status.
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unavailable>".to_string())
}

#[async_trait]
impl Backend for ChatCompletionsBackend {
    async fn list_models(&self) -> Result<Vec<ModelId>, BackendError> {
        if self.is_authenticated() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("models");
        debug!("Listing models from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = error_body(response).await;
            return Err(TransportError::HttpStatus { status, body }.into());
        }

        let text = response.text().await.map_err(TransportError::Stream)?;
        let list: ModelList =
            serde_json::from_str(&text).map_err(|e| ParseError::ModelList(e.to_string()))?;

        Ok(list
            .data
            .into_iter()
            .filter_map(|entry| ModelId::new(entry.id).ok())
            .collect())
    }

    async fn generate(
        &self,
        diff: &StagedDiff,
        model: &ModelId,
        system_prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CommitMessage, BackendError> {
        let url = self.endpoint("chat/completions");
        let user_prompt = build_user_prompt(diff);

        let body = ChatRequest {
            model: model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
            stream: true,
        };

        debug!(
            "POST {} (model={}, prompt length {} chars)",
            url,
            model,
            user_prompt.len()
        );

        let mut request = self.http.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request
                .bearer_auth(api_key)
                .header("HTTP-Referer", APP_REFERER)
                .header("X-Title", APP_TITLE);
        }

        let mut response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = error_body(response).await;
            return Err(TransportError::HttpStatus { status, body }.into());
        }

        let mut decoder = SseDecoder::new();
        let mut accumulator = StreamAccumulator::new();

        while let Some(chunk) = response.chunk().await.map_err(TransportError::Stream)? {
            for event in decoder.push(&chunk) {
                if let Some(display) = accumulator.push(event) {
                    progress.on_progress(display);
                }
            }
            if accumulator.is_done() {
                break;
            }
        }

        if let Some(event) = decoder.finish()
            && let Some(display) = accumulator.push(event)
        {
            progress.on_progress(display);
        }

        debug!("Streamed response: {} chars", accumulator.full().len());

        let extracted = extract_last_code_block(accumulator.full());
        CommitMessage::new(extracted).map_err(|_| ParseError::EmptyMessage.into())
    }
}
