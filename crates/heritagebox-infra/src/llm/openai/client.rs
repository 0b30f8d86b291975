//! OpenAiProvider -- concrete [`LlmProvider`] implementation.
//!
//! Sends requests to the OpenAI chat completions API with bearer
//! authentication. The API key is wrapped in [`secrecy::SecretString`] and
//! is never logged or included in Debug output. An unset key yields
//! `AuthenticationFailed` without a network call, so a misconfigured
//! deployment fails the same way a rejected credential does.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use heritagebox_core::llm::provider::LlmProvider;
use heritagebox_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

use super::types::{OpenAiMessage, OpenAiRequest, OpenAiResponse};

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl OpenAiProvider {
    /// The client timeout is a backstop; the assembler imposes the real
    /// per-call deadline.
    const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::CLIENT_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into the OpenAI shape.
    /// System instructions become the leading `system` message.
    fn to_openai_request(request: &CompletionRequest) -> OpenAiRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OpenAiMessage {
                role: MessageRole::System.to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| OpenAiMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));

        OpenAiRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let Some(api_key) = &self.api_key else {
            return Err(LlmError::AuthenticationFailed);
        };

        let body = Self::to_openai_request(request);
        let response = self
            .client
            .post(self.url("/v1/chat/completions"))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                500..=599 => LlmError::Overloaded(format!("HTTP {status}: {error_body}")),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let openai_resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = openai_resp
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                LlmError::Deserialization("response contained no message content".to_string())
            })?;

        Ok(CompletionResponse {
            id: openai_resp.id,
            content: content.to_string(),
            model: openai_resp.model,
        })
    }
}
