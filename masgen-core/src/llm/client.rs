//! HTTP client for OpenAI-compatible chat completions endpoints.

use super::request::{LlmRequest, LlmResponse};
use super::LanguageModel;
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::utils::truncate;
use async_trait::async_trait;
use serde_json::json;

/// Language model backed by an OpenAI-compatible `chat/completions` API.
///
/// Works with OpenRouter, OpenAI, DeepSeek, vLLM, and any other endpoint
/// implementing that format. The per-request timeout, model identifier,
/// token limit, and temperature come from [`LlmConfig`].
pub struct HttpLlm {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

impl std::fmt::Debug for HttpLlm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLlm")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpLlm {
    /// Create a client for the given endpoint settings.
    pub fn new(api_key: impl Into<String>, config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key: api_key.into(),
        }
    }

    /// The endpoint settings this client was built with.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn build_body(&self, request: &LlmRequest) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system_instruction {
            messages.push(json!({"role": "system", "content": system}));
        }
        if let Some(schema) = &request.response_format {
            // json_object mode leaves field selection to the model; spelling
            // the schema out in a system message pins it down.
            messages.push(json!({
                "role": "system",
                "content": format!(
                    "Respond only with a JSON object conforming to this schema:\n{}",
                    schema
                ),
            }));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });
        if request.response_format.is_some() {
            body["response_format"] = json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait]
impl LanguageModel for HttpLlm {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.build_body(&request);
        log::debug!(
            "Invoking {} ({} prompt chars)",
            self.config.model,
            request.prompt.chars().count()
        );

        let send = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        let response = tokio::time::timeout(self.config.timeout, send)
            .await
            .map_err(|_| LlmError::Timeout(self.config.timeout.as_millis() as u64))??;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: truncate(&message, 300),
            });
        }

        let value: serde_json::Value = response.json().await?;
        let text = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::NoContent)?
            .to_string();

        Ok(LlmResponse::new(text))
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
