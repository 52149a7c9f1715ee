use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{PlannerError, Result};

/// Minimal OpenAI-compatible chat-completions client. One attempt per call.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                PlannerError::ProviderUnavailable(format!("Failed to build HTTP client: {err}"))
            })?;

        let request_url = build_chat_url(&self.base_url);
        debug!(target: "trip_planner::http", url = %request_url, "sending chat completion");

        let response = client
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "trip-planner-rs")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    PlannerError::Timeout(format!("chat completion timed out: {err}"))
                } else {
                    PlannerError::Provider(format!("HTTP request failed: {err}"))
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Provider(format!("Failed to read response: {err}")))?;

        let response_json: Option<Value> = serde_json::from_str(&response_text).ok();

        if !status.is_success() {
            let api_message = response_json
                .as_ref()
                .and_then(|json| json.get("error"))
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or(response_text);

            return Err(PlannerError::Provider(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        let response_json = response_json.ok_or_else(|| {
            PlannerError::ResponseDecode("provider returned a body that is not JSON".to_string())
        })?;

        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(PlannerError::Provider(format!("API error: {}", error_message)));
        }

        Ok(response_json)
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            response_format: None,
        }
    }

    /// System + user message pair
    pub fn from_prompt(model: impl Into<String>, system: &str, user: &str) -> Self {
        Self::new(
            model,
            vec![
                json!({ "role": "system", "content": system }),
                json!({ "role": "user", "content": user }),
            ],
        )
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    /// `{"type": "json_object"}`
    pub fn with_json_object_mode(self) -> Self {
        self.with_response_format(json!({ "type": "json_object" }))
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            // widen through the decimal form so 0.7 stays 0.7 on the wire
            let rounded: f64 = format!("{}", temperature).parse().unwrap_or(temperature as f64);
            body["temperature"] = json!(rounded);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}

/// Token usage information from the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Assistant text and usage pulled out of a chat-completions response
#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl RawCompletion {
    pub fn from_response(response: &Value) -> Result<Self> {
        let choices = response
            .get("choices")
            .and_then(|value| value.as_array())
            .ok_or_else(|| {
                PlannerError::ResponseDecode(
                    "Missing 'choices' array in completion response".to_string(),
                )
            })?;

        let first_choice = choices.first().ok_or_else(|| {
            PlannerError::ResponseDecode("Completion response contained no choices".to_string())
        })?;

        let text = first_choice
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                PlannerError::ResponseDecode(
                    "Completion response missing assistant message content".to_string(),
                )
            })?
            .to_string();

        let usage = response.get("usage").and_then(|usage| {
            Some(TokenUsage {
                prompt_tokens: usage.get("prompt_tokens")?.as_u64()? as u32,
                completion_tokens: usage.get("completion_tokens")?.as_u64()? as u32,
                total_tokens: usage.get("total_tokens")?.as_u64()? as u32,
            })
        });

        Ok(Self { text, usage })
    }
}
