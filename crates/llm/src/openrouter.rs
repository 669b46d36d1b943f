//! Concrete [`CompletionProvider`] talking to OpenRouter's chat-completions
//! endpoint (§6 "LLM capability contract"). The adapter layer above this
//! (cache, retry, preprocessing) is provider-agnostic; this is the one
//! piece that knows about HTTP and a specific wire format.

use crate::error::{classify_message, LlmError};
use crate::provider::CompletionProvider;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

pub struct OpenRouterConfig {
    pub api_key: String,
    pub model: String,
    pub provider: Option<String>,
    pub provider_order: Option<Vec<String>>,
    pub allow_fallbacks: bool,
    pub require_parameters: bool,
}

pub struct OpenRouterProvider {
    client: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client builds with default TLS backend");
        Self { client, config }
    }

    fn provider_routing(&self) -> Option<Value> {
        if self.config.provider.is_none() && self.config.provider_order.is_none() {
            return None;
        }
        let mut routing = serde_json::Map::new();
        if let Some(order) = &self.config.provider_order {
            routing.insert("order".to_string(), json!(order));
        } else if let Some(provider) = &self.config.provider {
            routing.insert("order".to_string(), json!([provider]));
        }
        routing.insert("allow_fallbacks".to_string(), json!(self.config.allow_fallbacks));
        routing.insert("require_parameters".to_string(), json!(self.config.require_parameters));
        Some(Value::Object(routing))
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
        });
        if let Some(routing) = self.provider_routing() {
            body["provider"] = routing;
        }

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_message(&e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| classify_message(&e.to_string()))?;
        if !status.is_success() {
            return Err(classify_message(&format!("{status}: {text}")));
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| LlmError::Fatal(format!("malformed openrouter response: {e}")))?;
        value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LlmError::Fatal("openrouter response missing choices[0].message.content".to_string()))
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        system: Option<&str>,
        schema_hint: &str,
    ) -> Result<String, LlmError> {
        let augmented = format!("{prompt}\n\nRespond with JSON matching this shape:\n{schema_hint}");
        self.complete(&augmented, system).await
    }
}
