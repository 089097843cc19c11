use async_trait::async_trait;
use dtk_core::{CompletionRequest, DtkError, Llm, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
const DEFAULT_MODEL: &str = "qwen2.5-32b-instruct";

/// Chat model served over an OpenAI-compatible `/chat/completions` endpoint.
///
/// The default configuration targets the Qwen deployment the translation
/// service runs against; `with_base_url`/`with_model` point it anywhere that
/// speaks the same protocol.
pub struct OpenAiModel {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from `DTK_API_KEY`, honoring `DTK_BASE_URL` and `DTK_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DTK_API_KEY")
            .map_err(|_| DtkError::Config("DTK_API_KEY not set".to_string()))?;
        let mut model = Self::new(api_key);
        if let Ok(base_url) = std::env::var("DTK_BASE_URL") {
            model = model.with_base_url(base_url);
        }
        if let Ok(name) = std::env::var("DTK_MODEL") {
            model = model.with_model(name);
        }
        Ok(model)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl Llm for OpenAiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = req.system.as_deref() {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: &req.prompt });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(model = %self.model, prompt_len = req.prompt.len(), "chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest { model: &self.model, messages })
            .send()
            .await
            .map_err(|e| DtkError::Model(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DtkError::Model(format!("upstream returned {}: {}", status, body)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DtkError::Model(format!("invalid response body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DtkError::Model("response contained no choices".to_string()))
    }
}
