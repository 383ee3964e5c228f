//! HTTP chat completion client for OpenAI-compatible providers.

use std::time::Duration;

use async_trait::async_trait;
use engine::{ChatCompletion, CompletionError};
use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpCompletion {
    endpoint: Url,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 1],
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl HttpCompletion {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1/`.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| CompletionError::Transport(format!("invalid base_url: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join("chat/completions")
            .map_err(|err| CompletionError::Transport(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
            http,
        })
    }
}

#[async_trait]
impl ChatCompletion for HttpCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let payload = CompletionRequest {
            model: &self.model,
            messages: [CompletionMessage {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ProviderError>()
                .await
                .map(|err| err.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body = res
            .json::<CompletionResponse>()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::Empty)
    }
}
