use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[a-zA-Z]*\s*").expect("CODE_FENCE is a valid regex pattern")
});

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct AiClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl AiClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.ai_api_key.expose_secret())
            .with_api_base(&config.ai_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.ai_model.clone(),
            timeout: Duration::from_secs(config.ai_timeout_seconds),
        }
    }

    /// Sends one system + user exchange and returns the reply text.
    pub async fn complete(&self, system: &str, prompt: &str) -> AppResult<String> {
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.4
        });

        let response: Value =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(request))
                .await
                .map_err(|_| {
                    AppError::UpstreamFailure(format!(
                        "AI request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                })??;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::UpstreamFailure("AI response had no content".to_string()))
    }
}

/// Removes markdown code fences models like to wrap JSON in.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}
