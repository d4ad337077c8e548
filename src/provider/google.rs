// src/provider/google.rs - Google Generative AI (Gemini) gateway

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::prompt::PersonaPrompt;
use super::GenerationGateway;
use crate::infra::config::GatewayConfig;
use crate::infra::errors::GatewayError;

const GATEWAY_ID: &str = "gemini";

pub struct GeminiGateway {
    api_key: String,
    model: String,
    base_url: String,
    prompt: PersonaPrompt,
    client: reqwest::Client,
}

impl fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("api_key", &"***HIDDEN***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn misconfigured(message: impl Into<String>) -> GatewayError {
    GatewayError::Misconfigured {
        gateway: GATEWAY_ID.into(),
        message: message.into(),
    }
}

impl GeminiGateway {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        prompt: PersonaPrompt,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(misconfigured("API key is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| misconfigured(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prompt,
            client,
        })
    }

    /// Build from config, reading the API key from the configured
    /// environment variable. A missing key is a startup error.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            misconfigured(format!(
                "{} environment variable is required",
                config.api_key_env
            ))
        })?;

        let prompt = match config.persona {
            Some(ref template) => PersonaPrompt::new(template.clone())?,
            None => PersonaPrompt::default(),
        };

        Self::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            prompt,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Gemini request body: a single user turn holding the rendered prompt.
    fn build_request_body(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                { "parts": [{ "text": prompt }] }
            ]
        })
    }
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn extract_text(resp: &serde_json::Value) -> Result<String, GatewayError> {
    let parts = resp["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| GatewayError::InvalidResponse {
            gateway: GATEWAY_ID.into(),
            message: "response has no candidates".into(),
        })?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(GatewayError::InvalidResponse {
            gateway: GATEWAY_ID.into(),
            message: "candidate contains no text".into(),
        });
    }
    Ok(text)
}

/// Map a non-success HTTP status to a gateway error.
fn status_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
    match status.as_u16() {
        400 => GatewayError::Rejected {
            gateway: GATEWAY_ID.into(),
            status: 400,
            message: format!("configuration error: {body}"),
        },
        403 => GatewayError::Rejected {
            gateway: GATEWAY_ID.into(),
            status: 403,
            message: format!("access denied: {body}"),
        },
        _ => GatewayError::Unavailable {
            gateway: GATEWAY_ID.into(),
            message: format!("HTTP {status}: {body}"),
        },
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    fn id(&self) -> &str {
        GATEWAY_ID
    }

    async fn generate(&self, user_message: &str, context: &str) -> Result<String, GatewayError> {
        let prompt = self
            .prompt
            .render(user_message, context)
            .map_err(|e| misconfigured(format!("failed to render prompt: {e}")))?;

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&Self::build_request_body(&prompt))
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable {
                gateway: GATEWAY_ID.into(),
                // Strip the URL: it carries the API key.
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = status_error(status, &body);
            tracing::warn!(model = %self.model, "Gemini request failed: {}", err);
            return Err(err);
        }

        let resp: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| GatewayError::InvalidResponse {
                    gateway: GATEWAY_ID.into(),
                    message: format!("failed to parse response: {}", e.without_url()),
                })?;

        extract_text(&resp)
    }
}
