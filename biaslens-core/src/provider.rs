//! Chat-completion provider and the two-call turn pipeline.
//!
//! [`Provider`] is the seam between the pipeline and the network: the TUI
//! passes an [`AnthropicClient`], tests pass a scripted fake. Credentials live
//! in the [`ClientConfig`] handed to the client, never in global state.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::critique::parse_critique;
use crate::error::{Error, ProviderError};
use crate::prompts::{critique_request, ANSWERER_SYSTEM_PROMPT, CRITIC_SYSTEM_PROMPT};
use crate::turn::TurnUpdate;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// An API key held in memory only. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a trimmed key. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let key = raw.trim();
        (!key.is_empty()).then(|| Self(key.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Everything a client needs to reach the provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// The two provider calls a turn makes.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Answers `question` in plain text.
    async fn answer(&self, question: &str) -> Result<String, ProviderError>;

    /// Critiques `answer`. Returns the raw payload, expected to hold JSON.
    async fn critique(&self, question: &str, answer: &str) -> Result<String, ProviderError>;
}

/// Sampling settings for one call.
#[derive(Debug, Clone, Copy)]
struct CallSettings {
    max_tokens: u32,
    temperature: f32,
    system: &'static str,
}

const ANSWER_CALL: CallSettings = CallSettings {
    max_tokens: 2048,
    temperature: 0.7,
    system: ANSWERER_SYSTEM_PROMPT,
};

const CRITIQUE_CALL: CallSettings = CallSettings {
    max_tokens: 4096,
    temperature: 0.3,
    system: CRITIC_SYSTEM_PROMPT,
};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { config, http })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, call: CallSettings, user: &str) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: call.max_tokens,
            temperature: call.temperature,
            system: call.system,
            messages: vec![RequestMessage { role: "user", content: user }],
        };

        let response = self
            .http
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|e| e.error.message);
            return Err(error_for_status(status.as_u16(), message));
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        first_text(payload)
    }
}

#[async_trait]
impl Provider for AnthropicClient {
    async fn answer(&self, question: &str) -> Result<String, ProviderError> {
        self.complete(ANSWER_CALL, question).await
    }

    async fn critique(&self, question: &str, answer: &str) -> Result<String, ProviderError> {
        self.complete(CRITIQUE_CALL, &critique_request(question, answer)).await
    }
}

/// Maps an unsuccessful HTTP status to a provider error.
pub fn error_for_status(status: u16, message: Option<String>) -> ProviderError {
    match status {
        401 => ProviderError::InvalidCredentials,
        429 => ProviderError::RateLimited,
        400 => ProviderError::BadRequest,
        other => ProviderError::Other(
            message.unwrap_or_else(|| format!("unexpected status {other}")),
        ),
    }
}

fn first_text(payload: MessagesResponse) -> Result<String, ProviderError> {
    payload
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| ProviderError::Other("No text content in response".to_owned()))
}

/// Runs one turn: answer, then critique, reporting each step through `report`.
///
/// The calls are sequential because the critique needs the answer. A failed
/// call reports [`TurnUpdate::Failed`] and stops; an unparseable critique
/// still completes the turn with an empty critique.
pub async fn run_turn<P>(provider: &P, question: &str, mut report: impl FnMut(TurnUpdate))
where
    P: Provider + ?Sized,
{
    report(TurnUpdate::Answering);
    let answer = match provider.answer(question).await {
        Ok(answer) => answer,
        Err(err) => {
            warn!(error = %err, "answer call failed");
            report(TurnUpdate::Failed(err.to_string()));
            return;
        }
    };
    debug!(bytes = answer.len(), "answer received");
    report(TurnUpdate::Answered(answer.clone()));

    match provider.critique(question, &answer).await {
        Ok(payload) => {
            let critique = parse_critique(&payload, &answer);
            info!(segments = critique.segments.len(), "turn complete");
            report(TurnUpdate::Critiqued(critique));
        }
        Err(err) => {
            warn!(error = %err, "critique call failed");
            report(TurnUpdate::Failed(err.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_typed_failures() {
        assert_eq!(error_for_status(401, None), ProviderError::InvalidCredentials);
        assert_eq!(error_for_status(429, None), ProviderError::RateLimited);
        assert_eq!(error_for_status(400, Some("bad".into())), ProviderError::BadRequest);
        assert_eq!(
            error_for_status(529, Some("Overloaded".into())).to_string(),
            "API error: Overloaded"
        );
    }

    #[test]
    fn first_text_block_wins() {
        let payload: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"tool_use"},{"type":"text","text":"hi"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(payload).unwrap(), "hi");
    }

    #[test]
    fn missing_text_is_reported() {
        let payload: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(
            first_text(payload).unwrap_err().to_string(),
            "API error: No text content in response"
        );
    }

    #[test]
    fn api_key_is_redacted_and_trimmed() {
        let key = ApiKey::new("  sk-secret \n").unwrap();
        assert_eq!(key.expose(), "sk-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(****)");
        assert!(ApiKey::new("   ").is_none());
    }
}
