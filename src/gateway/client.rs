//! Core `AiGateway` trait and the Gemini REST implementation.
//!
//! `GeminiClient` calls the `models/{model}:generateContent` endpoint of the
//! Gemini API. All connection details come from [`GatewayConfig`]; the API
//! key falls back to the `GEMINI_API_KEY` environment variable when the
//! config leaves it unset.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::gateway::chat::{ChatRole, ChatTurn};
use crate::gateway::prompt;
use crate::persona::Persona;

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// Errors that can occur when talking to the provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key in the config and no `GEMINI_API_KEY` in the environment.
    #[error("API key not found in configuration or GEMINI_API_KEY")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The provider answered with a non-success status code.
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The provider returned a response with no usable text content.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AiGateway trait
// ---------------------------------------------------------------------------

/// Async trait over the three provider operations.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn AiGateway>` between the workflow and the chat session.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Transcribe a base64-encoded audio payload into plain text.
    async fn transcribe(
        &self,
        audio_base64: &str,
        mime_type: &str,
    ) -> Result<String, GatewayError>;

    /// Rewrite `transcript` in the style of `persona`.
    async fn transform(
        &self,
        transcript: &str,
        persona: &Persona,
    ) -> Result<String, GatewayError>;

    /// Produce one chat reply given the session's system instruction, the
    /// prior turns, and the new user message.
    async fn chat_reply(
        &self,
        system_instruction: &str,
        turns: &[ChatTurn],
        message: &str,
    ) -> Result<String, GatewayError>;
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

fn transcribe_body(audio_base64: &str, mime_type: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": mime_type, "data": audio_base64 } },
                { "text": prompt::TRANSCRIBE_INSTRUCTION }
            ]
        }]
    })
}

fn transform_body(transcript: &str, persona: &Persona, thinking_budget: u32) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{ "text": prompt::transform_prompt(transcript, persona) }]
        }],
        "generationConfig": {
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    })
}

fn chat_body(system_instruction: &str, turns: &[ChatTurn], message: &str) -> serde_json::Value {
    let mut contents: Vec<serde_json::Value> = turns
        .iter()
        .map(|turn| {
            serde_json::json!({
                "role": match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                },
                "parts": [{ "text": turn.text }]
            })
        })
        .collect();
    contents.push(serde_json::json!({
        "role": "user",
        "parts": [{ "text": message }]
    }));

    serde_json::json!({
        "systemInstruction": { "parts": [{ "text": system_instruction }] },
        "contents": contents
    })
}

/// Pull the candidate text out of a `generateContent` response.
///
/// A response with no candidate text at all maps to `EmptyResponse`, matching
/// the "no transcription/content generated" failure of the app.
fn extract_text(json: &serde_json::Value) -> Result<String, GatewayError> {
    let parts = &json["candidates"][0]["content"]["parts"];

    let text: String = parts
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Calls the Gemini `models/{model}:generateContent` REST endpoint.
///
/// Two model tiers are used: the fast multimodal tier for transcription and
/// chat (latency-sensitive paths), and the higher-quality tier for the
/// one-shot creative transformation where output quality matters more than
/// latency.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GeminiClient {
    /// Build a `GeminiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Resolve the API key: config first, then `GEMINI_API_KEY`.
    fn api_key(&self) -> Result<String, GatewayError> {
        if let Some(key) = self.config.api_key.as_deref() {
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(GatewayError::MissingApiKey),
        }
    }

    /// POST `body` to `models/{model}:generateContent` and return the
    /// candidate text.
    async fn generate(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<String, GatewayError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        extract_text(&json)
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    async fn transcribe(
        &self,
        audio_base64: &str,
        mime_type: &str,
    ) -> Result<String, GatewayError> {
        log::debug!("gateway: transcribe ({mime_type}, {} b64 chars)", audio_base64.len());
        self.generate(
            &self.config.transcribe_model,
            transcribe_body(audio_base64, mime_type),
        )
        .await
    }

    async fn transform(
        &self,
        transcript: &str,
        persona: &Persona,
    ) -> Result<String, GatewayError> {
        log::debug!("gateway: transform as {}", persona.id);
        self.generate(
            &self.config.transform_model,
            transform_body(transcript, persona, self.config.thinking_budget),
        )
        .await
    }

    async fn chat_reply(
        &self,
        system_instruction: &str,
        turns: &[ChatTurn],
        message: &str,
    ) -> Result<String, GatewayError> {
        log::debug!("gateway: chat turn ({} prior turns)", turns.len());
        self.generate(
            &self.config.chat_model,
            chat_body(system_instruction, turns, message),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona;

    fn comedian() -> &'static Persona {
        persona::find("comedian").expect("comedian exists")
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = GeminiClient::from_config(&GatewayConfig::default());
    }

    /// Verify that `GeminiClient` is object-safe (usable as `dyn AiGateway`).
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn AiGateway> =
            Box::new(GeminiClient::from_config(&GatewayConfig::default()));
        drop(client);
    }

    // ---- request bodies ---

    #[test]
    fn transcribe_body_pairs_audio_with_instruction() {
        let body = transcribe_body("QUJD", "audio/mpeg");
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/mpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .contains("verbatim transcription"));
    }

    #[test]
    fn transform_body_carries_thinking_budget() {
        let body = transform_body("hello", comedian(), 1024);

        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            1024
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("The Stand-Up"));
    }

    #[test]
    fn chat_body_appends_new_message_last() {
        let turns = vec![
            ChatTurn {
                role: ChatRole::User,
                text: "first question".into(),
            },
            ChatTurn {
                role: ChatRole::Model,
                text: "first answer".into(),
            },
        ];
        let body = chat_body("be the comedian", &turns, "second question");
        let contents = body["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "second question");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "be the comedian"
        );
    }

    // ---- response parsing ---

    #[test]
    fn extract_text_reads_candidate_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        });
        assert_eq!(extract_text(&json).unwrap(), "Hello world");
    }

    #[test]
    fn extract_text_trims_whitespace() {
        let json = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  padded  " }] } }]
        });
        assert_eq!(extract_text(&json).unwrap(), "padded");
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(matches!(
            extract_text(&json),
            Err(GatewayError::EmptyResponse)
        ));
    }

    #[test]
    fn blank_text_is_empty_response() {
        let json = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert!(matches!(
            extract_text(&json),
            Err(GatewayError::EmptyResponse)
        ));
    }
}
