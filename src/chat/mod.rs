//! Chat controller — the visible conversation with the active persona.
//!
//! [`ChatController`] owns the append-only message log and the lazily
//! created [`ChatSession`]. Chat failures degrade in place: a failed or
//! empty provider reply becomes a fixed message in the log instead of
//! aborting the workflow, so the rest of the session survives.

use std::sync::Arc;

use chrono::Utc;

use crate::gateway::{AiGateway, ChatRole, ChatSession, GatewayError};
use crate::persona::Persona;

/// Shown when the provider answered but produced no text.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm having trouble thinking of a response right now.";

/// Shown in place of a reply when the chat turn failed outright.
pub const ERROR_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// One entry of the visible chat log.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Time-derived identifier.
    pub id: String,
    /// Who wrote the message.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// ChatController
// ---------------------------------------------------------------------------

/// Manages the conversational sub-session scoped to one result + persona.
///
/// The session is created on first activation and torn down (via
/// [`clear`](Self::clear)) whenever the underlying result or persona
/// changes, including loading a history item or generating a new result.
pub struct ChatController {
    messages: Vec<ChatMessage>,
    session: Option<ChatSession>,
    loading: bool,
}

impl ChatController {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            session: None,
            loading: false,
        }
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Create the chat session if none exists yet.
    ///
    /// Idempotent: a second activation for the same result reuses the
    /// existing session. Callers only invoke this once a result exists and a
    /// persona is selected.
    pub fn activate(&mut self, gateway: Arc<dyn AiGateway>, transcript: &str, persona: &Persona) {
        if self.session.is_some() {
            return;
        }
        log::debug!("chat: opening session as {}", persona.id);
        self.session = Some(ChatSession::open(gateway, transcript, persona));
    }

    /// Drop the session and the message log.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.session = None;
        self.loading = false;
    }

    // -----------------------------------------------------------------------
    // Sending
    // -----------------------------------------------------------------------

    /// Send one user message.
    ///
    /// The user message is appended immediately (before the provider is
    /// awaited) and is never lost or duplicated. The model's reply is
    /// appended after it; a failed turn appends [`ERROR_APOLOGY`] and an
    /// empty reply appends [`EMPTY_REPLY_FALLBACK`]. Sends are ignored while
    /// a reply is pending or when no session is active.
    pub async fn send(&mut self, text: &str) {
        if self.loading {
            log::debug!("chat: ignoring send while a reply is pending");
            return;
        }
        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                log::debug!("chat: no active session; message dropped");
                return;
            }
        };

        let sent_at = Utc::now().timestamp_millis();
        self.messages.push(ChatMessage {
            id: sent_at.to_string(),
            role: ChatRole::User,
            text: text.to_string(),
            timestamp: sent_at,
        });
        self.loading = true;

        let outcome = session.send(text).await;
        self.session = Some(session);

        let reply_text = match outcome {
            Ok(reply) => reply,
            Err(GatewayError::EmptyResponse) => {
                log::warn!("chat: provider returned no text");
                EMPTY_REPLY_FALLBACK.to_string()
            }
            Err(e) => {
                log::warn!("chat: turn failed: {e}");
                ERROR_APOLOGY.to_string()
            }
        };

        self.messages.push(ChatMessage {
            id: (sent_at + 1).to_string(),
            role: ChatRole::Model,
            text: reply_text,
            timestamp: Utc::now().timestamp_millis(),
        });
        self.loading = false;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The message log, in send/receive order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is currently pending.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a session has been activated.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ChatTurn;
    use crate::persona;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct EchoGateway;

    #[async_trait]
    impl AiGateway for EchoGateway {
        async fn transcribe(&self, _b64: &str, _mime: &str) -> Result<String, GatewayError> {
            unreachable!("not exercised")
        }

        async fn transform(
            &self,
            _transcript: &str,
            _persona: &Persona,
        ) -> Result<String, GatewayError> {
            unreachable!("not exercised")
        }

        async fn chat_reply(
            &self,
            _system: &str,
            _turns: &[ChatTurn],
            message: &str,
        ) -> Result<String, GatewayError> {
            Ok(format!("re: {message}"))
        }
    }

    /// Fails every chat turn with the given error kind.
    struct BrokenGateway {
        empty: bool,
    }

    #[async_trait]
    impl AiGateway for BrokenGateway {
        async fn transcribe(&self, _b64: &str, _mime: &str) -> Result<String, GatewayError> {
            Err(GatewayError::Timeout)
        }

        async fn transform(
            &self,
            _transcript: &str,
            _persona: &Persona,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::Timeout)
        }

        async fn chat_reply(
            &self,
            _system: &str,
            _turns: &[ChatTurn],
            _message: &str,
        ) -> Result<String, GatewayError> {
            if self.empty {
                Err(GatewayError::EmptyResponse)
            } else {
                Err(GatewayError::Request("connection refused".into()))
            }
        }
    }

    fn comedian() -> &'static Persona {
        persona::find("comedian").expect("comedian exists")
    }

    fn activated(gateway: Arc<dyn AiGateway>) -> ChatController {
        let mut chat = ChatController::new();
        chat.activate(gateway, "the transcript", comedian());
        chat
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn starts_without_session_or_messages() {
        let chat = ChatController::new();
        assert!(!chat.has_session());
        assert!(chat.messages().is_empty());
        assert!(!chat.is_loading());
    }

    #[test]
    fn activate_is_lazy_and_idempotent() {
        let mut chat = ChatController::new();
        chat.activate(Arc::new(EchoGateway), "t", comedian());
        assert!(chat.has_session());

        // Second activation must not replace the session.
        chat.activate(Arc::new(EchoGateway), "other", comedian());
        assert!(chat.has_session());
    }

    #[tokio::test]
    async fn send_appends_user_then_model() {
        let mut chat = activated(Arc::new(EchoGateway));

        chat.send("hello there").await;

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].text, "hello there");
        assert_eq!(messages[1].role, ChatRole::Model);
        assert_eq!(messages[1].text, "re: hello there");
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn messages_stay_in_send_order() {
        let mut chat = activated(Arc::new(EchoGateway));

        chat.send("one").await;
        chat.send("two").await;

        let texts: Vec<_> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "re: one", "two", "re: two"]);
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_message_and_apologises() {
        let mut chat = activated(Arc::new(BrokenGateway { empty: false }));

        chat.send("does this work?").await;

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].text, "does this work?");
        assert_eq!(messages[1].role, ChatRole::Model);
        assert_eq!(messages[1].text, ERROR_APOLOGY);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn empty_reply_uses_fallback_text() {
        let mut chat = activated(Arc::new(BrokenGateway { empty: true }));

        chat.send("anything?").await;

        assert_eq!(chat.messages()[1].text, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn send_without_session_is_dropped() {
        let mut chat = ChatController::new();
        chat.send("into the void").await;
        assert!(chat.messages().is_empty());
    }

    #[tokio::test]
    async fn clear_drops_session_and_log() {
        let mut chat = activated(Arc::new(EchoGateway));
        chat.send("hello").await;

        chat.clear();

        assert!(chat.messages().is_empty());
        assert!(!chat.has_session());
        assert!(!chat.is_loading());
    }
}
