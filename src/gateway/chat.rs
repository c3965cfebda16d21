//! Stateful chat session against the provider.
//!
//! A [`ChatSession`] is pre-seeded with a system instruction fixing the
//! persona's identity and the transcript as grounding context. Each
//! [`send`](ChatSession::send) relays the full turn history plus the new
//! message; the user/model turn pair is appended only when the provider
//! answered, so a failed turn leaves the session context unchanged.

use std::sync::Arc;

use crate::gateway::client::{AiGateway, GatewayError};
use crate::gateway::prompt;
use crate::persona::Persona;

// ---------------------------------------------------------------------------
// ChatTurn
// ---------------------------------------------------------------------------

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the provider-side conversation context.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

/// A conversational session scoped to one transcript + persona pair.
pub struct ChatSession {
    gateway: Arc<dyn AiGateway>,
    system_instruction: String,
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Open a session grounded in `transcript`, speaking as `persona`.
    pub fn open(gateway: Arc<dyn AiGateway>, transcript: &str, persona: &Persona) -> Self {
        Self {
            gateway,
            system_instruction: prompt::chat_system_instruction(transcript, persona),
            turns: Vec::new(),
        }
    }

    /// Send one user message and return the model's reply.
    ///
    /// On success the session's turn history grows by exactly two entries
    /// (user, then model). On failure it does not grow at all.
    pub async fn send(&mut self, text: &str) -> Result<String, GatewayError> {
        let reply = self
            .gateway
            .chat_reply(&self.system_instruction, &self.turns, text)
            .await?;

        self.turns.push(ChatTurn {
            role: ChatRole::User,
            text: text.to_string(),
        });
        self.turns.push(ChatTurn {
            role: ChatRole::Model,
            text: reply.clone(),
        });

        Ok(reply)
    }

    /// The seeded system instruction.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Number of accumulated turns (user and model counted separately).
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Echoes chat messages back with a prefix; other operations unused.
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

    /// Always fails the chat turn.
    struct FailingGateway;

    #[async_trait]
    impl AiGateway for FailingGateway {
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
            Err(GatewayError::Timeout)
        }
    }

    fn comedian() -> &'static Persona {
        persona::find("comedian").expect("comedian exists")
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn open_seeds_system_instruction() {
        let session = ChatSession::open(Arc::new(EchoGateway), "the transcript", comedian());

        assert!(session.system_instruction().contains("The Stand-Up"));
        assert!(session.system_instruction().contains("the transcript"));
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn successful_send_grows_history_by_two() {
        let mut session = ChatSession::open(Arc::new(EchoGateway), "t", comedian());

        let reply = session.send("hello").await.expect("reply");
        assert_eq!(reply, "re: hello");
        assert_eq!(session.turn_count(), 2);

        let reply = session.send("again").await.expect("reply");
        assert_eq!(reply, "re: again");
        assert_eq!(session.turn_count(), 4);
    }

    #[tokio::test]
    async fn failed_send_leaves_history_unchanged() {
        let mut session = ChatSession::open(Arc::new(FailingGateway), "t", comedian());

        assert!(session.send("hello").await.is_err());
        assert_eq!(session.turn_count(), 0);
    }
}
