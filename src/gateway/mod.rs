//! AI gateway module for PodAI.
//!
//! This module provides:
//! * [`AiGateway`] — async trait over the three provider operations
//!   (transcribe, transform, chat reply).
//! * [`GeminiClient`] — Gemini REST implementation of the trait.
//! * [`ChatSession`] — stateful conversational session for one
//!   transcript + persona pair.
//! * [`prompt`] — the fixed transcription instruction and the transform /
//!   chat prompt builders.
//! * [`GatewayError`] — error variants for provider operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use podai::config::AppConfig;
//! use podai::gateway::{AiGateway, GeminiClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GeminiClient::from_config(&config.gateway);
//!
//!     let transcript = client
//!         .transcribe("bW9jayBhdWRpbw==", "audio/mpeg")
//!         .await
//!         .unwrap();
//!     println!("{}", transcript);
//! }
//! ```

pub mod chat;
pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::{ChatRole, ChatSession, ChatTurn};
pub use client::{AiGateway, GatewayError, GeminiClient};
