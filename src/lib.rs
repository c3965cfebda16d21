//! PodAI — transform audio recordings into persona-styled podcast scripts.
//!
//! The library drives a small workflow against the Gemini API: an uploaded
//! audio file is transcribed, the transcript is rewritten in one of six
//! fixed personas, and the user can then chat with that persona about the
//! content. Completed transformations are kept in a local JSON history.
//!
//! # Modules
//!
//! * [`workflow`] — the state machine owning the authoritative session state.
//! * [`gateway`] — the `AiGateway` trait, the Gemini REST client, prompts,
//!   and the chat session.
//! * [`chat`] — the visible chat log with graceful in-place degradation.
//! * [`history`] — the persisted, capped list of past transformations.
//! * [`persona`] — the fixed persona catalog.
//! * [`upload`] — audio file validation and payload loading.
//! * [`export`] — rendering of the history archive and script downloads.
//! * [`config`] — settings, defaults, and platform paths.

pub mod chat;
pub mod config;
pub mod export;
pub mod gateway;
pub mod history;
pub mod persona;
pub mod upload;
pub mod workflow;
