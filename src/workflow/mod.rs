//! Workflow module for PodAI.
//!
//! This module wires the full upload → transcribe → review → select →
//! generate → result sequence and owns the authoritative application state.
//!
//! # Architecture
//!
//! ```text
//! terminal driver (main.rs)
//!        │  events valid for the current stage
//!        ▼
//! Workflow ─────────▶ AiGateway (transcribe / transform, awaited)
//!    │                      │
//!    │◀── resolved value ───┘   stage transitions only on the result
//!    │
//!    ├─ HistoryStore   persisted on successful generation
//!    └─ ChatController  active while the Result stage is shown
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use podai::config::AppConfig;
//! use podai::gateway::GeminiClient;
//! use podai::history::HistoryStore;
//! use podai::workflow::Workflow;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let gateway = Arc::new(GeminiClient::from_config(&config.gateway));
//!     let history = HistoryStore::load_or_default();
//!
//!     let mut workflow = Workflow::new(gateway, history, &config.upload);
//!     workflow.upload_file(Path::new("meeting.mp3")).await.unwrap();
//!     workflow.select_persona("comedian").unwrap();
//!     workflow.generate().await.unwrap();
//! }
//! ```

pub mod machine;
pub mod stage;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use machine::{PodcastResult, Workflow, WorkflowError};
pub use stage::AppStage;
