//! Workflow state machine — drives the upload → transcribe → review →
//! select → generate → result sequence.
//!
//! [`Workflow`] is the explicit context object owning the authoritative
//! application state: the current [`AppStage`], the in-flight session data
//! (audio, transcript, persona, result, error message), the history store,
//! and the chat controller. The view layer holds no state of its own; it
//! renders from here and only issues the events valid for the current stage.
//!
//! Every remote call is awaited and the stage transitions only on the
//! resolved value. A failed transcription or transformation collapses the
//! session to [`AppStage::Error`] with the provider error's message shown
//! verbatim; the only recovery is [`reset`](Workflow::reset). Events invalid
//! for the current stage are refused with a typed error and change nothing.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::chat::{ChatController, ChatMessage};
use crate::config::UploadConfig;
use crate::gateway::AiGateway;
use crate::history::{HistoryItem, HistoryStore};
use crate::persona::{self, Persona};
use crate::upload::{AudioFile, UploadError};

use super::stage::AppStage;

// ---------------------------------------------------------------------------
// PodcastResult
// ---------------------------------------------------------------------------

/// The product of one successful generation. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastResult {
    /// The transcript the transformation was based on.
    pub transcript: String,
    /// The persona-rewritten content.
    pub transformed_content: String,
    /// Id of the persona used; always resolves in the catalog for freshly
    /// generated results.
    pub persona_id: String,
}

// ---------------------------------------------------------------------------
// WorkflowError
// ---------------------------------------------------------------------------

/// Refusals surfaced inline by the workflow.
///
/// None of these change the stage. Remote-call failures are not represented
/// here; they collapse the workflow to [`AppStage::Error`] instead.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The file failed the upload validation policy.
    #[error("{0}")]
    Validation(#[from] UploadError),

    /// The event is not valid for the current stage.
    #[error("cannot {action} during the {stage} stage")]
    InvalidStage {
        action: &'static str,
        stage: AppStage,
    },

    /// The persona id does not resolve in the catalog.
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    /// Generation was confirmed without a selected persona.
    #[error("no persona selected")]
    NoPersonaSelected,

    /// The history id does not resolve to a stored item.
    #[error("no history item with id {0}")]
    UnknownHistoryItem(String),
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The workflow state machine and owner of all session state.
pub struct Workflow {
    stage: AppStage,
    audio: Option<AudioFile>,
    transcript: String,
    selected_persona: Option<&'static Persona>,
    result: Option<PodcastResult>,
    error_message: Option<String>,
    history: HistoryStore,
    chat: ChatController,
    gateway: Arc<dyn AiGateway>,
    max_upload_bytes: u64,
}

impl Workflow {
    /// Create a workflow in the [`AppStage::Upload`] stage.
    pub fn new(gateway: Arc<dyn AiGateway>, history: HistoryStore, upload: &UploadConfig) -> Self {
        Self {
            stage: AppStage::Upload,
            audio: None,
            transcript: String::new(),
            selected_persona: None,
            result: None,
            error_message: None,
            history,
            chat: ChatController::new(),
            gateway,
            max_upload_bytes: upload.max_file_size_bytes(),
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Upload an audio file and transcribe it.
    ///
    /// Validation runs first: a rejected file returns the inline error and
    /// leaves the stage at `Upload`. A valid file enters `Transcribing`; the
    /// resolved transcription moves to `ReviewTranscript` on success or
    /// collapses to `Error` on failure.
    pub async fn upload_file(&mut self, path: &Path) -> Result<(), WorkflowError> {
        self.require_stage(AppStage::Upload, "upload a file")?;

        let audio = AudioFile::load(path, self.max_upload_bytes)?;
        log::info!(
            "workflow: accepted {} ({}, {} bytes)",
            audio.file_name,
            audio.mime_type,
            audio.size_bytes
        );

        self.stage = AppStage::Transcribing;
        let outcome = self
            .gateway
            .transcribe(&audio.base64, &audio.mime_type)
            .await;
        self.audio = Some(audio);

        match outcome {
            Ok(text) => {
                self.transcript = text;
                self.stage = AppStage::ReviewTranscript;
            }
            Err(e) => self.fail(e.to_string()),
        }
        Ok(())
    }

    /// Pick the persona the transcript will be rewritten into.
    ///
    /// Valid while reviewing the transcript; picking again replaces the
    /// previous selection.
    pub fn select_persona(&mut self, id: &str) -> Result<(), WorkflowError> {
        if !matches!(
            self.stage,
            AppStage::ReviewTranscript | AppStage::SelectPersona
        ) {
            return Err(WorkflowError::InvalidStage {
                action: "select a persona",
                stage: self.stage,
            });
        }

        let persona =
            persona::find(id).ok_or_else(|| WorkflowError::UnknownPersona(id.to_string()))?;
        self.selected_persona = Some(persona);
        self.stage = AppStage::SelectPersona;
        Ok(())
    }

    /// Confirm generation: transform the transcript with the selected
    /// persona.
    ///
    /// On success the result is materialised, a history item is persisted
    /// when an uploaded file is present, the chat is cleared, and the stage
    /// becomes `Result`. On failure the workflow collapses to `Error` and no
    /// history item is written.
    pub async fn generate(&mut self) -> Result<(), WorkflowError> {
        self.require_stage(AppStage::SelectPersona, "generate")?;
        let persona = self.selected_persona.ok_or(WorkflowError::NoPersonaSelected)?;

        self.stage = AppStage::Generating;
        match self.gateway.transform(&self.transcript, persona).await {
            Ok(content) => {
                let result = PodcastResult {
                    transcript: self.transcript.clone(),
                    transformed_content: content,
                    persona_id: persona.id.to_string(),
                };

                // Restored sessions have no audio file and are not re-saved.
                if let Some(audio) = &self.audio {
                    self.history.insert(HistoryItem::new(
                        &audio.file_name,
                        persona.id,
                        &result.transcript,
                        &result.transformed_content,
                    ));
                }

                self.result = Some(result);
                self.chat.clear();
                self.stage = AppStage::Result;
            }
            Err(e) => self.fail(e.to_string()),
        }
        Ok(())
    }

    /// Discard the whole session and return to `Upload`.
    ///
    /// This is also the only recovery from the `Error` stage.
    pub fn reset(&mut self) {
        self.stage = AppStage::Upload;
        self.audio = None;
        self.transcript.clear();
        self.selected_persona = None;
        self.result = None;
        self.error_message = None;
        self.chat.clear();
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Restore a stored item, bypassing all intermediate stages.
    ///
    /// Valid from any stage. Restores the transcript and result, selects the
    /// item's persona, clears the audio file and the chat, and lands on
    /// `Result`.
    pub fn load_history(&mut self, id: &str) -> Result<(), WorkflowError> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownHistoryItem(id.to_string()))?;
        self.apply_history_item(&item);
        Ok(())
    }

    /// Restore a random stored item. Returns the loaded id, or `None` when
    /// the history is empty (a no-op, as in the quick-action button).
    pub fn load_random_history(&mut self) -> Option<String> {
        let item = self.history.random()?.clone();
        self.apply_history_item(&item);
        Some(item.id)
    }

    fn apply_history_item(&mut self, item: &HistoryItem) {
        self.selected_persona = persona::find(&item.persona_id);
        self.result = Some(PodcastResult {
            transcript: item.full_transcript.clone(),
            transformed_content: item.transformed_content.clone(),
            persona_id: item.persona_id.clone(),
        });
        // The transcript is restored for the chat's grounding context.
        self.transcript = item.full_transcript.clone();
        self.audio = None;
        self.chat.clear();
        self.error_message = None;
        self.stage = AppStage::Result;
    }

    /// Delete a stored item by id. Returns `true` when one was removed.
    pub fn delete_history(&mut self, id: &str) -> bool {
        self.history.delete(id)
    }

    /// The stored history, most-recent-first.
    pub fn history_items(&self) -> &[HistoryItem] {
        self.history.items()
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Activate the chat for the current result, creating the session on
    /// first use.
    ///
    /// Requires the `Result` stage, a result, and a resolvable persona; the
    /// session is therefore never created before those exist.
    pub fn activate_chat(&mut self) -> Result<(), WorkflowError> {
        self.require_stage(AppStage::Result, "chat")?;

        let (result, persona) = match (self.result.as_ref(), self.selected_persona) {
            (Some(result), Some(persona)) => (result, persona),
            _ => return Err(WorkflowError::NoPersonaSelected),
        };

        self.chat
            .activate(Arc::clone(&self.gateway), &result.transcript, persona);
        Ok(())
    }

    /// Send one chat message, activating the chat first if needed.
    ///
    /// Chat failures never escalate: a failed turn appends the apology
    /// message in place and the workflow stays at `Result`.
    pub async fn send_chat(&mut self, text: &str) -> Result<(), WorkflowError> {
        self.activate_chat()?;
        self.chat.send(text).await;
        Ok(())
    }

    /// The visible chat log.
    pub fn chat_messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    /// Whether a chat session currently exists.
    pub fn has_chat_session(&self) -> bool {
        self.chat.has_session()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The current workflow stage.
    pub fn stage(&self) -> AppStage {
        self.stage
    }

    /// The transcript of the current session (empty before transcription).
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The uploaded audio file, if the current session has one.
    pub fn audio_file(&self) -> Option<&AudioFile> {
        self.audio.as_ref()
    }

    /// The currently selected persona.
    pub fn selected_persona(&self) -> Option<&'static Persona> {
        self.selected_persona
    }

    /// The current result, fresh or restored.
    pub fn result(&self) -> Option<&PodcastResult> {
        self.result.as_ref()
    }

    /// The message shown in the `Error` stage.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require_stage(&self, expected: AppStage, action: &'static str) -> Result<(), WorkflowError> {
        if self.stage != expected {
            return Err(WorkflowError::InvalidStage {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    fn fail(&mut self, message: String) {
        log::error!("workflow error: {message}");
        self.error_message = Some(message);
        self.stage = AppStage::Error;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
