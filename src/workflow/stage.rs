//! Workflow stage enumeration.
//!
//! [`AppStage`] is the single enumerated position in the upload → result
//! workflow. Exactly one value holds at a time and it is the sole driver of
//! which view the terminal driver renders.
//!
//! ```text
//! Upload ──file accepted──▶ Transcribing
//!                           ──ok──▶ ReviewTranscript
//!                           ──err─▶ Error
//! ReviewTranscript ──persona picked──▶ SelectPersona
//! SelectPersona ──confirm──▶ Generating
//!                            ──ok──▶ Result   (history side effect)
//!                            ──err─▶ Error
//! Result / Error ──reset──▶ Upload
//! any stage ──load history item──▶ Result
//! ```

// ---------------------------------------------------------------------------
// AppStage
// ---------------------------------------------------------------------------

/// Stages of the transformation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStage {
    /// Waiting for the user to upload an audio file.
    Upload,

    /// The transcription call is in flight.
    Transcribing,

    /// The transcript is ready for review; no persona selected yet.
    ReviewTranscript,

    /// A persona is selected; waiting for the user to confirm generation.
    SelectPersona,

    /// The transformation call is in flight.
    Generating,

    /// A finished result is on display (fresh or restored from history).
    Result,

    /// A remote call failed. The only recovery is a full reset.
    Error,
}

impl AppStage {
    /// Returns `true` while a remote call is in flight.
    ///
    /// The view uses this to show a loading indicator and withhold the
    /// stage's primary actions.
    ///
    /// ```
    /// use podai::workflow::AppStage;
    ///
    /// assert!(!AppStage::Upload.is_loading());
    /// assert!(AppStage::Transcribing.is_loading());
    /// assert!(AppStage::Generating.is_loading());
    /// assert!(!AppStage::Result.is_loading());
    /// ```
    pub fn is_loading(&self) -> bool {
        matches!(self, AppStage::Transcribing | AppStage::Generating)
    }

    /// A short human-readable label for status output.
    pub fn label(&self) -> &'static str {
        match self {
            AppStage::Upload => "Upload",
            AppStage::Transcribing => "Transcribing",
            AppStage::ReviewTranscript => "Review Transcript",
            AppStage::SelectPersona => "Select Persona",
            AppStage::Generating => "Generating",
            AppStage::Result => "Result",
            AppStage::Error => "Error",
        }
    }
}

impl Default for AppStage {
    fn default() -> Self {
        AppStage::Upload
    }
}

impl std::fmt::Display for AppStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- AppStage::is_loading ---

    #[test]
    fn upload_is_not_loading() {
        assert!(!AppStage::Upload.is_loading());
    }

    #[test]
    fn transcribing_is_loading() {
        assert!(AppStage::Transcribing.is_loading());
    }

    #[test]
    fn review_is_not_loading() {
        assert!(!AppStage::ReviewTranscript.is_loading());
    }

    #[test]
    fn select_persona_is_not_loading() {
        assert!(!AppStage::SelectPersona.is_loading());
    }

    #[test]
    fn generating_is_loading() {
        assert!(AppStage::Generating.is_loading());
    }

    #[test]
    fn result_is_not_loading() {
        assert!(!AppStage::Result.is_loading());
    }

    #[test]
    fn error_is_not_loading() {
        assert!(!AppStage::Error.is_loading());
    }

    // ---- labels / default ---

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(AppStage::Upload.label(), "Upload");
        assert_eq!(AppStage::ReviewTranscript.label(), "Review Transcript");
        assert_eq!(AppStage::SelectPersona.label(), "Select Persona");
        assert_eq!(AppStage::Error.label(), "Error");
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(AppStage::Generating.to_string(), "Generating");
    }

    #[test]
    fn default_stage_is_upload() {
        assert_eq!(AppStage::default(), AppStage::Upload);
    }
}
