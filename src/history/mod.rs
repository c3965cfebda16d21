//! Persistent history of completed transformations.
//!
//! [`HistoryStore`] persists an ordered list of [`HistoryItem`] as JSON in
//! the platform config directory (`history.json`). The list is
//! most-recent-first, capped at [`MAX_HISTORY_ITEMS`] entries (oldest evicted
//! on overflow), and rewritten in full on every mutation. A file that fails
//! to parse is logged and treated as "no history"; it is never fatal.

use std::path::PathBuf;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AppPaths;

/// Cap on stored history entries. Inserting past the cap evicts the oldest.
pub const MAX_HISTORY_ITEMS: usize = 50;

/// Length of the stored transcript snippet, in characters.
const SNIPPET_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// HistoryItem
// ---------------------------------------------------------------------------

/// A persisted record of one completed transformation tied to a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Time-derived identifier (Unix milliseconds at creation, as a string).
    pub id: String,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    /// Name of the uploaded source file (e.g. `meeting.mp3`).
    pub file_name: String,
    /// Id of the persona the transcript was transformed with.
    pub persona_id: String,
    /// First 100 characters of the transcript. Stored for compatibility with
    /// the persisted shape; nothing reads it back.
    pub transcript_snippet: String,
    /// The complete transcript.
    pub full_transcript: String,
    /// The persona-rewritten content.
    pub transformed_content: String,
}

impl HistoryItem {
    /// Build a new item stamped with the current time.
    pub fn new(file_name: &str, persona_id: &str, transcript: &str, transformed: &str) -> Self {
        let now = Utc::now().timestamp_millis();
        let snippet: String = transcript.chars().take(SNIPPET_CHARS).collect();

        Self {
            id: now.to_string(),
            timestamp: now,
            file_name: file_name.to_string(),
            persona_id: persona_id.to_string(),
            transcript_snippet: format!("{snippet}..."),
            full_transcript: transcript.to_string(),
            transformed_content: transformed.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// Manages the persisted history list.
///
/// Every mutation rewrites the backing file in full; there are no partial
/// updates and no migrations.
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    path: PathBuf,
}

impl HistoryStore {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Load history from the platform config directory, or return an empty
    /// store when the file does not exist yet.
    pub fn load_or_default() -> Self {
        Self::load_from(AppPaths::new().history_file)
    }

    /// Load history from an explicit path (useful for tests).
    pub fn load_from(path: PathBuf) -> Self {
        let items = Self::load_items(&path);
        Self { items, path }
    }

    fn load_items(path: &PathBuf) -> Vec<HistoryItem> {
        if !path.exists() {
            return Vec::new();
        }
        let data = std::fs::read_to_string(path).unwrap_or_default();
        match serde_json::from_str(&data) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("failed to parse history file ({e}); starting with empty history");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Prepend `item`, evicting the oldest entry past the cap, then persist.
    pub fn insert(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(MAX_HISTORY_ITEMS);
        self.save();
    }

    /// Delete the item with the given id, then persist.
    ///
    /// Returns `true` when an item was removed. The relative order of the
    /// remaining items is unchanged.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All items, most-recent-first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// A uniformly random item, or `None` when the history is empty.
    pub fn random(&self) -> Option<&HistoryItem> {
        if self.items.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.items.len());
        self.items.get(index)
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there is no history.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.items) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&self.path, data) {
                    log::warn!("failed to write history file: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialise history: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
