//! Export boundary — renders downloadable artifacts.
//!
//! Two artifacts exist: the full history archive (pretty-printed JSON, file
//! name carrying the current date) and a single script (the transformed text
//! plus a trailing attribution footer). This module renders names and
//! content; the caller decides where the bytes go.

use chrono::NaiveDate;

use crate::history::HistoryItem;
use crate::persona::Persona;

/// Stem used when a result was restored from history and no source file is
/// present.
pub const RESTORED_SESSION_STEM: &str = "restored_session";

// ---------------------------------------------------------------------------
// History archive
// ---------------------------------------------------------------------------

/// File name for the history archive, e.g.
/// `podai_history_export_2026-08-05.json`.
pub fn archive_file_name(date: NaiveDate) -> String {
    format!("podai_history_export_{}.json", date.format("%Y-%m-%d"))
}

/// The full history list as pretty-printed JSON.
pub fn render_archive(items: &[HistoryItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}

// ---------------------------------------------------------------------------
// Script download
// ---------------------------------------------------------------------------

/// Source stem for a script export: the part of the file name before the
/// first dot, or [`RESTORED_SESSION_STEM`] when there is no source file.
pub fn source_stem(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) => name.split('.').next().unwrap_or(name).to_string(),
        None => RESTORED_SESSION_STEM.to_string(),
    }
}

/// File name for a script export, e.g. `PodAI_The_Stand-Up_meeting.txt`.
///
/// Whitespace in the persona name becomes underscores.
pub fn script_file_name(persona: &Persona, stem: &str) -> String {
    let persona_part: Vec<&str> = persona.name.split_whitespace().collect();
    format!("PodAI_{}_{}.txt", persona_part.join("_"), stem)
}

/// Script content: the transformed text plus the attribution footer.
pub fn render_script(transformed_content: &str, stem: &str, persona: &Persona) -> String {
    format!(
        "{transformed_content}\n\n---\nBased on: {stem}\nPersona: {name}",
        name = persona.name
    )
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
    fn archive_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).expect("valid date");
        assert_eq!(
            archive_file_name(date),
            "podai_history_export_2026-08-05.json"
        );
    }

    #[test]
    fn archive_renders_pretty_json() {
        let items = vec![HistoryItem::new("a.mp3", "comedian", "transcript", "content")];
        let json = render_archive(&items).expect("render");

        assert!(json.starts_with('['));
        assert!(json.contains("\"personaId\": \"comedian\""));
        assert!(json.contains('\n'), "must be pretty-printed");
    }

    #[test]
    fn empty_archive_is_an_empty_list() {
        assert_eq!(render_archive(&[]).expect("render"), "[]");
    }

    #[test]
    fn stem_takes_name_before_first_dot() {
        assert_eq!(source_stem(Some("meeting.mp3")), "meeting");
        assert_eq!(source_stem(Some("two.part.name.wav")), "two");
    }

    #[test]
    fn stem_without_source_is_restored_session() {
        assert_eq!(source_stem(None), "restored_session");
    }

    #[test]
    fn script_name_underscores_persona_whitespace() {
        assert_eq!(
            script_file_name(comedian(), "meeting"),
            "PodAI_The_Stand-Up_meeting.txt"
        );
    }

    #[test]
    fn script_content_ends_with_attribution() {
        let content = render_script("A funny take.", "meeting", comedian());
        assert!(content.starts_with("A funny take."));
        assert!(content.ends_with("---\nBased on: meeting\nPersona: The Stand-Up"));
    }
}
