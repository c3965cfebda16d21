//! The persona catalog — the fixed set of stylistic profiles a transcript
//! can be rewritten into.
//!
//! Personas are compile-time data: never created, mutated, or removed at
//! runtime. Every stored `persona_id` (in a result or a history item)
//! resolves against this catalog via [`find`].

// ---------------------------------------------------------------------------
// PersonaIcon
// ---------------------------------------------------------------------------

/// Closed set of persona icons, mapped to terminal glyphs at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaIcon {
    Mic,
    Search,
    BookOpen,
    Zap,
    Hash,
    Brain,
}

impl PersonaIcon {
    /// The glyph rendered next to the persona name in the terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            PersonaIcon::Mic => "🎤",
            PersonaIcon::Search => "🔍",
            PersonaIcon::BookOpen => "📖",
            PersonaIcon::Zap => "⚡",
            PersonaIcon::Hash => "#",
            PersonaIcon::Brain => "🧠",
        }
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// A fixed stylistic profile used to transform a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    /// Stable identifier stored in results and history items.
    pub id: &'static str,
    /// Display name (e.g. "The Stand-Up").
    pub name: &'static str,
    /// Short role label (e.g. "Comedy Host").
    pub role: &'static str,
    /// One-sentence description shown when listing personas.
    pub description: &'static str,
    /// Icon rendered next to the name.
    pub icon: PersonaIcon,
    /// Style instruction embedded into the transform and chat prompts.
    pub prompt_instruction: &'static str,
    /// Color token carried through from the catalog definition.
    pub color: &'static str,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

const PERSONAS: [Persona; 6] = [
    Persona {
        id: "comedian",
        name: "The Stand-Up",
        role: "Comedy Host",
        description: "Turns your recording into a witty, humorous monologue full of punchlines and observational comedy.",
        icon: PersonaIcon::Mic,
        prompt_instruction: "Rewrite the following text as a stand-up comedy bit. Use humor, timing, punchlines, and a casual, energetic tone. Make fun of the concepts lightly but keep the core message.",
        color: "from-yellow-400 to-orange-500",
    },
    Persona {
        id: "analyst",
        name: "The Analyst",
        role: "Tech Reviewer",
        description: "Transforms the content into a deep-dive technical analysis, focusing on specs, logic, and structured pros/cons.",
        icon: PersonaIcon::Search,
        prompt_instruction: "Rewrite the following text as a technical analysis or deep-dive review. Use structured sections, bullet points, professional terminology, and a critical, objective voice.",
        color: "from-blue-400 to-cyan-500",
    },
    Persona {
        id: "storyteller",
        name: "The Narrator",
        role: "NPR Style Host",
        description: "Weaves your words into a compelling narrative with emotional depth, pauses, and atmospheric descriptions.",
        icon: PersonaIcon::BookOpen,
        prompt_instruction: "Rewrite the following text as a narrative storytelling podcast script (like This American Life). Focus on emotion, setting the scene, rhetorical questions, and a calm, soothing cadence.",
        color: "from-emerald-400 to-teal-500",
    },
    Persona {
        id: "debater",
        name: "The Provocateur",
        role: "Hot Take Host",
        description: "Takes a controversial stance on your recording, challenging the ideas and creating a high-energy debate format.",
        icon: PersonaIcon::Zap,
        prompt_instruction: "Rewrite the following text as a controversial, high-energy \"hot take\" radio segment. Challenge the premises, use strong language, and be opinionated and provocative.",
        color: "from-red-500 to-pink-600",
    },
    Persona {
        id: "minimalist",
        name: "The Essentialist",
        role: "Productivity Guru",
        description: "Distills everything down to the absolute essentials. Short, punchy, and actionable advice.",
        icon: PersonaIcon::Hash,
        prompt_instruction: "Rewrite the following text as a minimalist productivity tip. Strip away all fluff. Use short sentences. Focus on \"The One Thing\" and actionable steps.",
        color: "from-gray-400 to-white",
    },
    Persona {
        id: "futurist",
        name: "The Futurist",
        role: "Sci-Fi Visionary",
        description: "Reimagines your content through the lens of future technology, AI, and the evolution of humanity.",
        icon: PersonaIcon::Brain,
        prompt_instruction: "Rewrite the following text from the perspective of a futurist. Connect the ideas to AI, space travel, or the year 2050. Use visionary language and speculation.",
        color: "from-violet-500 to-purple-600",
    },
];

/// The complete, ordered persona catalog.
pub fn catalog() -> &'static [Persona] {
    &PERSONAS
}

/// Look up a persona by its stable id.
pub fn find(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_six_personas() {
        assert_eq!(catalog().len(), 6);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<&str> = catalog().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn find_known_id() {
        let persona = find("comedian").expect("comedian must exist");
        assert_eq!(persona.name, "The Stand-Up");
        assert_eq!(persona.role, "Comedy Host");
    }

    #[test]
    fn find_unknown_id_returns_none() {
        assert!(find("does-not-exist").is_none());
    }

    #[test]
    fn every_icon_has_a_glyph() {
        for persona in catalog() {
            assert!(!persona.icon.glyph().is_empty());
        }
    }

    #[test]
    fn every_persona_has_nonempty_fields() {
        for persona in catalog() {
            assert!(!persona.id.is_empty());
            assert!(!persona.name.is_empty());
            assert!(!persona.role.is_empty());
            assert!(!persona.description.is_empty());
            assert!(!persona.prompt_instruction.is_empty());
            assert!(!persona.color.is_empty());
        }
    }
}
