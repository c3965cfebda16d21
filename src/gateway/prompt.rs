//! Prompt construction for the three gateway operations.
//!
//! * [`TRANSCRIBE_INSTRUCTION`] — fixed instruction sent alongside the audio.
//! * [`transform_prompt`] — one-shot persona rewrite prompt.
//! * [`chat_system_instruction`] — system instruction that seeds a persona
//!   chat session with the transcript as grounding context.

use crate::persona::Persona;

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

/// Instruction paired with the inline audio payload.
///
/// Asks for a verbatim transcript, speaker labels, and an explicit statement
/// when the audio is silent or unintelligible.
pub const TRANSCRIBE_INSTRUCTION: &str = "Generate a verbatim transcription of this audio. \
Do not summarize. If there are multiple speakers, identify them as Speaker 1, Speaker 2, etc. \
If the audio is silent or unintelligible, state that clearly.";

// ---------------------------------------------------------------------------
// Transformation
// ---------------------------------------------------------------------------

/// Build the one-shot transformation prompt for `persona`.
///
/// The model is told to output only the transformed content, with no
/// conversational preamble.
pub fn transform_prompt(transcript: &str, persona: &Persona) -> String {
    format!(
        "You are acting as the following persona: {name} - {role}.\n\
         \n\
         System Instruction for this persona:\n\
         {instruction}\n\
         \n\
         Here is the raw source text (transcript):\n\
         \"{transcript}\"\n\
         \n\
         Task:\n\
         Transform the source text into a script or monologue that matches your persona perfectly.\n\
         Maintain the core information/facts from the source, but completely change the tone, \
         vocabulary, and structure to fit the persona.\n\
         Output ONLY the transformed content. Do not add introductory conversational filler \
         like \"Here is the rewritten text\".",
        name = persona.name,
        role = persona.role,
        instruction = persona.prompt_instruction,
        transcript = transcript,
    )
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Build the system instruction for a persona chat session.
///
/// Fixes the persona's identity and style, embeds the transcript as grounding
/// context, and rules the model to stay in character and to flag answers that
/// go beyond the transcript's content.
pub fn chat_system_instruction(transcript: &str, persona: &Persona) -> String {
    format!(
        "You are {name}, a {role}.\n\
         {description}\n\
         \n\
         Your personality instructions are:\n\
         {instruction}\n\
         \n\
         CONTEXT:\n\
         The user has provided a transcript of an audio recording. You must answer questions, \
         discuss the content, or elaborate on the topics found in the transcript BELOW.\n\
         \n\
         TRANSCRIPT:\n\
         \"{transcript}\"\n\
         \n\
         RULES:\n\
         1. Stay in character as {name} at all times.\n\
         2. Use the tone, vocabulary, and style defined in your personality instructions.\n\
         3. If the user asks about something not in the transcript, improvise based on your \
         persona but mention it wasn't in the original audio if strictly necessary.\n\
         4. Be helpful but conversational.",
        name = persona.name,
        role = persona.role,
        description = persona.description,
        instruction = persona.prompt_instruction,
        transcript = transcript,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
