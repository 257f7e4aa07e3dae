//! Prompt composition.
//!
//! One function builds the full instruction string for a chat request:
//! persona template first, then the running conversation, then the document
//! block when one is loaded, then the new message, and the language
//! directive last. The document text rides along verbatim on every call —
//! there is no truncation or deduplication.

use crate::personas::persona_template;
use shared::chat::{ConversationTurn, DocumentContext, Language, Persona};
use std::fmt::Write;

/// Render history as a plain `User:` / `Assistant:` transcript.
pub fn transcript(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        let _ = writeln!(out, "{}: {}", turn.role.as_str(), turn.text);
    }
    out
}

/// The directive that closes every composed prompt. Appears exactly once.
pub fn language_directive(language: &Language) -> String {
    format!("Respond in this language: {}.", language.name())
}

/// Build the single instruction string sent to the model for a chat turn.
pub fn compose_prompt(
    persona: Persona,
    language: &Language,
    document: Option<&DocumentContext>,
    history: &[ConversationTurn],
    message: &str,
) -> String {
    let template = persona_template(persona);

    let mut prompt = String::new();
    prompt.push_str(template.instruction);
    prompt.push('\n');

    if !history.is_empty() {
        prompt.push_str("\nPrevious conversation:\n");
        prompt.push_str(&transcript(history));
    }

    if let Some(doc) = document {
        let _ = write!(prompt, "\nDocument text:\n\"\"\"\n{}\n\"\"\"\n", doc.text);
    }

    let _ = write!(prompt, "\nUser message:\n{}\n", message);

    prompt.push('\n');
    prompt.push_str(&language_directive(language));
    prompt
}
