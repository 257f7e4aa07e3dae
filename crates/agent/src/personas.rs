//! Persona instruction templates.
//!
//! Persona selection is an enum-to-template lookup: each value maps to one
//! fixed instruction block that leads the composed prompt. Nothing else in
//! the pipeline branches on the persona.

use shared::chat::Persona;

/// Fixed instruction template for one persona.
#[derive(Clone, Debug)]
pub struct PersonaTemplate {
    pub name: &'static str,
    /// Leading instruction block for composed prompts.
    pub instruction: &'static str,
    /// One-line description shown next to the selector.
    pub tagline: &'static str,
}

/// Look up the template for a persona.
pub fn persona_template(persona: Persona) -> &'static PersonaTemplate {
    match persona {
        Persona::General => &GENERAL,
        Persona::Coding => &CODING,
        Persona::Resume => &RESUME,
        Persona::DocumentQa => &DOCUMENT_QA,
        Persona::Translator => &TRANSLATOR,
        Persona::EmotionalSupport => &EMOTIONAL_SUPPORT,
    }
}

static GENERAL: PersonaTemplate = PersonaTemplate {
    name: "General Assistant",
    instruction: "You are GenieTalk, a helpful AI assistant.\n\
        Be helpful and concise, and adapt your tone to the conversation.",
    tagline: "Broad reasoning, explanation, brainstorming",
};

static CODING: PersonaTemplate = PersonaTemplate {
    name: "Coding Help",
    instruction: "You are a senior software engineer and coding mentor.\n\
        Explain step by step, but keep it brief. Show minimal but correct \
        code examples with short comments.",
    tagline: "Code, debugging, writing functions",
};

static RESUME: PersonaTemplate = PersonaTemplate {
    name: "Resume Review",
    instruction: "You are a resume and career advisor.\n\
        When given a resume: summarize the candidate's profile, point out \
        five to ten very specific improvements (content and formatting), \
        suggest three tailored role titles the candidate can target, and \
        propose three to five strong bullet points they can add.",
    tagline: "CV critique and job guidance",
};

static DOCUMENT_QA: PersonaTemplate = PersonaTemplate {
    name: "Document QA",
    instruction: "You are a document QA assistant.\n\
        First briefly state what you understood about the question, then \
        answer using ONLY the provided document text. If something is not \
        in the document, say so clearly.",
    tagline: "Answers questions about uploaded PDFs and TXTs",
};

static TRANSLATOR: PersonaTemplate = PersonaTemplate {
    name: "Translator",
    instruction: "You are a professional translator.\n\
        Translate the user's text into the requested language, keeping the \
        original meaning, tone, and style.",
    tagline: "Faithful translation into the reply language",
};

static EMOTIONAL_SUPPORT: PersonaTemplate = PersonaTemplate {
    name: "Emotional Support",
    instruction: "You are a supportive, empathetic friend.\n\
        Validate the user's feelings, avoid giving medical or clinical \
        diagnosis, offer simple and kind coping suggestions, and encourage \
        reaching out to trusted people or professionals when needed.",
    tagline: "Empathy and motivation (not medical advice)",
};
