//! Core conversation types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in the session history. Turns are append-only: once recorded
/// they are never edited.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Interaction mode selected in the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Chat,
    Agentic,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Chat => "Chat",
            Mode::Agentic => "Agentic Task",
        }
    }
}

/// Assistant persona. Each value selects a fixed instruction template; there
/// is no behavioral branching beyond which template leads the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    General,
    Coding,
    Resume,
    DocumentQa,
    Translator,
    EmotionalSupport,
}

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::General,
        Persona::Coding,
        Persona::Resume,
        Persona::DocumentQa,
        Persona::Translator,
        Persona::EmotionalSupport,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::General => "General Assistant",
            Persona::Coding => "Coding Help",
            Persona::Resume => "Resume Review",
            Persona::DocumentQa => "Document QA",
            Persona::Translator => "Translator",
            Persona::EmotionalSupport => "Emotional Support",
        }
    }
}

/// Reply language. Eight presets plus a free-text custom value, unvalidated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Bengali,
    Spanish,
    French,
    German,
    Tamil,
    Telugu,
    Custom(String),
}

impl Language {
    pub const PRESETS: [Language; 8] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Tamil,
        Language::Telugu,
    ];

    pub fn name(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Language::Custom(_))
    }
}

/// Extracted text of the most recent upload. Replaced wholesale whenever a
/// new upload lands; injected verbatim into every prompt while present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DocumentContext {
    pub text: String,
    pub sources: Vec<String>,
}

impl DocumentContext {
    pub fn new(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }

    /// Short label for the sidebar, e.g. "resume.pdf, notes.txt".
    pub fn summary(&self) -> String {
        self.sources.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.as_str(), "User");
        assert_eq!(Role::Assistant.as_str(), "Assistant");
    }

    #[test]
    fn language_names() {
        assert_eq!(Language::English.name(), "English");
        assert_eq!(Language::Custom("Klingon".into()).name(), "Klingon");
        assert!(Language::Custom(String::new()).is_custom());
        assert_eq!(Language::PRESETS.len(), 8);
    }

    #[test]
    fn persona_covers_all_six() {
        assert_eq!(Persona::ALL.len(), 6);
        let names: Vec<_> = Persona::ALL.iter().map(|p| p.display_name()).collect();
        assert!(names.contains(&"Document QA"));
        assert!(names.contains(&"Emotional Support"));
    }
}
