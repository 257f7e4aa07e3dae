pub mod chat;

pub mod settings {
    use crate::chat::{Language, Mode, Persona};
    use zeroize::Zeroize;

    /// Model API key for the current session.
    ///
    /// Lives in memory only and is wiped on drop; it is never written to disk.
    #[derive(Clone)]
    pub struct ApiKey(String);

    impl ApiKey {
        pub fn new(key: impl Into<String>) -> Self {
            Self(key.into())
        }

        /// Convenience fallback for launching from a shell that already has
        /// `GEMINI_API_KEY` exported.
        pub fn from_env() -> Option<Self> {
            std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(Self)
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn is_empty(&self) -> bool {
            self.0.trim().is_empty()
        }
    }

    impl Drop for ApiKey {
        fn drop(&mut self) {
            self.0.zeroize();
        }
    }

    impl std::fmt::Debug for ApiKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("ApiKey(redacted)")
        }
    }

    /// Per-session chat configuration. Nothing here is persisted.
    #[derive(Debug, Clone)]
    pub struct ChatSettings {
        pub persona: Persona,
        pub language: Language,
        pub mode: Mode,
        pub model: String,
    }

    impl Default for ChatSettings {
        fn default() -> Self {
            Self {
                persona: Persona::General,
                language: Language::English,
                mode: Mode::Chat,
                model: "gemini-1.5-flash".to_string(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn api_key_debug_is_redacted() {
            let key = ApiKey::new("sk-very-secret");
            assert_eq!(format!("{:?}", key), "ApiKey(redacted)");
        }

        #[test]
        fn default_settings() {
            let settings = ChatSettings::default();
            assert_eq!(settings.persona, Persona::General);
            assert_eq!(settings.mode, Mode::Chat);
            assert_eq!(settings.model, "gemini-1.5-flash");
        }
    }
}
