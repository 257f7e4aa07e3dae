//! Session state: append-only history plus the current document context.
//!
//! One `SessionContext` per interactive session, passed explicitly to the
//! handlers that need it. The fields are private so the append-only and
//! wholesale-replace invariants hold by construction.

use crate::composer::transcript;
use shared::chat::{ConversationTurn, DocumentContext, Role};

#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    history: Vec<ConversationTurn>,
    document: Option<DocumentContext>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    /// Record one successful exchange: the user turn, then the assistant
    /// turn. Failed requests never reach this point, so history only ever
    /// contains completed exchanges.
    pub fn record_exchange(&mut self, user_text: &str, assistant_text: &str) {
        self.history
            .push(ConversationTurn::new(Role::User, user_text));
        self.history
            .push(ConversationTurn::new(Role::Assistant, assistant_text));
    }

    /// Empty the conversation. The document context is untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replace the document context wholesale.
    pub fn set_document(&mut self, document: DocumentContext) {
        self.document = Some(document);
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }

    /// Plain-text transcript of every turn in order, for the export action.
    pub fn export_transcript(&self) -> String {
        transcript(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_append_only_pairs() {
        let mut session = SessionContext::new();
        for i in 0..3 {
            session.record_exchange(&format!("question {i}"), &format!("answer {i}"));
        }

        let history = session.history();
        assert_eq!(history.len(), 6);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[0].text, format!("question {i}"));
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[1].text, format!("answer {i}"));
        }
        // Chronological order holds across the whole sequence.
        for window in history.windows(2) {
            assert!(window[0].timestamp <= window[1].timestamp);
        }
    }

    #[test]
    fn clearing_history_keeps_document() {
        let mut session = SessionContext::new();
        session.record_exchange("q", "a");
        session.set_document(DocumentContext::new("doc body", vec!["d.txt".into()]));

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.document().unwrap().text, "doc body");
    }

    #[test]
    fn new_document_replaces_old() {
        let mut session = SessionContext::new();
        session.set_document(DocumentContext::new("old", vec!["old.pdf".into()]));
        session.set_document(DocumentContext::new("new", vec!["new.pdf".into()]));

        let doc = session.document().unwrap();
        assert_eq!(doc.text, "new");
        assert_eq!(doc.sources, vec!["new.pdf"]);
    }

    #[test]
    fn export_lists_turns_in_order() {
        let mut session = SessionContext::new();
        session.record_exchange("hello", "hi there");
        session.record_exchange("bye", "see you");

        let out = session.export_transcript();
        assert_eq!(out, "User: hello\nAssistant: hi there\nUser: bye\nAssistant: see you\n");
    }
}
