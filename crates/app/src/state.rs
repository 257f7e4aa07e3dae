//! State management for the GenieTalk app.
//!
//! The UI thread owns all session state. Model calls run on a spawned
//! worker thread (one at a time) that gets an immutable snapshot of the
//! session; the result comes back over an mpsc channel polled each frame,
//! and history is only mutated here after a successful reply.

use agent::{AgentRun, ChatEngine, ChatError, SessionContext};
use providers::{ApiError, GeminiClient};
use shared::chat::{Mode, Role};
use shared::settings::{ApiKey, ChatSettings};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// One rendered chat entry. This is display state: errors and welcome text
/// appear here without ever touching the session history.
#[derive(Clone, Debug)]
pub struct UiMessage {
    pub role: Role,
    pub content: String,
    /// Optional collapsible detail (the agentic plan and tool labels).
    pub details: Option<String>,
    pub timestamp: String,
}

impl UiMessage {
    pub fn new(role: Role, content: impl Into<String>, details: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            details,
            timestamp: chrono::Utc::now().format("%H:%M").to_string(),
        }
    }
}

/// Reply payload from the background worker.
pub enum ReplyBody {
    Chat(String),
    Agentic(AgentRun),
}

/// Result from one background generation.
pub struct ChatOutcome {
    pub user_text: String,
    pub result: Result<ReplyBody, ChatError>,
}

pub struct AppState {
    pub settings: ChatSettings,
    pub session: SessionContext,
    pub messages: Vec<UiMessage>,
    pub api_key_input: String,
    pub custom_language_input: String,
    pub input_text: String,
    pub is_thinking: bool,
    pub thinking_status: String,
    pub status: Option<String>,
    pub status_is_error: bool,
    pub outcome_rx: Option<Receiver<ChatOutcome>>,
}

impl Default for AppState {
    fn default() -> Self {
        // Convenience for dev shells; the key otherwise comes from the sidebar.
        let api_key_input = ApiKey::from_env()
            .map(|k| k.as_str().to_string())
            .unwrap_or_default();

        Self {
            settings: ChatSettings::default(),
            session: SessionContext::new(),
            messages: vec![welcome_message()],
            api_key_input,
            custom_language_input: String::new(),
            input_text: String::new(),
            is_thinking: false,
            thinking_status: String::new(),
            status: None,
            status_is_error: false,
            outcome_rx: None,
        }
    }
}

pub fn welcome_message() -> UiMessage {
    UiMessage::new(
        Role::Assistant,
        "Hi! I'm GenieTalk. Pick a persona and a reply language, upload a \
         PDF or TXT if you want me to use it, and ask me anything - or \
         switch to Agentic Task mode and describe a goal.",
        None,
    )
}

impl AppState {
    /// Kick off one generation for the current input. One request in flight
    /// at a time; there is no cancel.
    pub fn send_message(&mut self) {
        if self.is_thinking {
            return;
        }

        let message = self.input_text.trim().to_string();
        if message.is_empty() {
            self.status = Some("Type a message first.".to_string());
            self.status_is_error = true;
            return;
        }
        let api_key = ApiKey::new(self.api_key_input.trim());
        if api_key.is_empty() {
            self.status = Some("Enter your Gemini API key in the sidebar first.".to_string());
            self.status_is_error = true;
            return;
        }

        self.input_text.clear();
        self.status = None;
        self.status_is_error = false;
        self.is_thinking = true;
        self.thinking_status = match self.settings.mode {
            Mode::Chat => "Thinking".to_string(),
            Mode::Agentic => "Working on your goal".to_string(),
        };

        // The attempted message shows up right away; it only joins the
        // session history once the reply lands.
        self.messages
            .push(UiMessage::new(Role::User, message.clone(), None));

        let (tx, rx) = channel::<ChatOutcome>();
        self.outcome_rx = Some(rx);

        let session = self.session.clone();
        let settings = self.settings.clone();

        tracing::info!(mode = ?settings.mode, persona = ?settings.persona, "dispatching request");
        std::thread::spawn(move || run_generation(session, settings, api_key, message, tx));
    }

    /// Check for a finished background generation (called each frame).
    pub fn poll_outcome(&mut self) {
        let Some(rx) = &self.outcome_rx else { return };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting. Unstick the UI.
                self.outcome_rx = None;
                self.is_thinking = false;
                self.thinking_status.clear();
                self.status = Some("The request was interrupted. Please try again.".to_string());
                self.status_is_error = true;
                return;
            }
        };

        self.outcome_rx = None;
        self.is_thinking = false;
        self.thinking_status.clear();

        match outcome.result {
            Ok(ReplyBody::Chat(reply)) => {
                self.session.record_exchange(&outcome.user_text, &reply);
                self.messages
                    .push(UiMessage::new(Role::Assistant, reply, None));
            }
            Ok(ReplyBody::Agentic(run)) => {
                self.session.record_exchange(&outcome.user_text, &run.answer);
                let details = Some(run.details());
                self.messages
                    .push(UiMessage::new(Role::Assistant, run.answer, details));
            }
            Err(error) => {
                tracing::warn!(%error, "request failed");
                self.status = Some(format_error_message(&error));
                self.status_is_error = true;
            }
        }
    }

    /// Clear the conversation. The loaded document stays.
    pub fn clear_chat(&mut self) {
        self.session.clear_history();
        self.messages = vec![welcome_message()];
        self.status = Some("Chat history cleared.".to_string());
        self.status_is_error = false;
    }
}

/// Background worker: one engine call against a session snapshot.
fn run_generation(
    session: SessionContext,
    settings: ChatSettings,
    api_key: ApiKey,
    message: String,
    tx: Sender<ChatOutcome>,
) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(ChatOutcome {
                user_text: message,
                result: Err(ChatError::Api(ApiError::InvalidResponse(format!(
                    "failed to start async runtime: {e}"
                )))),
            });
            return;
        }
    };

    let result = rt.block_on(async {
        let client = GeminiClient::new(api_key.as_str(), &settings.model)?;
        let engine = ChatEngine::new(&client);
        match settings.mode {
            Mode::Chat => engine
                .chat(&session, &settings, &message)
                .await
                .map(ReplyBody::Chat),
            Mode::Agentic => engine
                .run_goal(&session, &settings, &message)
                .await
                .map(ReplyBody::Agentic),
        }
    });

    let _ = tx.send(ChatOutcome {
        user_text: message,
        result,
    });
}

/// Turn a request failure into something actionable for the user. The raw
/// error rides along so nothing is hidden.
pub fn format_error_message(error: &ChatError) -> String {
    match error {
        ChatError::EmptyInput => "Type a message first.".to_string(),
        ChatError::Api(api) => {
            if api.is_auth() {
                format!(
                    "I couldn't connect to Gemini - the API key looks invalid or \
                     missing. Check the key in the sidebar.\n\n{api}"
                )
            } else if api.is_quota() {
                format!(
                    "The model service is busy or out of quota. Wait a moment and \
                     try again.\n\n{api}"
                )
            } else if matches!(api, ApiError::Network(_)) {
                format!(
                    "I'm having trouble reaching the model service. Check your \
                     network connection.\n\n{api}"
                )
            } else {
                format!("The request failed. Try again.\n\n{api}")
            }
        }
    }
}
