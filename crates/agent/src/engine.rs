//! Request handlers tying the composer, the goal executor, and the session
//! together. One handler call is one user interaction.

use crate::composer::compose_prompt;
use crate::goal::{AgentRun, GoalExecutor};
use crate::session::SessionContext;
use providers::{ApiError, TextModel};
use shared::settings::ChatSettings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Blank message: the request is never sent.
    #[error("message is empty")]
    EmptyInput,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Stateless front door for chat and agentic requests.
pub struct ChatEngine<'m> {
    model: &'m dyn TextModel,
}

impl<'m> ChatEngine<'m> {
    pub fn new(model: &'m dyn TextModel) -> Self {
        Self { model }
    }

    /// One chat turn: compose a prompt from the session and settings, make
    /// one model call, return the reply. The session is not mutated.
    pub async fn chat(
        &self,
        session: &SessionContext,
        settings: &ChatSettings,
        message: &str,
    ) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let prompt = compose_prompt(
            settings.persona,
            &settings.language,
            session.document(),
            session.history(),
            message,
        );
        Ok(self.model.generate(&prompt).await?)
    }

    /// One agentic run: Plan, ToolMap, Synthesize. The session is not
    /// mutated.
    pub async fn run_goal(
        &self,
        session: &SessionContext,
        settings: &ChatSettings,
        goal: &str,
    ) -> Result<AgentRun, ChatError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let run = GoalExecutor::new(self.model)
            .run(session, settings, goal)
            .await?;
        Ok(run)
    }

    /// Chat and record the exchange. On any error the session is unchanged.
    pub async fn chat_turn(
        &self,
        session: &mut SessionContext,
        settings: &ChatSettings,
        message: &str,
    ) -> Result<String, ChatError> {
        let reply = self.chat(session, settings, message).await?;
        session.record_exchange(message.trim(), &reply);
        Ok(reply)
    }

    /// Run a goal and record the exchange. On any error the session is
    /// unchanged.
    pub async fn goal_turn(
        &self,
        session: &mut SessionContext,
        settings: &ChatSettings,
        goal: &str,
    ) -> Result<AgentRun, ChatError> {
        let run = self.run_goal(session, settings, goal).await?;
        session.record_exchange(goal.trim(), &run.answer);
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;
    use shared::chat::{DocumentContext, Mode, Persona, Role};

    fn settings() -> ChatSettings {
        ChatSettings::default()
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_model() {
        let model = MockModel::with_replies(vec![]);
        let engine = ChatEngine::new(&model);
        let mut session = SessionContext::new();

        let err = engine
            .chat_turn(&mut session, &settings(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::EmptyInput));
        assert_eq!(model.calls(), 0);
        assert!(session.history().is_empty());

        let err = engine
            .goal_turn(&mut session, &settings(), "")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::EmptyInput));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn document_qa_scenario() {
        let model = MockModel::with_replies(vec![Ok("Paris".to_string())]);
        let engine = ChatEngine::new(&model);

        let mut session = SessionContext::new();
        session.set_document(DocumentContext::new(
            "Capital of France is Paris.",
            vec!["facts.txt".to_string()],
        ));
        let mut settings = settings();
        settings.persona = Persona::DocumentQa;

        let reply = engine
            .chat_turn(&mut session, &settings, "What is the capital?")
            .await
            .unwrap();

        assert_eq!(reply, "Paris");

        // The composed prompt carried both the document block and the
        // literal question.
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Capital of France is Paris."));
        assert!(prompts[0].contains("What is the capital?"));

        // Exactly one user turn and one assistant turn were appended.
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text, "What is the capital?");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].text, "Paris");
    }

    #[tokio::test]
    async fn api_failure_leaves_history_unchanged() {
        let model = MockModel::with_replies(vec![Err(ApiError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        })]);
        let engine = ChatEngine::new(&model);
        let mut session = SessionContext::new();

        let err = engine
            .chat_turn(&mut session, &settings(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Api(ApiError::Api { status: 429, .. })));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn agentic_plan_failure_leaves_history_unchanged() {
        let model = MockModel::with_replies(vec![Err(ApiError::Api {
            status: 401,
            message: "API key not valid".to_string(),
        })]);
        let engine = ChatEngine::new(&model);
        let mut session = SessionContext::new();
        let mut settings = settings();
        settings.mode = Mode::Agentic;

        let err = engine
            .goal_turn(&mut session, &settings, "Plan a 3-day trip")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Api(_)));
        assert_eq!(model.calls(), 1, "tool map and synthesize never ran");
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn goal_turn_records_goal_and_answer() {
        let model = MockModel::with_replies(vec![
            Ok("1. Step one\n2. Step two\n3. Step three".to_string()),
            Ok("1. Search\n2. Calculator\n3. Summarizer".to_string()),
            Ok("All done: here is the result.".to_string()),
        ]);
        let engine = ChatEngine::new(&model);
        let mut session = SessionContext::new();
        let mut settings = settings();
        settings.mode = Mode::Agentic;

        let run = engine
            .goal_turn(&mut session, &settings, "Plan a 3-day trip")
            .await
            .unwrap();

        assert_eq!(run.steps.len(), 3);
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "Plan a 3-day trip");
        assert_eq!(history[1].text, "All done: here is the result.");
    }

    #[tokio::test]
    async fn successive_turns_grow_history_in_order() {
        let model = MockModel::with_replies(vec![
            Ok("first reply".to_string()),
            Ok("second reply".to_string()),
        ]);
        let engine = ChatEngine::new(&model);
        let mut session = SessionContext::new();

        engine
            .chat_turn(&mut session, &settings(), "first")
            .await
            .unwrap();
        engine
            .chat_turn(&mut session, &settings(), "second")
            .await
            .unwrap();

        assert_eq!(session.history().len(), 4);
        // The second prompt carried the first exchange as history.
        let prompts = model.prompts();
        assert!(prompts[1].contains("User: first"));
        assert!(prompts[1].contains("Assistant: first reply"));
    }
}
