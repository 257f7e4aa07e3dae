//! Agentic Task Mode: a three-call prompt chain.
//!
//! Plan -> ToolMap -> Synthesize, each one blocking model call, strictly in
//! that order, with no branching and no retries. The "tools" are a fixed
//! conceptual vocabulary the model labels plan steps with; nothing is ever
//! dispatched or executed, and no step result feeds back into the chain.

use crate::composer::{language_directive, transcript};
use crate::personas::persona_template;
use crate::session::SessionContext;
use providers::{ApiError, TextModel};
use regex::Regex;
use shared::settings::ChatSettings;
use std::fmt::Write;

/// How many trailing history turns ride along into an agentic run.
const RECENT_HISTORY_TURNS: usize = 6;

/// Conceptual tool vocabulary for step labeling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolLabel {
    Search,
    Calculator,
    CodeRunner,
    DocumentReader,
    Summarizer,
    Translator,
    None,
}

impl ToolLabel {
    pub const ALL: [ToolLabel; 7] = [
        ToolLabel::Search,
        ToolLabel::Calculator,
        ToolLabel::CodeRunner,
        ToolLabel::DocumentReader,
        ToolLabel::Summarizer,
        ToolLabel::Translator,
        ToolLabel::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolLabel::Search => "Search",
            ToolLabel::Calculator => "Calculator",
            ToolLabel::CodeRunner => "CodeRunner",
            ToolLabel::DocumentReader => "DocumentReader",
            ToolLabel::Summarizer => "Summarizer",
            ToolLabel::Translator => "Translator",
            ToolLabel::None => "None",
        }
    }

    /// Map a model-produced label onto the vocabulary. Anything unrecognized
    /// normalizes to `None`.
    pub fn parse(label: &str) -> ToolLabel {
        let needle = label
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        ToolLabel::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().to_ascii_lowercase() == needle)
            .unwrap_or(ToolLabel::None)
    }
}

/// One line of the model-generated plan paired with its chosen label.
/// Produced transiently per request; never persisted across turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanStep {
    pub description: String,
    pub tool: ToolLabel,
}

/// Result of a completed agentic run. The answer is what joins the
/// conversation; the plan and labels are display detail.
#[derive(Clone, Debug)]
pub struct AgentRun {
    pub plan_text: String,
    pub steps: Vec<PlanStep>,
    pub answer: String,
}

impl AgentRun {
    /// Numbered plan with tool labels, for a collapsible details view. Falls
    /// back to the raw plan text if step parsing came up empty.
    pub fn details(&self) -> String {
        if self.steps.is_empty() {
            return format!("Plan:\n{}", self.plan_text);
        }
        let mut out = String::from("Plan:\n");
        for (i, step) in self.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. [{}] {}", i + 1, step.tool.as_str(), step.description);
        }
        out
    }
}

/// Drives the three-stage chain against a model.
pub struct GoalExecutor<'m> {
    model: &'m dyn TextModel,
}

impl<'m> GoalExecutor<'m> {
    pub fn new(model: &'m dyn TextModel) -> Self {
        Self { model }
    }

    pub async fn run(
        &self,
        session: &SessionContext,
        settings: &ChatSettings,
        goal: &str,
    ) -> Result<AgentRun, ApiError> {
        tracing::info!(stage = "plan", "agentic run started");
        let plan_text = self
            .model
            .generate(&plan_prompt(session, settings, goal))
            .await?;
        let descriptions = parse_plan_steps(&plan_text);

        tracing::info!(stage = "tool_map", steps = descriptions.len(), "plan received");
        let map_text = self.model.generate(&tool_map_prompt(&plan_text)).await?;
        let steps = assign_tool_labels(&descriptions, &map_text);

        tracing::info!(stage = "synthesize", "tool labels assigned");
        let answer = self
            .model
            .generate(&synthesize_prompt(settings, goal, &plan_text, &steps))
            .await?;

        Ok(AgentRun {
            plan_text,
            steps,
            answer,
        })
    }
}

fn plan_prompt(session: &SessionContext, settings: &ChatSettings, goal: &str) -> String {
    let template = persona_template(settings.persona);

    let mut prompt = String::new();
    prompt.push_str(template.instruction);
    prompt.push('\n');

    let history = session.history();
    let start = history.len().saturating_sub(RECENT_HISTORY_TURNS);
    if start < history.len() {
        prompt.push_str("\nPrevious conversation:\n");
        prompt.push_str(&transcript(&history[start..]));
    }

    if let Some(doc) = session.document() {
        let _ = write!(
            prompt,
            "\nThe user also provided document text. Treat it as context when relevant:\n\"\"\"\n{}\n\"\"\"\n",
            doc.text
        );
    }

    let _ = write!(
        prompt,
        "\nUser goal:\n\"\"\"{goal}\"\"\"\n\n\
         Produce a numbered step-by-step plan (3-6 steps) for reaching this goal.\n\
         Reply with the plan only, one step per line, like:\n\
         1. First step\n\
         2. Second step\n"
    );
    prompt
}

fn tool_map_prompt(plan_text: &str) -> String {
    let vocabulary = ToolLabel::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Here is a numbered plan:\n{plan_text}\n\n\
         For each step, name the single best-matching tool from this list: {vocabulary}.\n\
         These are descriptive labels only; do not execute anything.\n\
         Reply with one line per step, in the form:\n\
         1. ToolName\n\
         2. ToolName\n"
    )
}

fn synthesize_prompt(
    settings: &ChatSettings,
    goal: &str,
    plan_text: &str,
    steps: &[PlanStep],
) -> String {
    let template = persona_template(settings.persona);

    let mut labels = String::new();
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(labels, "{}. {}", i + 1, step.tool.as_str());
    }

    format!(
        "{instruction}\n\n\
         User goal:\n\"\"\"{goal}\"\"\"\n\n\
         The plan:\n{plan_text}\n\n\
         Tool choices per step:\n{labels}\n\
         Now work through the plan and produce the final answer the user can \
         read directly. Do not repeat the plan itself.\n\n\
         {directive}",
        instruction = template.instruction,
        directive = language_directive(&settings.language),
    )
}

/// Pull step descriptions out of the plan text. Numbered lines win; if the
/// model skipped numbering, every non-empty line counts as a step.
fn parse_plan_steps(plan_text: &str) -> Vec<String> {
    let re = Regex::new(r"^\s*\d+[.)]\s*(.+)$").unwrap();
    let numbered: Vec<String> = plan_text
        .lines()
        .filter_map(|line| re.captures(line).map(|c| c[1].trim().to_string()))
        .collect();

    if !numbered.is_empty() {
        return numbered;
    }

    plan_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Zip step descriptions with the labels the model replied with. Steps the
/// reply skipped, and labels outside the vocabulary, get `None`.
fn assign_tool_labels(descriptions: &[String], map_text: &str) -> Vec<PlanStep> {
    let re = Regex::new(r"^\s*(\d+)[.)]?\s*[:\-]?\s*(.+)$").unwrap();
    let mut labels = std::collections::HashMap::new();
    for line in map_text.lines() {
        if let Some(caps) = re.captures(line) {
            if let Ok(idx) = caps[1].parse::<usize>() {
                let first_word = caps[2].split_whitespace().next().unwrap_or("");
                labels.insert(idx, ToolLabel::parse(first_word));
            }
        }
    }

    descriptions
        .iter()
        .enumerate()
        .map(|(i, description)| PlanStep {
            description: description.clone(),
            tool: labels.get(&(i + 1)).copied().unwrap_or(ToolLabel::None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;
    use shared::chat::DocumentContext;

    fn settings() -> ChatSettings {
        ChatSettings::default()
    }

    #[test]
    fn parses_numbered_plans() {
        let plan = "1. Research destinations\n2) Compare prices\n 3. Book the trip";
        let steps = parse_plan_steps(plan);
        assert_eq!(
            steps,
            vec!["Research destinations", "Compare prices", "Book the trip"]
        );
    }

    #[test]
    fn unnumbered_plan_falls_back_to_lines() {
        let steps = parse_plan_steps("find flights\n\npick a hotel\n");
        assert_eq!(steps, vec!["find flights", "pick a hotel"]);
    }

    #[test]
    fn tool_labels_normalize_to_vocabulary() {
        assert_eq!(ToolLabel::parse("Search"), ToolLabel::Search);
        assert_eq!(ToolLabel::parse("  calculator."), ToolLabel::Calculator);
        assert_eq!(ToolLabel::parse("CODERUNNER"), ToolLabel::CodeRunner);
        assert_eq!(ToolLabel::parse("TimeMachine"), ToolLabel::None);
        assert_eq!(ToolLabel::parse(""), ToolLabel::None);
    }

    #[test]
    fn missing_map_lines_default_to_none() {
        let descriptions = vec![
            "look up flights".to_string(),
            "total the costs".to_string(),
            "write the summary".to_string(),
        ];
        let steps = assign_tool_labels(&descriptions, "1. Search\n3. Summarizer - wrap up");
        assert_eq!(steps[0].tool, ToolLabel::Search);
        assert_eq!(steps[1].tool, ToolLabel::None);
        assert_eq!(steps[2].tool, ToolLabel::Summarizer);
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let model = MockModel::with_replies(vec![
            Ok("1. Pick dates\n2. Find hotels\n3. Draft itinerary".to_string()),
            Ok("1. Search\n2. Search\n3. Summarizer".to_string()),
            Ok("Here is your three-day trip plan.".to_string()),
        ]);
        let session = SessionContext::new();

        let run = GoalExecutor::new(&model)
            .run(&session, &settings(), "Plan a 3-day trip")
            .await
            .unwrap();

        assert_eq!(model.calls(), 3);
        let prompts = model.prompts();
        assert!(prompts[0].contains("numbered step-by-step plan"));
        assert!(prompts[1].contains("best-matching tool"));
        assert!(prompts[1].contains("1. Pick dates"));
        assert!(prompts[2].contains("final answer"));
        assert!(prompts[2].contains("Respond in this language: English."));

        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.steps[0].tool, ToolLabel::Search);
        assert_eq!(run.steps[2].tool, ToolLabel::Summarizer);
        assert_eq!(run.answer, "Here is your three-day trip plan.");
    }

    #[tokio::test]
    async fn plan_failure_stops_the_chain() {
        let model = MockModel::with_replies(vec![Err(ApiError::Api {
            status: 401,
            message: "API key not valid".to_string(),
        })]);
        let session = SessionContext::new();

        let err = GoalExecutor::new(&model)
            .run(&session, &settings(), "Plan a 3-day trip")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 401, .. }));
        // ToolMap and Synthesize were never invoked.
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn tool_map_failure_skips_synthesize() {
        let model = MockModel::with_replies(vec![
            Ok("1. Only step".to_string()),
            Err(ApiError::InvalidResponse("empty".to_string())),
        ]);
        let session = SessionContext::new();

        let err = GoalExecutor::new(&model)
            .run(&session, &settings(), "do something")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn document_hint_rides_into_plan_prompt() {
        let model = MockModel::with_replies(vec![
            Ok("1. Read the document".to_string()),
            Ok("1. DocumentReader".to_string()),
            Ok("done".to_string()),
        ]);
        let mut session = SessionContext::new();
        session.set_document(DocumentContext::new(
            "quarterly revenue tables",
            vec!["q3.pdf".to_string()],
        ));

        GoalExecutor::new(&model)
            .run(&session, &settings(), "summarize the report")
            .await
            .unwrap();

        assert!(model.prompts()[0].contains("quarterly revenue tables"));
    }

    #[test]
    fn details_lists_labeled_steps() {
        let run = AgentRun {
            plan_text: String::new(),
            steps: vec![
                PlanStep {
                    description: "look things up".to_string(),
                    tool: ToolLabel::Search,
                },
                PlanStep {
                    description: "sum it".to_string(),
                    tool: ToolLabel::Calculator,
                },
            ],
            answer: String::new(),
        };
        let details = run.details();
        assert!(details.contains("1. [Search] look things up"));
        assert!(details.contains("2. [Calculator] sum it"));
    }
}
