//! Chat orchestration for GenieTalk.
//!
//! This crate owns prompt composition (persona templates, language
//! directives, document blocks), the append-only session context, and the
//! Agentic Task Mode executor — a three-call prompt chain, not an execution
//! engine. All model traffic goes through the `providers::TextModel` trait.

pub mod composer;
pub mod engine;
pub mod goal;
pub mod personas;
pub mod session;

#[cfg(test)]
mod testing;

pub use engine::{ChatEngine, ChatError};
pub use goal::{AgentRun, GoalExecutor, PlanStep, ToolLabel};
pub use personas::{persona_template, PersonaTemplate};
pub use session::SessionContext;
