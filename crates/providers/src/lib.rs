//! Model provider boundary.
//!
//! The rest of the workspace talks to the hosted model through the
//! [`TextModel`] trait: one prompt string in, one reply string out. The
//! production implementation is [`GeminiClient`]; tests substitute scripted
//! mocks.

pub mod error;
pub mod gemini;

pub use error::ApiError;
pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Opaque text-generation boundary.
///
/// Implementations make exactly one blocking request per call. There is no
/// retry or backoff here; failures surface as [`ApiError`] and are terminal
/// for the request that raised them.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}
