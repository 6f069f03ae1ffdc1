//! AI service integration for art ideas and image generation
//!
//! Provides the service traits used by the art pipeline, the Gemini REST
//! implementations, and scripted mocks for tests and dry runs.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiIdeaClient, GeminiImageClient};
pub use mock::{MockIdeaClient, MockImageClient, MockImageOutcome};

use crate::models::{ArtIdea, FourPillarChart};
use crate::Result;
use async_trait::async_trait;

/// Text-model stage: turns a chart into painting ideas.
///
/// Implementations return whatever the model produced; the pipeline is
/// responsible for enforcing the idea count.
#[async_trait]
pub trait IdeaService: Send + Sync {
    async fn generate_ideas(&self, chart: &FourPillarChart) -> Result<Vec<ArtIdea>>;
}

/// Image-model stage: renders one prompt.
///
/// Returns `Ok(Some(data_uri))` for an image, `Ok(None)` when the model
/// answered without any media, and `Err` when the call itself failed.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>>;
}
