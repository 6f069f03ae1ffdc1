//! Art generation for a chart: ideas first, then images for every idea.

use crate::ai::{IdeaService, ImageGenerationService};
use crate::fanout;
use crate::models::{ArtIdea, ArtworkSet, FourPillarChart, ARTWORK_COUNT};
use crate::placeholder::PlaceholderImages;
use crate::{Error, Result};
use tracing::{error, info};

/// Progress of one [`ArtGenerator::generate_art`] call. Single pass, no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    AwaitingIdeas,
    AwaitingImages,
    Done,
}

impl GenerationStage {
    pub fn next(self) -> Self {
        match self {
            GenerationStage::AwaitingIdeas => GenerationStage::AwaitingImages,
            GenerationStage::AwaitingImages | GenerationStage::Done => GenerationStage::Done,
        }
    }
}

/// Runs the idea and image services for a chart.
pub struct ArtGenerator {
    ideas: Box<dyn IdeaService>,
    images: Box<dyn ImageGenerationService>,
    placeholders: PlaceholderImages,
}

impl ArtGenerator {
    pub fn new(
        ideas: Box<dyn IdeaService>,
        images: Box<dyn ImageGenerationService>,
        placeholders: PlaceholderImages,
    ) -> Self {
        Self {
            ideas,
            images,
            placeholders,
        }
    }

    /// Generate exactly three artwork options for `chart`.
    ///
    /// Fails with [`Error::IdeaGeneration`] when the text model errors or
    /// does not return exactly three ideas. Image failures never fail the
    /// call; they are replaced by placeholder photos.
    pub async fn generate_art(&self, chart: &FourPillarChart) -> Result<ArtworkSet> {
        let mut stage = GenerationStage::AwaitingIdeas;
        info!(
            "[{:?}] Requesting art ideas for chart {} {} {} {}",
            stage, chart.year, chart.month, chart.day, chart.hour
        );

        let ideas = self.request_ideas(chart).await?;

        stage = stage.next();
        info!("[{:?}] Generating {} images", stage, ARTWORK_COUNT);
        let options = fanout::fan_out(self.images.as_ref(), &ideas, &self.placeholders).await;

        stage = stage.next();
        let generated = options.iter().filter(|o| o.is_generated()).count();
        info!(
            "[{:?}] Art generation complete: {} generated, {} placeholders",
            stage,
            generated,
            ARTWORK_COUNT - generated
        );

        Ok(options)
    }

    async fn request_ideas(&self, chart: &FourPillarChart) -> Result<[ArtIdea; ARTWORK_COUNT]> {
        let ideas = self.ideas.generate_ideas(chart).await.map_err(|e| {
            error!("Failed to generate art ideas: {}", e);
            Error::IdeaGeneration(e.to_string())
        })?;

        ideas.try_into().map_err(|ideas: Vec<ArtIdea>| {
            error!(
                "Failed to generate the required number of art ideas. Received: {:?}",
                ideas
            );
            Error::IdeaGeneration(format!(
                "The AI did not return {} options (received {}).",
                ARTWORK_COUNT,
                ideas.len()
            ))
        })
    }
}
