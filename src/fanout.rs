//! Concurrent image generation for a set of art ideas.
//!
//! Each idea is rendered independently. A failed or empty render never
//! affects its siblings and never fails the batch: [`resolve_option`] maps
//! every [`ImageError`] to a placeholder photo.

use crate::ai::ImageGenerationService;
use crate::models::{ArtIdea, ArtworkOption, ArtworkSet, ARTWORK_COUNT};
use crate::placeholder::{PlaceholderCause, PlaceholderImages};
use rand::Rng;
use thiserror::Error;
use tracing::{error, warn};

/// Recoverable failure of one image render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image response contained no media")]
    MissingMedia,

    #[error("image generation failed: {0}")]
    Failed(String),
}

impl ImageError {
    fn cause(&self) -> PlaceholderCause {
        match self {
            ImageError::MissingMedia => PlaceholderCause::MissingMedia,
            ImageError::Failed(_) => PlaceholderCause::Failed,
        }
    }
}

/// Render one idea into an artwork option.
pub async fn render_option(
    service: &dyn ImageGenerationService,
    idea: &ArtIdea,
) -> Result<ArtworkOption, ImageError> {
    match service.generate_image(&idea.image_prompt).await {
        Ok(Some(image)) => Ok(ArtworkOption {
            description: idea.description.clone(),
            image,
        }),
        Ok(None) => Err(ImageError::MissingMedia),
        Err(e) => Err(ImageError::Failed(e.to_string())),
    }
}

/// Turn a render outcome into an artwork option, substituting a
/// placeholder image on error. The description always comes from `idea`.
pub fn resolve_option<R: Rng + ?Sized>(
    idea: &ArtIdea,
    index: usize,
    outcome: Result<ArtworkOption, ImageError>,
    placeholders: &PlaceholderImages,
    rng: &mut R,
) -> ArtworkOption {
    match outcome {
        Ok(option) => option,
        Err(err) => {
            match &err {
                ImageError::MissingMedia => warn!(
                    "[{}] Image generation returned no media for prompt \"{}\". Using placeholder.",
                    index, idea.image_prompt
                ),
                ImageError::Failed(reason) => error!(
                    "[{}] Error generating image for prompt \"{}\": {}. Using placeholder.",
                    index, idea.image_prompt, reason
                ),
            }

            ArtworkOption {
                description: idea.description.clone(),
                image: placeholders.url_for(err.cause(), &idea.image_prompt, index, rng),
            }
        }
    }
}

/// Render all ideas concurrently and wait for every render to settle.
pub async fn fan_out(
    service: &dyn ImageGenerationService,
    ideas: &[ArtIdea; ARTWORK_COUNT],
    placeholders: &PlaceholderImages,
) -> ArtworkSet {
    let (first, second, third) = tokio::join!(
        render_option(service, &ideas[0]),
        render_option(service, &ideas[1]),
        render_option(service, &ideas[2]),
    );

    let mut rng = rand::thread_rng();
    [(0, first), (1, second), (2, third)]
        .map(|(index, outcome)| resolve_option(&ideas[index], index, outcome, placeholders, &mut rng))
}
