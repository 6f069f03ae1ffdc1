//! Application wiring: builds the AI clients from configuration and runs
//! the session flow for one birthdate.

use crate::ai::{
    GeminiIdeaClient, GeminiImageClient, IdeaService, ImageGenerationService, MockIdeaClient,
    MockImageClient,
};
use crate::checkout::Checkout;
use crate::elements::ElementBalance;
use crate::models::{ArtworkSet, Birthdate, Config, FourPillarChart};
use crate::pipeline::ArtGenerator;
use crate::placeholder::PlaceholderImages;
use crate::session::Session;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything produced for one birthdate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub birthdate: Birthdate,
    pub chart: FourPillarChart,
    pub elements: ElementBalance,
    pub artworks: ArtworkSet,
}

/// Owns the art generator and the checkout for the life of the process.
pub struct App {
    generator: ArtGenerator,
    checkout: Checkout,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub ideas: Box<dyn IdeaService>,
    pub images: Box<dyn ImageGenerationService>,
    pub placeholders: PlaceholderImages,
    pub checkout: Checkout,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            generator: ArtGenerator::new(services.ideas, services.images, services.placeholders),
            checkout: services.checkout,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (ideas, images): (Box<dyn IdeaService>, Box<dyn ImageGenerationService>) =
            if config.dry_run {
                info!("DRY_RUN enabled, using built-in mock AI clients");
                (Box::new(MockIdeaClient::new()), Box::new(MockImageClient::new()))
            } else {
                let api_key = config.gemini_api_key.clone().ok_or_else(|| {
                    Error::Config("GOOGLE_API_KEY (or GEMINI_API_KEY) not set".to_string())
                })?;

                // Reuse one HTTP connection pool across both clients.
                let http_client = reqwest::Client::new();
                info!("Idea model: {}", config.idea_model);
                info!("Image model: {}", config.image_model);
                (
                    Box::new(GeminiIdeaClient::new_with_client(
                        api_key.clone(),
                        config.idea_model.clone(),
                        http_client.clone(),
                    )),
                    Box::new(GeminiImageClient::new_with_client(
                        api_key,
                        config.image_model.clone(),
                        http_client,
                    )),
                )
            };

        Ok(Self::with_services(AppServices {
            ideas,
            images,
            placeholders: PlaceholderImages::new(
                config.placeholder_base_url.clone(),
                config.placeholder_policy,
            ),
            checkout: Checkout::new(config.checkout_delay),
        }))
    }

    pub fn generator(&self) -> &ArtGenerator {
        &self.generator
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Walk a fresh session from birthdate to recommendations.
    ///
    /// A failed step comes back as [`Error::UserFacing`] carrying the
    /// session's generic message, with the detailed error as its source.
    pub async fn run(&self, birthdate: Birthdate) -> Result<Report> {
        let mut session = Session::new();

        let chart = session
            .submit_birthdate(birthdate)
            .cloned()
            .map_err(|e| user_facing(&session, e))?;
        info!(
            "Chart: year {} month {} day {} hour {}",
            chart.year, chart.month, chart.day, chart.hour
        );

        let elements = session.show_dashboard()?;
        info!(
            "Element balance: dominant {:?} ({:.0}%)",
            elements.dominant(),
            elements.get(elements.dominant())
        );

        let artworks = session
            .generate_art(&self.generator)
            .await
            .cloned()
            .map_err(|e| user_facing(&session, e))?;

        Ok(Report {
            birthdate,
            chart,
            elements,
            artworks,
        })
    }
}

fn user_facing(session: &Session, err: Error) -> Error {
    match session.error_message() {
        Some(message) => Error::UserFacing {
            message: message.to_string(),
            source: Box::new(err),
        },
        None => err,
    }
}
