//! User session flow: birthdate → chart → dashboard → recommendations → checkout.
//!
//! [`Step::transition`] is the single transition table; [`Session`] owns the
//! data collected along the way and the one user-facing error message.

use crate::bazi;
use crate::checkout::{Checkout, CheckoutForm, OrderConfirmation};
use crate::elements::{element_balance, ElementBalance};
use crate::models::{ArtworkOption, ArtworkSet, Birthdate, FourPillarChart, ARTWORK_COUNT};
use crate::pipeline::ArtGenerator;
use crate::{Error, Result};
use serde::Serialize;
use tracing::{error, info};

pub const BIRTHDATE_ERROR_MESSAGE: &str = "Failed to convert birthdate. Please try again.";
pub const ART_ERROR_MESSAGE: &str = "Failed to generate artwork recommendations. Please try again.";
pub const CHECKOUT_ERROR_MESSAGE: &str = "Failed to place your order. Please check your details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Birthdate,
    Bazi,
    Dashboard,
    Recommendations,
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    ChartReady,
    ShowDashboard,
    ArtReady,
    SelectArtwork,
    OrderPlaced,
    Back,
}

impl Step {
    pub fn transition(self, event: FlowEvent) -> Result<Step> {
        use FlowEvent::*;
        match (self, event) {
            (Step::Birthdate, ChartReady) => Ok(Step::Bazi),
            (Step::Bazi, ShowDashboard) => Ok(Step::Dashboard),
            (Step::Dashboard, ArtReady) => Ok(Step::Recommendations),
            (Step::Recommendations, SelectArtwork) => Ok(Step::Checkout),
            (Step::Checkout, OrderPlaced) => Ok(Step::Birthdate),
            (Step::Bazi, Back) => Ok(Step::Birthdate),
            (Step::Dashboard, Back) => Ok(Step::Bazi),
            (Step::Recommendations, Back) => Ok(Step::Dashboard),
            (Step::Checkout, Back) => Ok(Step::Recommendations),
            (step, event) => Err(Error::InvalidTransition(format!(
                "{:?} is not allowed from the {:?} step",
                event, step
            ))),
        }
    }
}

/// State of one user's walk through the flow.
#[derive(Debug, Clone)]
pub struct Session {
    step: Step,
    birthdate: Option<Birthdate>,
    chart: Option<FourPillarChart>,
    recommendations: Option<ArtworkSet>,
    selected: Option<ArtworkOption>,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            step: Step::Birthdate,
            birthdate: None,
            chart: None,
            recommendations: None,
            selected: None,
            error: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn birthdate(&self) -> Option<&Birthdate> {
        self.birthdate.as_ref()
    }

    pub fn chart(&self) -> Option<&FourPillarChart> {
        self.chart.as_ref()
    }

    pub fn recommendations(&self) -> Option<&ArtworkSet> {
        self.recommendations.as_ref()
    }

    pub fn selected_artwork(&self) -> Option<&ArtworkOption> {
        self.selected.as_ref()
    }

    /// Message to show the user for the last failed action, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Element balance for the dashboard; available once a chart exists.
    pub fn element_balance(&self) -> Option<ElementBalance> {
        self.chart.as_ref().map(element_balance)
    }

    fn advance(&mut self, event: FlowEvent) -> Result<()> {
        let next = self.step.transition(event)?;
        info!("Session step {:?} -> {:?}", self.step, next);
        self.step = next;
        Ok(())
    }

    fn fail<T>(&mut self, message: &str, err: Error) -> Result<T> {
        self.error = Some(message.to_string());
        Err(err)
    }

    pub fn submit_birthdate(&mut self, birthdate: Birthdate) -> Result<&FourPillarChart> {
        self.error = None;
        self.step.transition(FlowEvent::ChartReady)?;

        match bazi::lookup_chart(&birthdate) {
            Ok(chart) => {
                self.advance(FlowEvent::ChartReady)?;
                self.birthdate = Some(birthdate);
                Ok(&*self.chart.insert(chart))
            }
            Err(e) => {
                error!("Error converting birthdate: {}", e);
                self.fail(BIRTHDATE_ERROR_MESSAGE, e)
            }
        }
    }

    pub fn show_dashboard(&mut self) -> Result<ElementBalance> {
        self.error = None;
        let balance = self.element_balance().ok_or_else(|| {
            Error::InvalidTransition("No chart available for the dashboard".to_string())
        })?;
        self.advance(FlowEvent::ShowDashboard)?;
        Ok(balance)
    }

    /// Generate recommendations for the session's chart.
    ///
    /// On failure the detailed error is logged, the user sees a generic
    /// message, and the session stays on the dashboard.
    pub async fn generate_art(&mut self, generator: &ArtGenerator) -> Result<&ArtworkSet> {
        self.error = None;
        self.step.transition(FlowEvent::ArtReady)?;
        let chart = self.chart.clone().ok_or_else(|| {
            Error::InvalidTransition("No chart available for art generation".to_string())
        })?;

        match generator.generate_art(&chart).await {
            Ok(options) => {
                self.advance(FlowEvent::ArtReady)?;
                Ok(&*self.recommendations.insert(options))
            }
            Err(e) => {
                error!("Error generating Feng Shui art: {}", e);
                self.fail(ART_ERROR_MESSAGE, e)
            }
        }
    }

    pub fn select_artwork(&mut self, index: usize) -> Result<&ArtworkOption> {
        self.error = None;
        self.step.transition(FlowEvent::SelectArtwork)?;
        let option = self
            .recommendations
            .as_ref()
            .and_then(|options| options.get(index))
            .cloned()
            .ok_or_else(|| {
                Error::InvalidTransition(format!(
                    "Artwork {} does not exist (choose 0-{})",
                    index,
                    ARTWORK_COUNT - 1
                ))
            })?;

        self.advance(FlowEvent::SelectArtwork)?;
        Ok(&*self.selected.insert(option))
    }

    /// Place the mock order and start over with an empty session.
    pub async fn submit_checkout(
        &mut self,
        checkout: &Checkout,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation> {
        self.error = None;
        self.step.transition(FlowEvent::OrderPlaced)?;
        let artwork = self.selected.clone().ok_or_else(|| {
            Error::Invariant("Checkout step reached without a selected artwork".to_string())
        })?;

        match checkout.place_order(&artwork, form).await {
            Ok(confirmation) => {
                self.advance(FlowEvent::OrderPlaced)?;
                self.birthdate = None;
                self.chart = None;
                self.recommendations = None;
                self.selected = None;
                Ok(confirmation)
            }
            Err(e) => {
                error!("Checkout failed: {}", e);
                self.fail(CHECKOUT_ERROR_MESSAGE, e)
            }
        }
    }

    pub fn back(&mut self) -> Result<Step> {
        self.error = None;
        self.advance(FlowEvent::Back)?;
        Ok(self.step)
    }
}
