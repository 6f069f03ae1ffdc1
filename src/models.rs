//! Data models and structures
//!
//! Defines the birthdate and chart types, the art ideas and artwork options
//! passed between pipeline stages, and the environment configuration.

use crate::placeholder::PlaceholderPolicy;
use crate::{Error, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of art ideas requested per chart, and artwork options returned.
pub const ARTWORK_COUNT: usize = 3;

/// A fixed-size set of artwork options, one per generated idea.
pub type ArtworkSet = [ArtworkOption; ARTWORK_COUNT];

pub const EARLIEST_BIRTH_YEAR: i32 = 1900;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Birthdate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hour of birth in 24-hour format.
    pub hour: u32,
}

impl Birthdate {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// Validate against the current local year.
    pub fn validate(&self) -> Result<()> {
        self.validate_for_year(Local::now().year())
    }

    /// Validate with an explicit upper bound for the year.
    pub fn validate_for_year(&self, current_year: i32) -> Result<()> {
        if self.year < EARLIEST_BIRTH_YEAR {
            return Err(Error::InvalidBirthdate(format!(
                "Year must be {} or later.",
                EARLIEST_BIRTH_YEAR
            )));
        }
        if self.year > current_year {
            return Err(Error::InvalidBirthdate(
                "Year cannot be in the future.".to_string(),
            ));
        }
        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidBirthdate(format!(
                "Month {} is out of range 1-12.",
                self.month
            )));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(Error::InvalidBirthdate(
                "Invalid day for the selected month and year.".to_string(),
            ));
        }
        if self.hour > 23 {
            return Err(Error::InvalidBirthdate(format!(
                "Hour {} is out of range 0-23.",
                self.hour
            )));
        }
        Ok(())
    }
}

/// Ba Zi chart: one short stem/branch token per pillar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FourPillarChart {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
}

impl FourPillarChart {
    pub fn pillars(&self) -> [&str; 4] {
        [&self.year, &self.month, &self.day, &self.hour]
    }
}

/// Intermediate idea produced by the text model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtIdea {
    pub description: String,
    pub image_prompt: String,
}

/// Final artwork option: a description and either a data URI or a
/// placeholder photo URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtworkOption {
    pub description: String,
    pub image: String,
}

impl ArtworkOption {
    pub fn is_generated(&self) -> bool {
        self.image.starts_with("data:")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub idea_model: String,
    pub image_model: String,
    pub placeholder_base_url: String,
    pub placeholder_policy: PlaceholderPolicy,
    pub checkout_delay: Duration,
    pub dry_run: bool,
}

pub const DEFAULT_IDEA_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_PLACEHOLDER_BASE_URL: &str = "https://picsum.photos";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = match lookup("DRY_RUN") {
            Some(value) => parse_bool("DRY_RUN", &value)?,
            None => false,
        };

        let gemini_api_key = lookup("GOOGLE_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if gemini_api_key.is_none() && !dry_run {
            return Err(Error::Config(
                "GOOGLE_API_KEY (or GEMINI_API_KEY) not set".to_string(),
            ));
        }

        let placeholder_policy = match lookup("PLACEHOLDER_SEED") {
            Some(value) => value.parse()?,
            None => PlaceholderPolicy::default(),
        };

        let checkout_delay = match lookup("CHECKOUT_DELAY_MS") {
            Some(value) => Duration::from_millis(value.trim().parse().map_err(|_| {
                Error::Config(format!("CHECKOUT_DELAY_MS must be an integer, got '{}'", value))
            })?),
            None => Duration::from_millis(2000),
        };

        Ok(Self {
            gemini_api_key,
            idea_model: lookup("IDEA_MODEL").unwrap_or_else(|| DEFAULT_IDEA_MODEL.to_string()),
            image_model: lookup("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            placeholder_base_url: lookup("PLACEHOLDER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_BASE_URL.to_string()),
            placeholder_policy,
            checkout_delay,
            dry_run,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
