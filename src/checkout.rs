//! Mock checkout for a selected artwork.
//!
//! Form input is validated field by field; a valid order is "placed" after a
//! simulated processing delay. No payment provider is contacted and nothing
//! is stored.

use crate::error::FieldError;
use crate::models::ArtworkOption;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub card_number: String,
    /// `MM/YY`
    pub expiry_date: String,
    pub cvv: String,
}

fn card_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{16}$").expect("valid card number regex"))
}

fn expiry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry regex"))
}

fn cvv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3,4}$").expect("valid cvv regex"))
}

impl CheckoutForm {
    /// Check every field, returning all violations at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let mut min_len = |field: &'static str, value: &str, min: usize, message: &str| {
            if value.chars().count() < min {
                errors.push(FieldError {
                    field,
                    message: message.to_string(),
                });
            }
        };
        min_len(
            "fullName",
            &self.full_name,
            2,
            "Full name must be at least 2 characters.",
        );
        min_len("address", &self.address, 5, "Please enter a valid address.");
        min_len("city", &self.city, 2, "Please enter a valid city.");
        min_len(
            "postalCode",
            &self.postal_code,
            4,
            "Please enter a valid postal code.",
        );
        min_len("country", &self.country, 2, "Please enter a valid country.");

        let patterns: [(&'static str, &str, &Regex, &str); 3] = [
            (
                "cardNumber",
                &self.card_number,
                card_number_re(),
                "Invalid card number (must be 16 digits).",
            ),
            (
                "expiryDate",
                &self.expiry_date,
                expiry_re(),
                "Invalid expiry date (MM/YY).",
            ),
            ("cvv", &self.cvv, cvv_re(), "Invalid CVV (3 or 4 digits)."),
        ];
        for (field, value, re, message) in patterns {
            if !re.is_match(value) {
                errors.push(FieldError {
                    field,
                    message: message.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Checkout(errors))
        }
    }

    /// Card number with everything but the last four digits hidden.
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub artwork_description: String,
    pub ship_to: String,
    pub city: String,
    pub country: String,
    pub card: String,
}

pub struct Checkout {
    processing_delay: Duration,
}

impl Checkout {
    pub fn new(processing_delay: Duration) -> Self {
        Self { processing_delay }
    }

    /// Validate the form and confirm a simulated order for `artwork`.
    pub async fn place_order(
        &self,
        artwork: &ArtworkOption,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation> {
        form.validate()?;

        info!(
            "Processing order for {} ({}, {}), card {}",
            form.full_name,
            form.city,
            form.country,
            form.masked_card()
        );
        tokio::time::sleep(self.processing_delay).await;

        let confirmation = OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            artwork_description: artwork.description.clone(),
            ship_to: form.full_name.clone(),
            city: form.city.clone(),
            country: form.country.clone(),
            card: form.masked_card(),
        };
        info!("Order {} placed successfully", confirmation.order_id);

        Ok(confirmation)
    }
}
