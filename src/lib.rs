//! Feng Shui art generator
//!
//! Turns a birthdate into a Ba Zi (Four Pillars) chart and an element
//! balance, asks a generative model for three painting ideas keyed to the
//! chart, renders each idea concurrently with placeholder fallbacks, and
//! offers a mock checkout for the chosen painting.

pub mod ai;
pub mod app;
pub mod bazi;
pub mod checkout;
pub mod elements;
pub mod error;
pub mod fanout;
pub mod models;
pub mod pipeline;
pub mod placeholder;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
