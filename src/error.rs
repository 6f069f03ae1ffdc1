//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

/// One rejected checkout field and the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Art idea generation failed: {0}")]
    IdeaGeneration(String),

    #[error("Invalid birthdate: {0}")]
    InvalidBirthdate(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Checkout validation failed: {}", join_field_errors(.0))]
    Checkout(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// A failure the user only sees as `message`; `source` carries the details for logs.
    #[error("{message}")]
    UserFacing {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
