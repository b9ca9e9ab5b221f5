use thiserror::Error;

/// Errors that can occur while converting a recipe to pesto
#[derive(Error, Debug)]
pub enum PestoError {
    /// An ingredient line could not be turned into an ingredient record
    #[error("Failed to parse ingredient {line:?}: {reason}")]
    ParseFailure { line: String, reason: String },

    /// The record lacks `recipeIngredient` or `recipeInstructions`
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A field of the record has a shape we cannot interpret
    #[error("Invalid recipe record: {0}")]
    InvalidRecord(String),

    /// Failed to fetch recipe page from URL
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// No JSON-LD script on the page described a recipe
    #[error("No valid recipe found in any JSON-LD script")]
    NoRecipeFound,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read a recipe record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PestoError {
    pub(crate) fn parse_failure(line: &str, reason: impl Into<String>) -> Self {
        PestoError::ParseFailure {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
