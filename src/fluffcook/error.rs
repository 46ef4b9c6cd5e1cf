use crate::model::{Mode, RecipeId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FluffError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Invalid import file: {0}")]
    ImportParse(serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(String),
}

/// Failures of the acquisition pipeline.
///
/// All of them abort the operation before anything is committed to the
/// collection. Proxy failures are not listed here: they degrade the input
/// instead of failing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Please enter a URL or recipe text first.")]
    EmptyInput,

    #[error("API key missing. Save one with `fluffcook key <KEY>`.")]
    MissingApiKey,

    #[error("A {0} request is already in progress")]
    Busy(Mode),

    #[error("AI returned an empty response. Check API key or quota.")]
    EmptyResponse,

    #[error("Failed to parse recipe JSON. AI output was malformed.")]
    MalformedOutput,

    #[error("AI Error: {0}")]
    UpstreamRefused(String),

    #[error("Extraction failed: AI couldn't locate any ingredients or steps in that text.")]
    NoExtractableContent,

    #[error("Generation failed: AI did not return a titled recipe with ingredients.")]
    InvalidGeneration,

    #[error("Generation service unreachable: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, FluffError>;
