//! Error type shared by the asset pipeline and the migration runner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Malformed game content: {0}")]
    MalformedContent(String),

    #[error("Cannot read game content at {path}: {source}")]
    ContentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Label '{0}' produces an empty file name")]
    EmptySlug(String),

    #[error("Labels '{first}' and '{second}' both map to file name '{slug}'")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{failed} {what} failed to generate")]
    GenerationFailed { failed: usize, what: &'static str },
}

pub type Result<T> = std::result::Result<T, AssetError>;
