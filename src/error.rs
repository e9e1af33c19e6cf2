//! Error handling and custom error types
//!
//! Provides unified error handling across the gateway using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Image service error: {0}")]
    ImageService(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
