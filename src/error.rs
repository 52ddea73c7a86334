use thiserror::Error;

/// Main error type for Classlens operations
#[derive(Error, Debug)]
pub enum ClasslensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Malformed class summary: {0}")]
    MalformedSummary(String),
}

pub type Result<T> = std::result::Result<T, ClasslensError>;
