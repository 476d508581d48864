use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid initial condition: {0}")]
    InvalidInitialCondition(String),

    #[error("Invalid horizon: {0} days (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Fetch error: {0}")]
    FetchError(#[from] crate::remote::FetchError),
}

pub type Result<T> = std::result::Result<T, SimError>;
