use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Upstream API returned an error: {0}")]
    UpstreamError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Price transformation error: {0}")]
    TransformationError(String),

    #[error("Country with upstream code {0} not found")]
    CountryNotFound(i32),
}
