use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathwiseError {
    /// Malformed statistic parameters, e.g. an overlap larger than either set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Pathway catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis scheduler has shut down")]
    SchedulerClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PathwiseError {
    /// Shorthand used by the numeric code paths.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PathwiseError>;
