use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is empty")]
    EmptyBody,

    #[error("response is missing required column {0:?}")]
    MissingColumn(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("column name for {0} must not be empty")]
    EmptyColumnName(&'static str),

    #[error("invalid decode options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rows were dropped while decoding; the rest decoded normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PartialDecodeWarning {
    pub skipped: usize,
}

impl std::fmt::Display for PartialDecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped {} malformed row(s)", self.skipped)
    }
}
