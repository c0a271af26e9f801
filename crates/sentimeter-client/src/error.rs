use sentimeter_core::DecodeError;
use thiserror::Error;

/// Failure talking to the classifier service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("classifier reported an error: {0}")]
    Service(String),
    #[error("response carried no prediction")]
    MissingPrediction,
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid input: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Request(#[from] ClientError),
    #[error("could not decode predictions: {0}")]
    Decode(#[from] DecodeError),
}
