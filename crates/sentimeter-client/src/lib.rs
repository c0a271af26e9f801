//! Classifier transport and the dispatcher that drives single-text and bulk predictions.

mod dispatcher;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

pub use dispatcher::{Dispatcher, Submission};
pub use error::{ClientError, DispatchError};
pub use service::{BulkUpload, PredictionService};

#[cfg(feature = "http")]
pub use http::HttpClassifier;
