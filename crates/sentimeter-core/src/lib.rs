pub mod aggregate;
pub mod decode;
mod error;
pub mod record;
pub mod schema;
pub mod session;

pub use aggregate::{CategorySummary, SentimentDistribution, aggregate, distribution};
pub use decode::{DecodeOptions, Decoded, decode};
pub use error::{ConfigError, DecodeError, PartialDecodeWarning};
pub use record::{Cell, PredictionMode, PredictionRecord, Sentiment};
pub use schema::chart;
pub use session::{BulkResult, Channel, Event, SessionState, View, reduce};
