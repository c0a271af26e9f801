//! Typed prediction rows as returned by the classifier service.

use std::fmt;

use serde::{Serialize, Serializer};

/// A sentiment class emitted by the classifier.
///
/// The service only ever produces the three recognised labels, but bulk
/// responses are free-form CSV, so anything else is kept verbatim as
/// [`Sentiment::Unrecognized`] rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unrecognized(String),
}

impl Sentiment {
    pub const POSITIVE: &'static str = "POSITIVE";
    pub const NEGATIVE: &'static str = "NEGATIVE";
    pub const NEUTRAL: &'static str = "NEUTRAL";

    /// Parse a label as the service writes it. Surrounding whitespace is
    /// ignored; matching is case-sensitive.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            Self::POSITIVE => Self::Positive,
            Self::NEGATIVE => Self::Negative,
            Self::NEUTRAL => Self::Neutral,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => Self::POSITIVE,
            Self::Negative => Self::NEGATIVE,
            Self::Neutral => Self::NEUTRAL,
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A cell from a column the pipeline does not interpret.
///
/// Numeric-looking values are coerced to `f64`; everything else stays text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            // "inf"/"NaN" parse as floats but are words in a review table.
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }
}

/// One classified row of a bulk response.
///
/// `category` and `sentiment` are never coerced. An absent or empty category
/// is the empty string and groups as its own bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub category: String,
    pub sentiment: Sentiment,
    /// Remaining columns, in header order.
    pub extra: Vec<(String, Cell)>,
}

impl PredictionRecord {
    pub fn new(category: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            category: category.into(),
            sentiment,
            extra: Vec::new(),
        }
    }
}

/// Which input pathway is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    #[default]
    Unselected,
    Text,
    Bulk,
}

impl PredictionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unselected => "unselected",
            Self::Text => "text",
            Self::Bulk => "bulk",
        }
    }
}
