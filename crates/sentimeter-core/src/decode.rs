//! CSV response decoding.
//!
//! The bulk endpoint answers with the uploaded table plus a predicted
//! sentiment column. The first line is the header; rows are comma-delimited
//! with standard double-quote escaping. Rows that do not line up with the
//! header are skipped and counted instead of failing the whole response.
//!
//! A quote that is never closed runs to the end of the body: every line after
//! it becomes part of one field, so that row and all rows after it are lost
//! and counted as a single skip.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, DecodeError, PartialDecodeWarning};
use crate::record::{Cell, PredictionRecord, Sentiment};

pub const DEFAULT_CATEGORY_COLUMN: &str = "categories";
pub const DEFAULT_SENTIMENT_COLUMN: &str = "Predicted sentiment";

/// Which response columns carry the category and the predicted sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DecodeOptions {
    #[serde(default = "default_category_column")]
    pub category_column: String,
    #[serde(default = "default_sentiment_column")]
    pub sentiment_column: String,
}

fn default_category_column() -> String {
    DEFAULT_CATEGORY_COLUMN.to_string()
}

fn default_sentiment_column() -> String {
    DEFAULT_SENTIMENT_COLUMN.to_string()
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            category_column: default_category_column(),
            sentiment_column: default_sentiment_column(),
        }
    }
}

impl DecodeOptions {
    pub fn new(
        category_column: impl Into<String>,
        sentiment_column: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self {
            category_column: category_column.into(),
            sentiment_column: sentiment_column.into(),
        }
        .validated()
    }

    /// Parse options from JSON such as
    /// `{"categoryColumn": "categories", "sentimentColumn": "Predicted sentiment"}`.
    ///
    /// Missing keys take their defaults; any other key is rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.category_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName("categoryColumn"));
        }
        if self.sentiment_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName("sentimentColumn"));
        }
        Ok(self)
    }
}

/// Records decoded from one response, in input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub records: Vec<PredictionRecord>,
    pub warning: Option<PartialDecodeWarning>,
}

impl Decoded {
    pub fn skipped(&self) -> usize {
        self.warning.map(|w| w.skipped).unwrap_or(0)
    }
}

/// Decode a CSV response body into prediction records.
///
/// Fails only when the body is blank or a required column is absent from the
/// header. Individual rows with the wrong field count, or that cannot be read
/// at all, are skipped and reported through [`Decoded::warning`].
pub fn decode(body: &str, options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    if body.trim().is_empty() {
        return Err(DecodeError::EmptyBody);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let width = headers.len();
    let category_idx = column_index(&headers, &options.category_column)?;
    let sentiment_idx = column_index(&headers, &options.sentiment_column)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in reader.records().enumerate() {
        let row_no = row + 1;
        let fields = match result {
            Ok(fields) => fields,
            Err(err) => {
                debug!(row = row_no, error = %err, "skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        if fields.len() != width {
            debug!(
                row = row_no,
                expected = width,
                found = fields.len(),
                "skipping row with mismatched column count"
            );
            skipped += 1;
            continue;
        }

        let extra = headers
            .iter()
            .zip(fields.iter())
            .enumerate()
            .filter(|(i, _)| *i != category_idx && *i != sentiment_idx)
            .map(|(_, (name, value))| (name.to_string(), Cell::coerce(value)))
            .collect();

        records.push(PredictionRecord {
            category: fields[category_idx].to_string(),
            sentiment: Sentiment::parse(&fields[sentiment_idx]),
            extra,
        });
    }

    let warning = if skipped > 0 {
        warn!(skipped, decoded = records.len(), "partial decode");
        Some(PartialDecodeWarning { skipped })
    } else {
        None
    };

    Ok(Decoded { records, warning })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DecodeError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DecodeError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,categories,reviews.text,Predicted sentiment\n";

    fn body(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for row in rows {
            s.push_str(row);
            s.push('\n');
        }
        s
    }

    #[test]
    fn decodes_rows_in_order() {
        let input = body(&[
            "1,Electronics,love it,POSITIVE",
            "2,Books,meh,NEUTRAL",
            "3,Electronics,broke after a week,NEGATIVE",
        ]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();

        assert!(decoded.warning.is_none());
        let cats: Vec<&str> = decoded.records.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, ["Electronics", "Books", "Electronics"]);
        assert_eq!(decoded.records[1].sentiment, Sentiment::Neutral);
        assert_eq!(decoded.records[2].sentiment, Sentiment::Negative);
    }

    #[test]
    fn ignored_columns_are_coerced() {
        let input = body(&["7,Books,fine,POSITIVE"]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        let rec = &decoded.records[0];
        assert_eq!(
            rec.extra,
            vec![
                ("id".to_string(), Cell::Number(7.0)),
                ("reviews.text".to_string(), Cell::Text("fine".into())),
            ]
        );
    }

    #[test]
    fn category_and_sentiment_stay_strings() {
        let input = body(&["1,2024,ok,3"]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.records[0].category, "2024");
        assert_eq!(
            decoded.records[0].sentiment,
            Sentiment::Unrecognized("3".into())
        );
    }

    #[test]
    fn quoted_fields_with_commas_and_quotes() {
        let input = body(&[r#"1,"Home, Garden","said ""wow"", then left",POSITIVE"#]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].category, "Home, Garden");
        assert_eq!(
            decoded.records[0].extra[1].1,
            Cell::Text(r#"said "wow", then left"#.into())
        );
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let input = body(&[
            "1,Electronics,great,POSITIVE",
            "2,Electronics,bad,NEGATIVE,surplus",
            "3,Books,ok,NEUTRAL",
            "4,Books",
        ]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.warning, Some(PartialDecodeWarning { skipped: 2 }));
        assert_eq!(decoded.skipped(), 2);
    }

    #[test]
    fn unclosed_quote_swallows_the_rest_of_the_body() {
        let input = body(&[
            "1,Electronics,great,POSITIVE",
            r#"2,Books,"never closed,NEGATIVE"#,
            "3,Books,fine,NEUTRAL",
            "4,Toys,fun,POSITIVE",
        ]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].category, "Electronics");
        assert_eq!(decoded.warning, Some(PartialDecodeWarning { skipped: 1 }));
    }

    #[test]
    fn empty_category_is_kept() {
        let input = body(&["1,,no category,POSITIVE"]);
        let decoded = decode(&input, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.records[0].category, "");
    }

    #[test]
    fn header_only_yields_no_records() {
        let decoded = decode(HEADER, &DecodeOptions::default()).unwrap();
        assert!(decoded.records.is_empty());
        assert!(decoded.warning.is_none());
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(matches!(
            decode("", &DecodeOptions::default()),
            Err(DecodeError::EmptyBody)
        ));
        assert!(matches!(
            decode("  \n", &DecodeOptions::default()),
            Err(DecodeError::EmptyBody)
        ));
    }

    #[test]
    fn missing_sentiment_column_is_an_error() {
        let input = "id,categories,reviews.text\n1,Books,fine\n";
        match decode(input, &DecodeOptions::default()) {
            Err(DecodeError::MissingColumn(name)) => assert_eq!(name, "Predicted sentiment"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn custom_columns() {
        let options = DecodeOptions::new("brand", "label").unwrap();
        let input = "brand,label\nAcme,NEGATIVE\n";
        let decoded = decode(input, &options).unwrap();
        assert_eq!(decoded.records[0].category, "Acme");
        assert_eq!(decoded.records[0].sentiment, Sentiment::Negative);
        assert!(decoded.records[0].extra.is_empty());
    }

    #[test]
    fn options_from_json() {
        let options =
            DecodeOptions::from_json(r#"{"categoryColumn": "brand", "sentimentColumn": "label"}"#)
                .unwrap();
        assert_eq!(options.category_column, "brand");
        assert_eq!(options.sentiment_column, "label");

        let defaults = DecodeOptions::from_json("{}").unwrap();
        assert_eq!(defaults, DecodeOptions::default());
    }

    #[test]
    fn options_reject_unknown_keys() {
        let err = DecodeOptions::from_json(r#"{"ratingColumn": "stars"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn options_reject_empty_names() {
        assert!(matches!(
            DecodeOptions::new("", "label"),
            Err(ConfigError::EmptyColumnName("categoryColumn"))
        ));
        assert!(matches!(
            DecodeOptions::from_json(r#"{"sentimentColumn": " "}"#),
            Err(ConfigError::EmptyColumnName("sentimentColumn"))
        ));
    }
}
