//! Per-category sentiment aggregation.
//!
//! Groups prediction records by category (first-seen order) and turns label
//! counts into percentages of the group size. Records with an unrecognised
//! sentiment count towards the group size but towards no label, so such a
//! group's three percentages sum to less than 100.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::{PredictionRecord, Sentiment};

/// Sentiment breakdown for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

/// Label counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub unrecognized: usize,
    pub total: usize,
}

impl SentimentDistribution {
    fn add(&mut self, sentiment: &Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Unrecognized(_) => self.unrecognized += 1,
        }
        self.total += 1;
    }

    /// Share of `total` carrying `sentiment`, in `[0, 100]`.
    ///
    /// Every unrecognised label is pooled together. Zero when `total` is zero.
    pub fn percentage(&self, sentiment: &Sentiment) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
            Sentiment::Unrecognized(_) => self.unrecognized,
        };
        percent(count, self.total)
    }

    /// Share of `total` whose label was not one of the three recognised ones.
    pub fn unrecognized_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        percent(self.unrecognized, self.total)
    }
}

fn percent(count: usize, n: usize) -> f64 {
    (count as f64 / n as f64) * 100.0
}

/// Summarise records per category.
///
/// Yields exactly one summary per distinct category, in the order each
/// category first appears. Pure: the same input always gives bit-identical
/// output.
pub fn aggregate(records: &[PredictionRecord]) -> Vec<CategorySummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, SentimentDistribution> = HashMap::new();

    for record in records {
        let key = record.category.as_str();
        counts
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                SentimentDistribution::default()
            })
            .add(&record.sentiment);
    }

    order
        .into_iter()
        .map(|category| {
            // Every key in `order` was inserted with at least one record.
            let dist = counts[category];
            CategorySummary {
                category: category.to_string(),
                positive_percentage: percent(dist.positive, dist.total),
                negative_percentage: percent(dist.negative, dist.total),
                neutral_percentage: percent(dist.neutral, dist.total),
            }
        })
        .collect()
}

/// Label counts across all records, regardless of category.
pub fn distribution(records: &[PredictionRecord]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for record in records {
        dist.add(&record.sentiment);
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(category: &str, sentiment: &str) -> PredictionRecord {
        PredictionRecord::new(category, Sentiment::parse(sentiment))
    }

    fn total(s: &CategorySummary) -> f64 {
        s.positive_percentage + s.negative_percentage + s.neutral_percentage
    }

    #[test]
    fn two_categories_scenario() {
        let records = vec![
            rec("A", "POSITIVE"),
            rec("A", "NEGATIVE"),
            rec("B", "NEUTRAL"),
        ];
        let summaries = aggregate(&records);
        assert_eq!(
            summaries,
            vec![
                CategorySummary {
                    category: "A".into(),
                    positive_percentage: 50.0,
                    negative_percentage: 50.0,
                    neutral_percentage: 0.0,
                },
                CategorySummary {
                    category: "B".into(),
                    positive_percentage: 0.0,
                    negative_percentage: 0.0,
                    neutral_percentage: 100.0,
                },
            ]
        );
    }

    #[test]
    fn unrecognised_sentiment_lowers_the_sum() {
        let records = vec![rec("A", "POSITIVE"), rec("A", "MIXED"), rec("A", "POSITIVE")];
        let summaries = aggregate(&records);
        assert_eq!(summaries.len(), 1);
        let a = &summaries[0];
        assert!((a.positive_percentage - 66.67).abs() < 0.01);
        assert_eq!(a.negative_percentage, 0.0);
        assert_eq!(a.neutral_percentage, 0.0);
        assert!(total(a) < 100.0);
    }

    #[test]
    fn recognised_groups_sum_to_one_hundred() {
        let labels = ["POSITIVE", "NEGATIVE", "NEUTRAL"];
        let records: Vec<PredictionRecord> = (0..97)
            .map(|i| rec(["x", "y", "z", "w"][i % 4], labels[(i * 7 + i / 3) % 3]))
            .collect();
        for summary in aggregate(&records) {
            assert!(
                (total(&summary) - 100.0).abs() < 1e-9,
                "{} sums to {}",
                summary.category,
                total(&summary)
            );
        }
    }

    #[test]
    fn one_summary_per_distinct_category() {
        let records = vec![
            rec("b", "POSITIVE"),
            rec("a", "POSITIVE"),
            rec("b", "NEGATIVE"),
            rec("", "NEUTRAL"),
            rec("c", "NEUTRAL"),
            rec("a", "MIXED"),
        ];
        let summaries = aggregate(&records);
        let cats: Vec<&str> = summaries.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(cats, ["b", "a", "", "c"]);
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let records = vec![
            rec("A", "POSITIVE"),
            rec("B", "NEGATIVE"),
            rec("A", "NEUTRAL"),
            rec("A", "NEGATIVE"),
            rec("B", "??"),
        ];
        let first = aggregate(&records);
        let second = aggregate(&records);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.category, y.category);
            assert_eq!(x.positive_percentage.to_bits(), y.positive_percentage.to_bits());
            assert_eq!(x.negative_percentage.to_bits(), y.negative_percentage.to_bits());
            assert_eq!(x.neutral_percentage.to_bits(), y.neutral_percentage.to_bits());
        }
    }

    #[test]
    fn distribution_counts_all_labels() {
        let records = vec![
            rec("A", "POSITIVE"),
            rec("B", "POSITIVE"),
            rec("A", "NEGATIVE"),
            rec("C", "MIXED"),
        ];
        let dist = distribution(&records);
        assert_eq!(
            dist,
            SentimentDistribution {
                positive: 2,
                negative: 1,
                neutral: 0,
                unrecognized: 1,
                total: 4,
            }
        );
        assert_eq!(dist.percentage(&Sentiment::Positive), 50.0);
        assert_eq!(dist.percentage(&Sentiment::Unrecognized("X".into())), 25.0);
        assert_eq!(dist.unrecognized_percentage(), 25.0);
    }

    #[test]
    fn empty_distribution_has_zero_percentages() {
        let dist = distribution(&[]);
        assert_eq!(dist.total, 0);
        assert_eq!(dist.percentage(&Sentiment::Neutral), 0.0);
        assert_eq!(dist.unrecognized_percentage(), 0.0);
    }

    #[test]
    fn summaries_serialise_with_chart_keys() {
        let summaries = aggregate(&[rec("A", "POSITIVE")]);
        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(json["category"], "A");
        assert_eq!(json["positivePercentage"], 100.0);
        assert_eq!(json["neutralPercentage"], 0.0);
    }
}
