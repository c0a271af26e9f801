/// Arrow representation of chart-ready aggregation output.
pub mod chart {
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::aggregate::CategorySummary;

    /// Schema for per-category sentiment percentages.
    pub fn category_summary_schema() -> Schema {
        Schema::new(vec![
            Field::new("category", DataType::Utf8, false),
            Field::new("positive_percentage", DataType::Float64, false),
            Field::new("negative_percentage", DataType::Float64, false),
            Field::new("neutral_percentage", DataType::Float64, false),
        ])
    }

    /// One row per summary, in the given order.
    pub fn summaries_to_batch(summaries: &[CategorySummary]) -> Result<RecordBatch, ArrowError> {
        let category: StringArray = summaries.iter().map(|s| Some(s.category.as_str())).collect();
        let positive: Float64Array = summaries.iter().map(|s| s.positive_percentage).collect();
        let negative: Float64Array = summaries.iter().map(|s| s.negative_percentage).collect();
        let neutral: Float64Array = summaries.iter().map(|s| s.neutral_percentage).collect();

        RecordBatch::try_new(
            Arc::new(category_summary_schema()),
            vec![
                Arc::new(category),
                Arc::new(positive),
                Arc::new(negative),
                Arc::new(neutral),
            ],
        )
    }
}
