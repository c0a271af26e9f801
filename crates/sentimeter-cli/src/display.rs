//! Terminal rendering for text verdicts and bulk summaries.
//!
//! Bulk summaries are converted to an Arrow batch and pretty-printed as a
//! table, followed by the overall distribution across every row.

use std::fmt::Write;

use arrow::util::pretty::pretty_format_batches;
use sentimeter_core::{BulkResult, Sentiment, SentimentDistribution, chart};

// ── Public API ──

pub fn print_verdict(verdict: &Sentiment) {
    println!("{}", render_verdict(verdict));
}

pub fn print_bulk_result(result: &BulkResult) -> anyhow::Result<()> {
    print!("{}", render_bulk_result(result)?);
    Ok(())
}

pub fn print_json(result: &BulkResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

// ── Verdict ──

/// Badge colour for a verdict: red for negative, green for positive, orange
/// for anything else.
pub fn badge_color(verdict: &Sentiment) -> &'static str {
    match verdict {
        Sentiment::Negative => "red",
        Sentiment::Positive => "green",
        _ => "orange",
    }
}

pub fn render_verdict(verdict: &Sentiment) -> String {
    format!("({}) {}", badge_color(verdict), verdict)
}

// ── Bulk ──

pub fn render_bulk_result(result: &BulkResult) -> anyhow::Result<String> {
    let mut out = String::new();

    if result.summaries.is_empty() {
        writeln!(out, "No rows to summarise.")?;
    } else {
        let batch = chart::summaries_to_batch(&result.summaries)?;
        writeln!(out, "{}", pretty_format_batches(&[batch])?)?;
    }

    writeln!(out)?;
    write!(out, "{}", render_distribution(&result.distribution)?)?;

    if let Some(warning) = result.warning {
        writeln!(out)?;
        writeln!(out, "warning: {warning}")?;
    }
    Ok(out)
}

fn render_distribution(dist: &SentimentDistribution) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Sentiment Distribution ({} rows)", dist.total)?;

    let rows = [
        (Sentiment::POSITIVE, dist.positive, Sentiment::Positive),
        (Sentiment::NEGATIVE, dist.negative, Sentiment::Negative),
        (Sentiment::NEUTRAL, dist.neutral, Sentiment::Neutral),
    ];
    for (label, count, sentiment) in rows {
        writeln!(
            out,
            "  {:<26} {:>6}  {:>5.1}%",
            label,
            count,
            dist.percentage(&sentiment)
        )?;
    }
    if dist.unrecognized > 0 {
        writeln!(
            out,
            "  {:<26} {:>6}  {:>5.1}%",
            "(unrecognised)",
            dist.unrecognized,
            dist.unrecognized_percentage()
        )?;
    }
    Ok(out)
}
