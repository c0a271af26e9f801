mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sentimeter_client::{BulkUpload, Dispatcher, HttpClassifier};
use sentimeter_core::{BulkResult, DecodeOptions, PredictionMode, aggregate, decode, distribution};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sentimeter", version, about = "Sentiment predictions and per-category summaries")]
struct Cli {
    /// Base URL of the classifier service.
    #[arg(
        long,
        env = "SENTIMETER_URL",
        default_value = "http://127.0.0.1:5000",
        global = true
    )]
    url: String,

    /// JSON file with `categoryColumn` / `sentimentColumn` keys.
    #[arg(long, global = true)]
    columns: Option<PathBuf>,

    /// Column holding the category label (overrides --columns).
    #[arg(long, global = true)]
    category_column: Option<String>,

    /// Column holding the predicted sentiment (overrides --columns).
    #[arg(long, global = true)]
    sentiment_column: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the classifier service is reachable.
    Ping,
    /// Classify a single piece of text.
    Text { text: String },
    /// Upload a CSV table and summarise the predictions per category.
    Bulk {
        file: PathBuf,
        /// Print the summary as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Summarise a predictions CSV already on disk, without contacting the service.
    Summarize {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("sentimeter v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let options = decode_options(&cli)?;

    match &cli.command {
        Command::Ping => {
            let client = HttpClassifier::new(cli.url.clone());
            let status = client
                .ping()
                .await
                .with_context(|| format!("pinging {}", client.base_url()))?;
            println!("{status}");
        }
        Command::Text { text } => {
            let dispatcher = Dispatcher::new(HttpClassifier::new(cli.url.clone()), options);
            dispatcher.select_mode(PredictionMode::Text);
            let submission = dispatcher
                .submit_text(text)
                .await
                .context("text prediction")?;
            display::print_verdict(&submission.value);
        }
        Command::Bulk { file, json } => {
            let upload = BulkUpload::from_path(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let dispatcher = Dispatcher::new(HttpClassifier::new(cli.url.clone()), options);
            dispatcher.select_mode(PredictionMode::Bulk);
            let submission = dispatcher
                .submit_bulk(Some(upload))
                .await
                .context("bulk prediction")?;
            show(&submission.value, *json)?;
        }
        Command::Summarize { file, json } => {
            let result = summarize_file(file, &options).await?;
            show(&result, *json)?;
        }
    }

    Ok(())
}

fn decode_options(cli: &Cli) -> anyhow::Result<DecodeOptions> {
    let base = match &cli.columns {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            DecodeOptions::from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => DecodeOptions::default(),
    };

    let options = DecodeOptions::new(
        cli.category_column.clone().unwrap_or(base.category_column),
        cli.sentiment_column.clone().unwrap_or(base.sentiment_column),
    )?;
    Ok(options)
}

async fn summarize_file(path: &Path, options: &DecodeOptions) -> anyhow::Result<BulkResult> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let decoded = decode(&body, options).with_context(|| format!("decoding {}", path.display()))?;
    tracing::info!(
        records = decoded.records.len(),
        skipped = decoded.skipped(),
        "decoded predictions file"
    );

    Ok(BulkResult {
        summaries: aggregate(&decoded.records),
        distribution: distribution(&decoded.records),
        warning: decoded.warning,
    })
}

fn show(result: &BulkResult, json: bool) -> anyhow::Result<()> {
    if json {
        display::print_json(result)
    } else {
        display::print_bulk_result(result)
    }
}
