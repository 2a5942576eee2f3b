//! Command-line driver: induce a tree from a CSV table and score it on held-out records.
use anyhow::{Context, Result};
use clap::Parser;
use rusty_id3::data::loader::{read_file, read_file_with_schema, LoadOptions};
use rusty_id3::metrics::confusion::ClassificationMetrics;
use rusty_id3::trees::classifier::Id3Classifier;
use rusty_id3::trees::params::MissingValues;
use rusty_id3::trees::render::render_tree;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "id3")]
#[command(about = "Induce an ID3 decision tree from a categorical CSV table and report its accuracy")]
#[command(version)]
struct Cli {
    /// Path to the training CSV file
    train: PathBuf,

    /// Path to a validation CSV file (defaults to holding out training records)
    #[arg(long)]
    validation: Option<PathBuf>,

    /// Chi-squared confidence: 0 = 95%, 1 = 99%, 2 = no pruning
    #[arg(long, default_value_t = 0)]
    confidence: u8,

    /// Name of the class column (defaults to the last column)
    #[arg(long)]
    class: Option<String>,

    /// The CSV files have no header row
    #[arg(long, default_value_t = false)]
    no_headers: bool,

    /// Without --validation, every N-th training record is held out for validation
    #[arg(long, default_value_t = 10)]
    holdout_every: usize,

    /// Fail on missing values instead of imputing them
    #[arg(long, default_value_t = false)]
    reject_missing: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let options = LoadOptions {
        has_headers: !cli.no_headers,
        class_column: cli.class.clone(),
        ..LoadOptions::default()
    };
    let dataset = read_file(&cli.train, &options)
        .with_context(|| format!("failed to read {}", cli.train.display()))?;
    info!(records = dataset.nrows(), "training table loaded");

    let (train, validation) = match &cli.validation {
        Some(path) => {
            let validation = read_file_with_schema(path, &options, dataset.shared_schema())
                .with_context(|| format!("failed to read {}", path.display()))?;
            (dataset, validation)
        }
        None => dataset
            .holdout_every_nth(cli.holdout_every)
            .context("failed to hold out validation records")?,
    };
    info!(
        train = train.nrows(),
        validation = validation.nrows(),
        "tables ready"
    );

    let missing_values = if cli.reject_missing {
        MissingValues::Reject
    } else {
        MissingValues::Impute
    };
    let mut classifier = Id3Classifier::with_params(Some(cli.confidence), Some(missing_values))?;
    let tree = classifier.fit(&train).context("tree induction failed")?;

    println!("{}", train.schema().class().name());
    print!("{}", render_tree(tree, train.schema()));

    let predictions = classifier
        .predict_dataset(&validation)
        .context("classification of validation records failed")?;
    let accuracy = classifier.accuracy(&validation.y, &predictions)?;
    println!("Accuracy: {}", accuracy);

    let recall = classifier.recall_per_class(&validation.y, &predictions)?;
    for (label, recall) in train.schema().class().values().iter().zip(recall) {
        match recall {
            Some(recall) => println!("Recall {}: {}", label, recall),
            None => println!("Recall {}: n/a", label),
        }
    }

    Ok(())
}
