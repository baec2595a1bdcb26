use anyhow::{Context, Result};
use clap::Parser;
use shared::io::{self, load_dataset};
use shared::logging::init_tracing;
use shared::trainer::EPOCHS;
use shared::{Config, Trainer, TrainingConfig, TrainingCorpus};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "train-scorer")]
#[command(about = "Train the sentence importance scorer from a labeled JSONL dataset")]
struct Args {
    /// JSON Lines dataset: {"text": "...", "labels": [0, 1, ...]} per line
    #[arg(short, long, default_value = "dataset.jsonl")]
    dataset: PathBuf,

    /// Directory to write vocabulary.json and scorer.json into
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Number of full-batch epochs
    #[arg(short, long, default_value_t = EPOCHS)]
    epochs: usize,

    /// Seed for weight initialization and dropout
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();
    let config = Config::from_env()?.with_model_dir(args.model_dir);

    println!("📖 Reading dataset: {}", args.dataset.display());
    let records = load_dataset(&args.dataset)
        .context(format!("Failed to read dataset: {}", args.dataset.display()))?;
    let corpus = TrainingCorpus::from_records(&records).context("Dataset is inconsistent")?;
    println!(
        "✓ Loaded {} records with {} sentences ({} important)",
        records.len(),
        corpus.len(),
        corpus.positives()
    );

    let trainer = Trainer::new(TrainingConfig {
        epochs: args.epochs,
        seed: args.seed,
        ..TrainingConfig::default()
    });

    let vocabulary = trainer
        .fit_vocabulary(&corpus)
        .context("Failed to fit vocabulary")?;
    println!("📐 Input dimension: {}", vocabulary.len());

    println!("\n🧠 Training scorer...");
    let model = trainer.train_scorer(vocabulary, &corpus, |stats| {
        println!("Epoch {}/{} - Loss: {:.4}", stats.epoch, stats.epochs, stats.loss);
    })?;

    let metrics = &model.report.metrics;
    println!("\n📊 Evaluation on the training set:");
    println!("Precision: {:.2}", metrics.precision);
    println!("Recall: {:.2}", metrics.recall);
    println!("F1-score: {:.2}", metrics.f1);

    let vocabulary_path = io::save_vocabulary(&config.model_dir, &model.vocabulary)
        .context("Failed to save vocabulary")?;
    let scorer_path =
        io::save_scorer(&config.model_dir, &model.scorer).context("Failed to save scorer")?;

    tracing::debug!(dir = %config.model_dir.display(), "artifacts written");
    println!("\n✓ Vocabulary saved to: {}", vocabulary_path.display());
    println!("✓ Scorer saved to: {}", scorer_path.display());
    Ok(())
}
