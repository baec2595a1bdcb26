use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shared::logging::init_tracing;
use shared::{
    Config, LeadSummarizer, LengthMode, RemoteSummarizer, Summarizer, SummaryPipeline,
    WithFallback,
};
use std::io::{self, Read};
use std::path::PathBuf;

const SAMPLE_ARTICLE: &str = "Banjir merendam sejumlah wilayah di Kabupaten Kulon Progo, \
Daerah Istimewa Yogyakarta, setelah hujan deras mengguyur sejak Senin sore. \
Air Sungai Serang meluap dan menggenangi permukiman warga hingga setinggi 1.5 meter pada dini hari. \
Badan Penanggulangan Bencana Daerah mencatat ratusan rumah terdampak di empat kecamatan. \
Petugas gabungan mengevakuasi lansia dan anak-anak ke posko pengungsian di balai desa. \
Sejumlah aktivitas masyarakat terganggu karena akses jalan utama tidak bisa dilalui kendaraan. \
Sekolah di wilayah terdampak meliburkan kegiatan belajar mengajar untuk sementara waktu. \
Warga diminta tetap waspada terhadap potensi banjir susulan karena hujan diperkirakan masih turun hingga akhir pekan.";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Trained extractive pipeline
    Local,
    /// Remote completion service, falling back to the lead sentences
    Remote,
    /// First three sentences
    Lead,
}

#[derive(Parser)]
#[command(name = "summarize")]
#[command(about = "Summarize an Indonesian news article read from stdin")]
struct Args {
    /// Summary length (short, medium, long)
    #[arg(short, long, default_value = "medium")]
    mode: LengthMode,

    /// Summarization strategy
    #[arg(short, long, value_enum, default_value = "local")]
    strategy: Strategy,

    /// Directory holding vocabulary.json and scorer.json
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Print each eligible sentence with its score to stderr (local only)
    #[arg(long)]
    show_scores: bool,
}

fn read_article() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read article from stdin")?;

    if input.trim().is_empty() {
        tracing::info!("no input on stdin, using the built-in sample article");
        return Ok(SAMPLE_ARTICLE.to_string());
    }
    Ok(input)
}

fn build_summarizer(args: &Args, config: &Config, article: &str) -> Result<Box<dyn Summarizer>> {
    let summarizer: Box<dyn Summarizer> = match args.strategy {
        Strategy::Local => {
            let pipeline = SummaryPipeline::load(&config.model_dir).context(format!(
                "Failed to load model from {}",
                config.model_dir.display()
            ))?;
            if args.show_scores {
                for scored in pipeline.rank(article)? {
                    eprintln!("{:.4}  {}", scored.score, scored.sentence.text);
                }
            }
            Box::new(pipeline)
        }
        Strategy::Remote => {
            let remote = RemoteSummarizer::from_config(config)
                .context("Failed to create completion client")?;
            Box::new(WithFallback::new(remote))
        }
        Strategy::Lead => Box::new(LeadSummarizer::new()),
    };
    Ok(summarizer)
}

fn main() -> Result<()> {
    init_tracing("warn");
    let args = Args::parse();
    let config = Config::from_env()?.with_model_dir(args.model_dir.clone());

    let article = read_article()?;
    let summarizer = build_summarizer(&args, &config, &article)?;

    println!("{}", summarizer.summarize(&article, args.mode));
    Ok(())
}
