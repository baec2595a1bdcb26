// Public modules
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod optim;
pub mod pipeline;
pub mod remote;
pub mod scorer;
pub mod selector;
pub mod summarizer;
pub mod text;
pub mod trainer;
pub mod vectorizer;

// Re-export commonly used types
pub use config::Config;
pub use error::{SummarizerError, SummarizerResult};
pub use models::DatasetRecord;
pub use pipeline::{ScoredSentence, SummaryPipeline};
pub use remote::{CompletionClient, GroqClient, RemoteSummarizer};
pub use scorer::ImportanceScorer;
pub use selector::LengthMode;
pub use summarizer::{FallibleSummarizer, LeadSummarizer, Summarizer, WithFallback};
pub use trainer::{Trainer, TrainingConfig, TrainingCorpus};
pub use vectorizer::{TfidfVectorizer, Vocabulary};
