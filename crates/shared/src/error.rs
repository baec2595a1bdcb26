use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizerError {
    /// A dataset record segments into a different number of sentences than it has labels.
    #[error("Dataset record {record}: {sentences} sentences but {labels} labels")]
    DatasetMismatch {
        record: usize,
        sentences: usize,
        labels: usize,
    },

    #[error("Cannot fit a vocabulary on an empty corpus")]
    EmptyCorpus,

    /// Scorer input width disagrees with the vocabulary it is paired with.
    #[error("Dimension mismatch: {what} expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Unsupported artifact version: {0}. Expected 1.0. Retrain with train-scorer.")]
    UnsupportedVersion(String),

    #[error("GROQ_API_KEY is not configured")]
    MissingCredential,

    #[error("Completion service error: {0}")]
    Remote(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SummarizerResult<T> = Result<T, SummarizerError>;
