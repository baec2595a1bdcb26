use serde::{Deserialize, Serialize};

pub const ARTIFACT_VERSION: &str = "1.0";

/// One line of the training dataset: a raw article and one 0/1 label per
/// sentence produced by the training segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub text: String,
    pub labels: Vec<u8>,
}

/// Versioned, timestamped wrapper around a persisted model artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactFile<T> {
    pub version: String,
    pub created_at: String,
    pub payload: T,
}

impl<T> ArtifactFile<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: ARTIFACT_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            payload,
        }
    }
}
