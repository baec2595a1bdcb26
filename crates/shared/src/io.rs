use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SummarizerError, SummarizerResult};
use crate::models::{ArtifactFile, DatasetRecord, ARTIFACT_VERSION};
use crate::scorer::ImportanceScorer;
use crate::vectorizer::Vocabulary;

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const SCORER_FILE: &str = "scorer.json";

/// Get the default directory for model artifacts
pub fn get_default_model_dir() -> SummarizerResult<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| {
            SummarizerError::Artifact("Could not determine local data directory".to_string())
        })?
        .join("news-summarizer")
        .join("model");

    Ok(data_dir)
}

fn save_artifact<T: Serialize>(
    dir: &Path,
    filename: &str,
    payload: T,
) -> SummarizerResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let filepath = dir.join(filename);

    let json = serde_json::to_string(&ArtifactFile::new(payload))?;
    fs::write(&filepath, json)?;

    tracing::info!(path = %filepath.display(), "saved artifact");
    Ok(filepath)
}

fn load_artifact<T: DeserializeOwned>(dir: &Path, filename: &str) -> SummarizerResult<T> {
    let filepath = dir.join(filename);
    if !filepath.exists() {
        return Err(SummarizerError::Artifact(format!(
            "Artifact not found: {}. Run train-scorer first.",
            filepath.display()
        )));
    }

    let content = fs::read_to_string(&filepath)?;

    let artifact: ArtifactFile<T> = serde_json::from_str(&content).map_err(|e| {
        SummarizerError::Artifact(format!(
            "Failed to parse {}: {}. The file may be corrupted.",
            filepath.display(),
            e
        ))
    })?;

    if artifact.version != ARTIFACT_VERSION {
        return Err(SummarizerError::UnsupportedVersion(artifact.version));
    }

    tracing::debug!(
        path = %filepath.display(),
        created_at = %artifact.created_at,
        "loaded artifact"
    );
    Ok(artifact.payload)
}

pub fn save_vocabulary(dir: &Path, vocabulary: &Vocabulary) -> SummarizerResult<PathBuf> {
    save_artifact(dir, VOCABULARY_FILE, vocabulary)
}

pub fn load_vocabulary(dir: &Path) -> SummarizerResult<Vocabulary> {
    load_artifact(dir, VOCABULARY_FILE)
}

pub fn save_scorer(dir: &Path, scorer: &ImportanceScorer) -> SummarizerResult<PathBuf> {
    save_artifact(dir, SCORER_FILE, scorer)
}

pub fn load_scorer(dir: &Path) -> SummarizerResult<ImportanceScorer> {
    load_artifact(dir, SCORER_FILE)
}

/// Load a JSON Lines dataset. Blank lines are skipped.
pub fn load_dataset(path: &Path) -> SummarizerResult<Vec<DatasetRecord>> {
    let content = fs::read_to_string(path).map_err(|e| {
        SummarizerError::Artifact(format!("Failed to read dataset {}: {}", path.display(), e))
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                SummarizerError::Artifact(format!(
                    "Invalid dataset record on line {} of {}: {}",
                    i + 1,
                    path.display(),
                    e
                ))
            })
        })
        .collect()
}
