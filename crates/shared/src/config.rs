use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::io::get_default_model_dir;
use crate::remote::DEFAULT_MODEL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the remote completion service. `None` means the remote
    /// strategy goes straight to its fallback.
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    /// Directory holding `vocabulary.json` and `scorer.json`.
    pub model_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let groq_api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if groq_api_key.is_none() {
            tracing::debug!("GROQ_API_KEY not found, remote strategy will use the fallback");
        }

        let groq_model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let model_dir = match env::var("SUMMARIZER_MODEL_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => get_default_model_dir().context(
                "Could not determine a model directory.\n\n\
                Set SUMMARIZER_MODEL_DIR or pass --model-dir.",
            )?,
        };

        Ok(Self {
            groq_api_key,
            groq_model,
            model_dir,
        })
    }

    /// Override the model directory (e.g. from a `--model-dir` flag).
    pub fn with_model_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.model_dir = dir;
        }
        self
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/news-summarizer/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("news-summarizer").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() && dotenvy::from_path(&home_path).is_ok() {
                return;
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}
