use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::{SummarizerError, SummarizerResult};
use crate::selector::LengthMode;
use crate::summarizer::FallibleSummarizer;
use crate::text;

pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 300;

/// A text completion backend: one prompt in, one completion out.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> SummarizerResult<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqClient {
    pub fn new(api_key: String, model: impl Into<String>) -> SummarizerResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            endpoint: GROQ_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl CompletionClient for GroqClient {
    fn complete(&self, prompt: &str) -> SummarizerResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(model = %self.model, "calling completion service");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SummarizerError::Remote(format!("{}: {}", status, error_text)));
        }

        let chat: ChatResponse = response.json()?;
        let completion = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if completion.is_empty() {
            return Err(SummarizerError::Remote(
                "response contained no completion".to_string(),
            ));
        }

        tracing::info!(chars = completion.len(), "completion service succeeded");
        Ok(completion)
    }
}

/// Fixed instruction prompt around the cleaned article.
pub fn build_prompt(article: &str) -> String {
    format!(
        r#"Kamu adalah asisten yang ahli meringkas berita dalam Bahasa Indonesia.

Tugas: Ringkas berita berikut menjadi 2-4 kalimat yang padat dan informatif.

Aturan:
- Tangkap poin utama: siapa, apa, kapan, di mana, mengapa
- Gunakan bahasa yang jelas dan formal
- Jangan tambahkan informasi yang tidak ada di berita asli
- Jangan gunakan kata "Ringkasan:" atau label apapun di awal
- Langsung tulis ringkasannya saja

Berita:
{}

Ringkasan:"#,
        article
    )
}

/// Abstractive summary from a completion service. Without a client (no
/// credential configured) every call fails with `MissingCredential` before
/// any request is made; wrap in [`crate::summarizer::WithFallback`].
pub struct RemoteSummarizer<C> {
    client: Option<C>,
}

impl<C: CompletionClient> RemoteSummarizer<C> {
    pub fn new(client: Option<C>) -> Self {
        Self { client }
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }
}

impl RemoteSummarizer<GroqClient> {
    pub fn from_config(config: &Config) -> SummarizerResult<Self> {
        let client = match &config.groq_api_key {
            Some(key) => Some(GroqClient::new(key.clone(), config.groq_model.clone())?),
            None => None,
        };
        Ok(Self::new(client))
    }
}

impl<C: CompletionClient> FallibleSummarizer for RemoteSummarizer<C> {
    fn try_summarize(&self, article: &str, _mode: LengthMode) -> SummarizerResult<String> {
        let client = self
            .client
            .as_ref()
            .ok_or(SummarizerError::MissingCredential)?;
        client.complete(&build_prompt(&text::clean(article)))
    }
}
