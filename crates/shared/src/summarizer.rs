//! Summarization strategies and the fallback decorator that joins them.

use crate::error::SummarizerResult;
use crate::selector::LengthMode;
use crate::text;

/// Minimum sentence length used by the positional fallback.
pub const LEAD_MIN_CHARS: usize = 20;
/// Number of leading sentences the positional fallback keeps.
pub const LEAD_SENTENCES: usize = 3;

/// A strategy that always produces a (possibly empty) summary.
pub trait Summarizer {
    fn summarize(&self, text: &str, mode: LengthMode) -> String;
}

/// A strategy that may fail and needs a [`WithFallback`] wrapper to become
/// a [`Summarizer`].
pub trait FallibleSummarizer {
    fn try_summarize(&self, text: &str, mode: LengthMode) -> SummarizerResult<String>;
}

/// Positional heuristic: the first three sentences of the document.
///
/// Ignores `mode`. Each sentence keeps its own terminator and the output
/// always ends with terminal punctuation when non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSummarizer;

impl LeadSummarizer {
    pub fn new() -> Self {
        Self
    }
}

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str, _mode: LengthMode) -> String {
        text::split_sentences(&text::clean(text), LEAD_MIN_CHARS)
            .iter()
            .take(LEAD_SENTENCES)
            .map(|s| s.with_terminator())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs `primary` and falls back to the positional lead summary when it
/// fails. The failure is logged and never reaches the caller.
#[derive(Debug, Clone)]
pub struct WithFallback<P> {
    primary: P,
    fallback: LeadSummarizer,
}

impl<P: FallibleSummarizer> WithFallback<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: LeadSummarizer,
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }
}

impl<P: FallibleSummarizer> Summarizer for WithFallback<P> {
    fn summarize(&self, text: &str, mode: LengthMode) -> String {
        match self.primary.try_summarize(text, mode) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "summarizer failed, using lead fallback");
                self.fallback.summarize(text, mode)
            }
        }
    }
}
