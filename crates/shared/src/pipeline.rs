//! The trained extractive pipeline.
//!
//! ```text
//! text ─▶ segment ─▶ TF-IDF ─▶ scorer ─▶ top-N ─▶ narrative
//! ```

use std::path::Path;

use crate::error::SummarizerResult;
use crate::io;
use crate::narrative::build_narrative;
use crate::scorer::ImportanceScorer;
use crate::selector::{self, LengthMode};
use crate::summarizer::{FallibleSummarizer, Summarizer};
use crate::text::{self, Sentence};
use crate::vectorizer::Vocabulary;

/// An eligible sentence with its importance probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    pub sentence: Sentence,
    pub score: f32,
}

/// Owns a frozen vocabulary and the scorer trained against it. Both are
/// read-only after construction, so one pipeline can serve many calls.
#[derive(Debug, Clone)]
pub struct SummaryPipeline {
    vocabulary: Vocabulary,
    scorer: ImportanceScorer,
}

impl SummaryPipeline {
    /// Pair a vocabulary with a scorer, refusing mismatched widths.
    pub fn new(vocabulary: Vocabulary, scorer: ImportanceScorer) -> SummarizerResult<Self> {
        scorer.ensure_input_dim(vocabulary.len())?;
        Ok(Self { vocabulary, scorer })
    }

    /// Load both artifacts from `dir`.
    pub fn load(dir: &Path) -> SummarizerResult<Self> {
        let vocabulary = io::load_vocabulary(dir)?;
        let scorer = io::load_scorer(dir)?;
        tracing::debug!(
            dir = %dir.display(),
            vocabulary = vocabulary.len(),
            "loaded summary pipeline"
        );
        Self::new(vocabulary, scorer)
    }

    /// Write both artifacts to `dir`.
    pub fn save(&self, dir: &Path) -> SummarizerResult<()> {
        io::save_vocabulary(dir, &self.vocabulary)?;
        io::save_scorer(dir, &self.scorer)?;
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn scorer(&self) -> &ImportanceScorer {
        &self.scorer
    }

    /// Score every eligible sentence, in document order.
    pub fn rank(&self, article: &str) -> SummarizerResult<Vec<ScoredSentence>> {
        let sentences = text::inference_sentences(article);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        let features = self.vocabulary.transform(&texts);
        let scores = self.scorer.scores(&features)?;

        Ok(sentences
            .into_iter()
            .zip(scores.iter().copied())
            .map(|(sentence, score)| ScoredSentence { sentence, score })
            .collect())
    }

    /// Sentences chosen for `mode`, in document order.
    pub fn select(
        &self,
        article: &str,
        mode: LengthMode,
    ) -> SummarizerResult<Vec<ScoredSentence>> {
        let ranked = self.rank(article)?;
        let scores: Vec<f32> = ranked.iter().map(|s| s.score).collect();
        let top_n = mode.top_n(ranked.len());
        let keep = selector::select(&scores, top_n);

        tracing::debug!(eligible = ranked.len(), top_n, %mode, "selected sentences");
        Ok(keep.into_iter().map(|i| ranked[i].clone()).collect())
    }
}

impl FallibleSummarizer for SummaryPipeline {
    fn try_summarize(&self, article: &str, mode: LengthMode) -> SummarizerResult<String> {
        let selected = self.select(article, mode)?;
        let texts: Vec<&str> = selected.iter().map(|s| s.sentence.text.as_str()).collect();
        Ok(build_narrative(&texts))
    }
}

impl Summarizer for SummaryPipeline {
    fn summarize(&self, article: &str, mode: LengthMode) -> String {
        match self.try_summarize(article, mode) {
            Ok(summary) => summary,
            Err(e) => {
                // widths are checked in new(), so this is a broken invariant
                tracing::error!(error = %e, "summary pipeline failed");
                String::new()
            }
        }
    }
}
