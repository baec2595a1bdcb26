//! TF-IDF feature extraction over unigrams and bigrams.
//!
//! ```text
//! tf(t, s)  = 1 + ln(count of t in s)        (sublinear)
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1  (smoothed)
//! row(s)    = L2-normalised tf × idf
//! ```
//!
//! A [`Vocabulary`] is produced once by [`TfidfVectorizer::fit`] and is
//! read-only afterwards; inference only ever calls [`Vocabulary::transform`].

use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::error::{SummarizerError, SummarizerResult};

pub const MAX_FEATURES: usize = 1000;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    /// Inclusive n-gram bounds.
    pub ngram_range: (usize, usize),
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: MAX_FEATURES,
            ngram_range: (1, 2),
            sublinear_tf: true,
        }
    }
}

impl VectorizerConfig {
    /// Lower-cased word tokens expanded into the configured n-grams.
    fn terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = token_pattern()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VectorizerConfig) -> Self {
        Self { config }
    }

    /// Build a frozen vocabulary from a corpus of sentences.
    ///
    /// Terms are ranked by total corpus count, ties broken by lexical order,
    /// and the top `max_features` are kept. Retained terms are indexed in
    /// lexical order so the feature layout is independent of hash ordering.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> SummarizerResult<Vocabulary> {
        if corpus.is_empty() {
            return Err(SummarizerError::EmptyCorpus);
        }

        let n_docs = corpus.len();
        let mut term_count: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let terms = self.config.terms(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *term_count.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if term_count.is_empty() {
            return Err(SummarizerError::EmptyCorpus);
        }

        let mut ranked: Vec<(String, usize)> = term_count.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                (((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0) as f32
            })
            .collect();

        tracing::debug!(terms = terms.len(), docs = n_docs, "fitted vocabulary");

        Vocabulary::from_parts(VocabularyParts {
            config: self.config,
            terms,
            idf,
        })
    }
}

/// Frozen term → feature index mapping with per-term IDF weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyParts", into = "VocabularyParts")]
pub struct Vocabulary {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f32>,
    index: HashMap<String, usize>,
}

/// Serialized form; the lookup index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyParts {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl TryFrom<VocabularyParts> for Vocabulary {
    type Error = SummarizerError;

    fn try_from(parts: VocabularyParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}

impl From<Vocabulary> for VocabularyParts {
    fn from(vocabulary: Vocabulary) -> Self {
        Self {
            config: vocabulary.config,
            terms: vocabulary.terms,
            idf: vocabulary.idf,
        }
    }
}

impl Vocabulary {
    fn from_parts(parts: VocabularyParts) -> SummarizerResult<Self> {
        if parts.terms.len() != parts.idf.len() {
            return Err(SummarizerError::DimensionMismatch {
                what: "vocabulary idf weights",
                expected: parts.terms.len(),
                found: parts.idf.len(),
            });
        }

        let index: HashMap<String, usize> = parts
            .terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        if index.len() != parts.terms.len() {
            return Err(SummarizerError::Artifact(
                "vocabulary contains duplicate terms".to_string(),
            ));
        }

        Ok(Self {
            config: parts.config,
            terms: parts.terms,
            idf: parts.idf,
            index,
        })
    }

    /// Feature-vector width.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.index_of(term).map(|i| self.idf[i])
    }

    /// Map sentences to TF-IDF rows. Terms outside the vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, sentences: &[S]) -> Array2<f32> {
        let mut features = Array2::<f32>::zeros((sentences.len(), self.len()));

        for (mut row, sentence) in features.outer_iter_mut().zip(sentences) {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for term in self.config.terms(sentence.as_ref()) {
                if let Some(i) = self.index_of(&term) {
                    *counts.entry(i).or_insert(0) += 1;
                }
            }

            for (i, count) in counts {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f32).ln()
                } else {
                    count as f32
                };
                row[i] = tf * self.idf[i];
            }

            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|w| w / norm);
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "banjir merendam sejumlah wilayah di kulon progo",
            "air sungai meluap dan menggenangi permukiman warga",
            "warga diminta waspada terhadap potensi banjir susulan",
        ]
    }

    #[test]
    fn test_fit_includes_unigrams_and_bigrams() {
        let vocabulary = TfidfVectorizer::new().fit(&corpus()).unwrap();
        assert!(vocabulary.index_of("banjir").is_some());
        assert!(vocabulary.index_of("sungai meluap").is_some());
        // single-character tokens are not terms
        assert!(vocabulary.index_of("di").is_some());
        assert!(vocabulary.index_of("d").is_none());
    }

    #[test]
    fn test_fit_indexes_terms_lexically() {
        let vocabulary = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let mut sorted = vocabulary.terms().to_vec();
        sorted.sort();
        assert_eq!(vocabulary.terms(), sorted.as_slice());
    }

    #[test]
    fn test_fit_caps_vocabulary_by_count_then_lexical_order() {
        let config = VectorizerConfig {
            max_features: 3,
            ngram_range: (1, 1),
            sublinear_tf: true,
        };
        let docs = ["warga banjir zona", "warga banjir alpha", "warga beta"];
        let vocabulary = TfidfVectorizer::with_config(config).fit(&docs).unwrap();

        // warga=3, banjir=2, then alpha/beta/zona tie at 1 and alpha wins
        assert_eq!(vocabulary.terms(), &["alpha", "banjir", "warga"]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let b = TfidfVectorizer::new().fit(&corpus()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let docs = ["warga banjir", "warga sungai"];
        let config = VectorizerConfig {
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        };
        let vocabulary = TfidfVectorizer::with_config(config).fit(&docs).unwrap();

        // present in every document
        assert!((vocabulary.idf("warga").unwrap() - 1.0).abs() < 1e-6);
        let expected = (3.0f32 / 2.0).ln() + 1.0;
        assert!((vocabulary.idf("banjir").unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TfidfVectorizer::new().fit(&empty),
            Err(SummarizerError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_transform_rows_are_unit_length() {
        let vocabulary = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let features = vocabulary.transform(&corpus());
        assert_eq!(features.dim(), (3, vocabulary.len()));
        for row in features.outer_iter() {
            assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_transform_ignores_out_of_vocabulary_terms() {
        let vocabulary = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let before = vocabulary.clone();
        let features = vocabulary.transform(&["kalimat asing tanpa kosakata dikenal"]);
        assert!(features.iter().all(|&w| w == 0.0));
        assert_eq!(vocabulary, before);
    }

    #[test]
    fn test_transform_applies_sublinear_tf() {
        let config = VectorizerConfig {
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        };
        let docs = ["banjir sungai", "banjir warga"];
        let vocabulary = TfidfVectorizer::with_config(config).fit(&docs).unwrap();
        let features = vocabulary.transform(&["banjir banjir banjir sungai"]);

        let banjir = features[[0, vocabulary.index_of("banjir").unwrap()]];
        let sungai = features[[0, vocabulary.index_of("sungai").unwrap()]];
        let ratio = banjir / sungai;
        let expected = (1.0 + 3.0f32.ln()) * vocabulary.idf("banjir").unwrap()
            / vocabulary.idf("sungai").unwrap();
        assert!((ratio - expected).abs() < 1e-5);
    }

    #[test]
    fn test_vocabulary_json_roundtrip_rebuilds_index() {
        let vocabulary = TfidfVectorizer::new().fit(&corpus()).unwrap();
        let json = serde_json::to_string(&vocabulary).unwrap();
        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vocabulary);
        assert_eq!(restored.index_of("banjir"), vocabulary.index_of("banjir"));
    }

    #[test]
    fn test_vocabulary_rejects_mismatched_idf() {
        let json = r#"{"config":{"max_features":1000,"ngram_range":[1,2],"sublinear_tf":true},"terms":["banjir","warga"],"idf":[1.0]}"#;
        assert!(serde_json::from_str::<Vocabulary>(json).is_err());
    }
}
