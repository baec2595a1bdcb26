//! Training driver: fits the vocabulary, then trains the scorer full-batch.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{SummarizerError, SummarizerResult};
use crate::metrics::{BinaryMetrics, DECISION_THRESHOLD};
use crate::models::DatasetRecord;
use crate::optim::{Adam, LEARNING_RATE};
use crate::scorer::{ImportanceScorer, DROPOUT};
use crate::text;
use crate::vectorizer::{TfidfVectorizer, VectorizerConfig, Vocabulary};

pub const EPOCHS: usize = 30;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f32,
    pub dropout: f32,
    pub seed: u64,
    pub vectorizer: VectorizerConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: EPOCHS,
            learning_rate: LEARNING_RATE,
            dropout: DROPOUT,
            seed: 42,
            vectorizer: VectorizerConfig::default(),
        }
    }
}

/// Flattened sentence/label pairs from every dataset record.
#[derive(Debug, Clone, Default)]
pub struct TrainingCorpus {
    pub sentences: Vec<String>,
    pub labels: Vec<u8>,
}

impl TrainingCorpus {
    /// Segment every record and pair its sentences with its labels.
    ///
    /// Fails on the first record whose sentence count differs from its label
    /// count, before any fitting happens.
    pub fn from_records(records: &[DatasetRecord]) -> SummarizerResult<Self> {
        let mut corpus = Self::default();

        for (record_idx, record) in records.iter().enumerate() {
            let sentences = text::training_sentences(&record.text);
            if sentences.len() != record.labels.len() {
                return Err(SummarizerError::DatasetMismatch {
                    record: record_idx,
                    sentences: sentences.len(),
                    labels: record.labels.len(),
                });
            }
            if let Some(bad) = record.labels.iter().find(|&&l| l > 1) {
                return Err(SummarizerError::Artifact(format!(
                    "Dataset record {}: label {} is not 0 or 1",
                    record_idx, bad
                )));
            }

            corpus
                .sentences
                .extend(sentences.into_iter().map(|s| s.text));
            corpus.labels.extend_from_slice(&record.labels);
        }

        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}

/// Binary cross-entropy on logits with the positive class scaled by
/// `pos_weight`, averaged over the batch.
///
/// ```text
/// loss = -[pw * y * log σ(x) + (1 - y) * log(1 - σ(x))]
///      = pw * y * softplus(-x) + (1 - y) * softplus(x)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WeightedBceLoss {
    pub pos_weight: f32,
}

fn softplus(x: f32) -> f32 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

impl WeightedBceLoss {
    /// `negatives / positives`, with zero positives treated as one.
    pub fn from_labels(labels: &[u8]) -> Self {
        let pos = labels.iter().filter(|&&l| l == 1).count();
        let neg = labels.len() - pos;
        Self {
            pos_weight: neg as f32 / pos.max(1) as f32,
        }
    }

    pub fn loss(&self, logits: &Array1<f32>, targets: &Array1<f32>) -> f32 {
        let n = logits.len().max(1) as f32;
        logits
            .iter()
            .zip(targets.iter())
            .map(|(&x, &y)| self.pos_weight * y * softplus(-x) + (1.0 - y) * softplus(x))
            .sum::<f32>()
            / n
    }

    /// d(loss)/d(logit) for every sample.
    pub fn gradient(&self, logits: &Array1<f32>, targets: &Array1<f32>) -> Array1<f32> {
        let n = logits.len().max(1) as f32;
        let mut grad = logits.mapv(crate::scorer::sigmoid);
        grad.zip_mut_with(targets, |p, &y| {
            *p = ((1.0 - y) * *p - self.pos_weight * y * (1.0 - *p)) / n;
        });
        grad
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EpochStats {
    pub epoch: usize,
    pub epochs: usize,
    pub loss: f32,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub input_dim: usize,
    pub samples: usize,
    pub pos_weight: f32,
    pub epoch_losses: Vec<f32>,
    pub metrics: BinaryMetrics,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub vocabulary: Vocabulary,
    pub scorer: ImportanceScorer,
    pub report: TrainingReport,
}

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit the vocabulary, then train the scorer against it.
    pub fn train(
        &self,
        corpus: &TrainingCorpus,
        on_epoch: impl FnMut(EpochStats),
    ) -> SummarizerResult<TrainedModel> {
        let vocabulary = self.fit_vocabulary(corpus)?;
        self.train_scorer(vocabulary, corpus, on_epoch)
    }

    pub fn fit_vocabulary(&self, corpus: &TrainingCorpus) -> SummarizerResult<Vocabulary> {
        TfidfVectorizer::with_config(self.config.vectorizer).fit(&corpus.sentences)
    }

    /// Train a fresh scorer on `corpus` projected through `vocabulary`.
    /// `on_epoch` is called after every optimizer step with the loss
    /// computed before that step.
    pub fn train_scorer(
        &self,
        vocabulary: Vocabulary,
        corpus: &TrainingCorpus,
        mut on_epoch: impl FnMut(EpochStats),
    ) -> SummarizerResult<TrainedModel> {
        let features = vocabulary.transform(&corpus.sentences);
        let targets: Array1<f32> = corpus.labels.iter().map(|&l| l as f32).collect();

        let input_dim = vocabulary.len();
        tracing::info!(
            input_dim,
            samples = corpus.len(),
            positives = corpus.positives(),
            "starting training"
        );

        let mut scorer = ImportanceScorer::new(input_dim, self.config.seed);
        let criterion = WeightedBceLoss::from_labels(&corpus.labels);
        let mut optimizer = Adam::new(scorer.params(), self.config.learning_rate);
        let mut dropout_rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(1));

        let mut epoch_losses = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            let (logits, cache) =
                scorer.forward_train(&features, self.config.dropout, &mut dropout_rng);
            let loss = criterion.loss(&logits, &targets);
            let grad_logits = criterion.gradient(&logits, &targets);
            let grads = scorer.backward(&features, &cache, &grad_logits);
            optimizer.step(scorer.params_mut(), &grads);

            epoch_losses.push(loss);
            on_epoch(EpochStats {
                epoch: epoch + 1,
                epochs: self.config.epochs,
                loss,
            });
        }

        let probabilities = scorer.scores(&features)?.to_vec();
        let metrics = BinaryMetrics::evaluate(&probabilities, &corpus.labels, DECISION_THRESHOLD);
        tracing::info!(
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            "training finished"
        );

        Ok(TrainedModel {
            vocabulary,
            scorer,
            report: TrainingReport {
                input_dim,
                samples: corpus.len(),
                pos_weight: criterion.pos_weight,
                epoch_losses,
                metrics,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn records() -> Vec<DatasetRecord> {
        vec![
            DatasetRecord {
                text: "Gempa bumi mengguncang wilayah pesisir selatan. \
                       Pedagang pasar membuka lapak seperti biasa. \
                       Harga cabai di pasar tradisional relatif stabil."
                    .to_string(),
                labels: vec![1, 0, 0],
            },
            DatasetRecord {
                text: "Gempa bumi susulan dirasakan warga hingga pagi. \
                       Pertandingan sepak bola digelar sore hari. \
                       Cuaca cerah menyelimuti kota sepanjang hari."
                    .to_string(),
                labels: vec![1, 0, 0],
            },
        ]
    }

    #[test]
    fn test_corpus_pairs_sentences_with_labels() {
        let corpus = TrainingCorpus::from_records(&records()).unwrap();
        assert_eq!(corpus.len(), 6);
        assert_eq!(corpus.sentences.len(), 6);
        assert_eq!(corpus.positives(), 2);
        assert_eq!(corpus.sentences[0], "gempa bumi mengguncang wilayah pesisir selatan");
    }

    #[test]
    fn test_label_count_mismatch_aborts() {
        let mut bad = records();
        bad[1].labels.pop();
        let err = TrainingCorpus::from_records(&bad).unwrap_err();
        assert!(matches!(
            err,
            SummarizerError::DatasetMismatch {
                record: 1,
                sentences: 3,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_non_binary_label_is_rejected() {
        let mut bad = records();
        bad[0].labels[0] = 2;
        assert!(TrainingCorpus::from_records(&bad).is_err());
    }

    #[test]
    fn test_pos_weight_counters_imbalance() {
        assert_eq!(WeightedBceLoss::from_labels(&[1, 0, 0, 0]).pos_weight, 3.0);
        // no positives: ratio uses one in the denominator
        assert_eq!(WeightedBceLoss::from_labels(&[0, 0]).pos_weight, 2.0);
    }

    #[test]
    fn test_weighted_bce_values_and_gradient() {
        let criterion = WeightedBceLoss { pos_weight: 2.0 };
        let logits = array![0.0f32, 0.0];
        let targets = array![1.0f32, 0.0];

        let expected = (2.0 * 2f32.ln() + 2f32.ln()) / 2.0;
        assert!((criterion.loss(&logits, &targets) - expected).abs() < 1e-6);

        let grad = criterion.gradient(&logits, &targets);
        assert!((grad[0] + 0.5).abs() < 1e-6);
        assert!((grad[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_bce_is_stable_for_large_logits() {
        let criterion = WeightedBceLoss { pos_weight: 1.0 };
        let loss = criterion.loss(&array![100.0f32, -100.0], &array![0.0f32, 1.0]);
        assert!(loss.is_finite());
        assert!((loss - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_training_reduces_loss_and_fits_separable_data() {
        let corpus = TrainingCorpus::from_records(&records()).unwrap();
        let trainer = Trainer::new(TrainingConfig {
            epochs: 200,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        });

        let mut seen = Vec::new();
        let model = trainer.train(&corpus, |stats| seen.push(stats.epoch)).unwrap();

        assert_eq!(seen.len(), 200);
        assert_eq!(seen[0], 1);
        let losses = &model.report.epoch_losses;
        assert!(losses[losses.len() - 1] < losses[0]);
        assert_eq!(model.report.input_dim, model.vocabulary.len());
        assert_eq!(model.scorer.input_dim(), model.vocabulary.len());
        assert!(model.report.metrics.f1 > 0.9);
    }

    #[test]
    fn test_training_is_deterministic_for_a_seed() {
        let corpus = TrainingCorpus::from_records(&records()).unwrap();
        let trainer = Trainer::default();
        let a = trainer.train(&corpus, |_| {}).unwrap();
        let b = trainer.train(&corpus, |_| {}).unwrap();
        assert_eq!(a.scorer, b.scorer);
        assert_eq!(a.report.epoch_losses, b.report.epoch_losses);
        assert_eq!(a.report.epoch_losses.len(), EPOCHS);
    }

    #[test]
    fn test_empty_corpus_fails_to_fit() {
        let corpus = TrainingCorpus::default();
        assert!(Trainer::default().train(&corpus, |_| {}).is_err());
    }
}
