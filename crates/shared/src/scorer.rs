//! Sentence importance scorer.
//!
//! ```text
//! input_dim ──Linear──▶ 128 ──ReLU──▶ Dropout(0.3) ──Linear──▶ 1 (logit)
//! ```
//!
//! Dropout is only applied by the training forward pass; [`ImportanceScorer::logits`]
//! is deterministic.

use ndarray::{Array, Array1, Array2, Axis, Dimension};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{SummarizerError, SummarizerResult};

pub const HIDDEN_DIM: usize = 128;
pub const DROPOUT: f32 = 0.3;

/// Weights of both layers. Also used as the gradient container during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerParams {
    /// `[input_dim × hidden]`
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    /// `[hidden]`
    pub w2: Array1<f32>,
    /// Single output bias, stored as a length-1 array.
    pub b2: Array1<f32>,
}

impl ScorerParams {
    pub fn zeros_like(&self) -> Self {
        Self {
            w1: Array2::zeros(self.w1.raw_dim()),
            b1: Array1::zeros(self.b1.raw_dim()),
            w2: Array1::zeros(self.w2.raw_dim()),
            b2: Array1::zeros(self.b2.raw_dim()),
        }
    }
}

fn uniform<D: Dimension>(shape: D, bound: f32, rng: &mut StdRng) -> Array<f32, D> {
    Array::from_shape_simple_fn(shape, || rng.gen_range(-bound..=bound))
}

fn relu(x: f32) -> f32 {
    x.max(0.0)
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Intermediate activations kept by the training forward pass.
pub(crate) struct ForwardCache {
    pre_activation: Array2<f32>,
    /// Dropout mask already scaled by `1 / keep`.
    mask: Array2<f32>,
    dropped: Array2<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScorerParts", into = "ScorerParts")]
pub struct ImportanceScorer {
    input_dim: usize,
    hidden_dim: usize,
    params: ScorerParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScorerParts {
    input_dim: usize,
    hidden_dim: usize,
    params: ScorerParams,
}

impl TryFrom<ScorerParts> for ImportanceScorer {
    type Error = SummarizerError;

    fn try_from(parts: ScorerParts) -> Result<Self, Self::Error> {
        Self::from_params(parts.input_dim, parts.hidden_dim, parts.params)
    }
}

impl From<ImportanceScorer> for ScorerParts {
    fn from(scorer: ImportanceScorer) -> Self {
        Self {
            input_dim: scorer.input_dim,
            hidden_dim: scorer.hidden_dim,
            params: scorer.params,
        }
    }
}

impl ImportanceScorer {
    /// Freshly initialised scorer. Weights and biases are drawn from
    /// `U(-1/sqrt(fan_in), 1/sqrt(fan_in))` with a seeded generator.
    pub fn new(input_dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bound1 = 1.0 / (input_dim.max(1) as f32).sqrt();
        let bound2 = 1.0 / (HIDDEN_DIM as f32).sqrt();

        let params = ScorerParams {
            w1: uniform(ndarray::Dim([input_dim, HIDDEN_DIM]), bound1, &mut rng),
            b1: uniform(ndarray::Dim([HIDDEN_DIM]), bound1, &mut rng),
            w2: uniform(ndarray::Dim([HIDDEN_DIM]), bound2, &mut rng),
            b2: uniform(ndarray::Dim([1]), bound2, &mut rng),
        };

        Self {
            input_dim,
            hidden_dim: HIDDEN_DIM,
            params,
        }
    }

    /// Assemble a scorer from stored weights, validating every shape.
    pub fn from_params(
        input_dim: usize,
        hidden_dim: usize,
        params: ScorerParams,
    ) -> SummarizerResult<Self> {
        let check = |what: &'static str, expected: usize, found: usize| {
            if expected == found {
                Ok(())
            } else {
                Err(SummarizerError::DimensionMismatch {
                    what,
                    expected,
                    found,
                })
            }
        };

        check("scorer hidden width", HIDDEN_DIM, hidden_dim)?;
        check("scorer w1 rows", input_dim, params.w1.nrows())?;
        check("scorer w1 columns", hidden_dim, params.w1.ncols())?;
        check("scorer b1 length", hidden_dim, params.b1.len())?;
        check("scorer w2 length", hidden_dim, params.w2.len())?;
        check("scorer b2 length", 1, params.b2.len())?;

        Ok(Self {
            input_dim,
            hidden_dim,
            params,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    pub fn params(&self) -> &ScorerParams {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut ScorerParams {
        &mut self.params
    }

    /// Fail unless this scorer accepts feature vectors of width `expected`.
    pub fn ensure_input_dim(&self, expected: usize) -> SummarizerResult<()> {
        if self.input_dim == expected {
            Ok(())
        } else {
            Err(SummarizerError::DimensionMismatch {
                what: "scorer input width",
                expected,
                found: self.input_dim,
            })
        }
    }

    /// Raw logits, one per feature row. Dropout is disabled.
    pub fn logits(&self, features: &Array2<f32>) -> SummarizerResult<Array1<f32>> {
        self.ensure_input_dim(features.ncols())?;
        let hidden = (features.dot(&self.params.w1) + &self.params.b1).mapv(relu);
        Ok(hidden.dot(&self.params.w2) + self.params.b2[0])
    }

    /// Probabilities in `[0, 1]`. Ranking by these equals ranking by logits.
    pub fn scores(&self, features: &Array2<f32>) -> SummarizerResult<Array1<f32>> {
        Ok(self.logits(features)?.mapv(sigmoid))
    }

    /// Training forward pass with inverted dropout.
    pub(crate) fn forward_train(
        &self,
        features: &Array2<f32>,
        dropout: f32,
        rng: &mut StdRng,
    ) -> (Array1<f32>, ForwardCache) {
        let pre_activation = features.dot(&self.params.w1) + &self.params.b1;

        let keep = 1.0 - dropout;
        let mask = Array2::from_shape_simple_fn(pre_activation.raw_dim(), || {
            if rng.gen::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        });

        let dropped = pre_activation.mapv(relu) * &mask;
        let logits = dropped.dot(&self.params.w2) + self.params.b2[0];

        (
            logits,
            ForwardCache {
                pre_activation,
                mask,
                dropped,
            },
        )
    }

    /// Gradients of the loss with respect to every parameter, given the
    /// gradient with respect to each logit.
    pub(crate) fn backward(
        &self,
        features: &Array2<f32>,
        cache: &ForwardCache,
        grad_logits: &Array1<f32>,
    ) -> ScorerParams {
        let w2 = cache.dropped.t().dot(grad_logits);
        let b2 = Array1::from_elem(1, grad_logits.sum());

        let grad_col = grad_logits.view().insert_axis(Axis(1));
        let w2_row = self.params.w2.view().insert_axis(Axis(0));
        let mut grad_hidden = grad_col.dot(&w2_row);
        grad_hidden *= &cache.mask;
        grad_hidden.zip_mut_with(&cache.pre_activation, |g, &z| {
            if z <= 0.0 {
                *g = 0.0;
            }
        });

        let w1 = features.t().dot(&grad_hidden);
        let b1 = grad_hidden.sum_axis(Axis(0));

        ScorerParams { w1, b1, w2, b2 }
    }
}
