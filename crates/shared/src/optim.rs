//! Adam optimizer (Kingma & Ba, 2015) over [`ScorerParams`].

use ndarray::{Array, Dimension, Zip};

use crate::scorer::ScorerParams;

pub const LEARNING_RATE: f32 = 0.001;

#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    /// First moment estimates
    m: ScorerParams,
    /// Second moment estimates
    v: ScorerParams,
    /// Current timestep for bias correction
    t: i32,
}

impl Adam {
    /// Default: β₁=0.9, β₂=0.999, ε=1e-8
    pub fn new(params: &ScorerParams, lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            m: params.zeros_like(),
            v: params.zeros_like(),
            t: 0,
        }
    }

    pub fn lr(&self) -> f32 {
        self.lr
    }

    pub fn step(&mut self, params: &mut ScorerParams, grads: &ScorerParams) {
        self.t += 1;
        let step = StepSize {
            lr: self.lr,
            beta1: self.beta1,
            beta2: self.beta2,
            eps: self.eps,
            bias_correction1: 1.0 - self.beta1.powi(self.t),
            bias_correction2: 1.0 - self.beta2.powi(self.t),
        };

        step.apply(&mut params.w1, &grads.w1, &mut self.m.w1, &mut self.v.w1);
        step.apply(&mut params.b1, &grads.b1, &mut self.m.b1, &mut self.v.b1);
        step.apply(&mut params.w2, &grads.w2, &mut self.m.w2, &mut self.v.w2);
        step.apply(&mut params.b2, &grads.b2, &mut self.m.b2, &mut self.v.b2);
    }
}

struct StepSize {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    bias_correction1: f32,
    bias_correction2: f32,
}

impl StepSize {
    fn apply<D: Dimension>(
        &self,
        param: &mut Array<f32, D>,
        grad: &Array<f32, D>,
        m: &mut Array<f32, D>,
        v: &mut Array<f32, D>,
    ) {
        Zip::from(param)
            .and(grad)
            .and(m)
            .and(v)
            .for_each(|p, &g, m, v| {
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                let m_hat = *m / self.bias_correction1;
                let v_hat = *v / self.bias_correction2;
                *p -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            });
    }
}
