use crate::config::InferenceConfig;
use crate::engines::surrogate::posterior::{dot, GaussianPosterior};
use crate::error::{Result, SeqDesignError};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Stochastic variational inference for the Bayesian linear surrogate.
///
/// The model is response = w . phi(x) + Gaussian noise with an independent
/// Gaussian prior on w. The variational family is a mean-field Gaussian
/// parameterized by (mu, rho) with stddev = exp(rho); the expected
/// log-likelihood is estimated from reparameterized weight draws on
/// minibatches while the KL term against the prior is exact.
pub struct SviEngine {
    config: InferenceConfig,
}

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

// exp(rho) stays in a numerically sane band
const RHO_MIN: f64 = -8.0;
const RHO_MAX: f64 = 3.0;

impl SviEngine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Fit the variational posterior to encoded observations
    pub fn fit<R: Rng>(
        &self,
        features: &[Vec<f64>],
        responses: &[f64],
        rng: &mut R,
    ) -> Result<GaussianPosterior> {
        if features.is_empty() || features.len() != responses.len() {
            return Err(SeqDesignError::Inference(format!(
                "Feature/response mismatch: {} rows vs {} responses",
                features.len(),
                responses.len()
            )));
        }

        let n = features.len();
        let dim = features[0].len();
        if features.iter().any(|phi| phi.len() != dim) {
            return Err(SeqDesignError::Inference(
                "Ragged feature rows".to_string(),
            ));
        }

        let prior_var = self.config.prior_scale * self.config.prior_scale;
        let noise_var = self.config.noise_scale * self.config.noise_scale;

        let mut mu = vec![0.0; dim];
        let mut rho = vec![(0.5 * self.config.prior_scale).ln().clamp(RHO_MIN, RHO_MAX); dim];

        // Adam state
        let mut m_mu = vec![0.0; dim];
        let mut v_mu = vec![0.0; dim];
        let mut m_rho = vec![0.0; dim];
        let mut v_rho = vec![0.0; dim];

        let batch = self.config.minibatch_size.min(n);
        let log_every = (self.config.svi_steps / 10).max(1);

        for step in 1..=self.config.svi_steps {
            let sigma: Vec<f64> = rho.iter().map(|r| r.exp()).collect();

            let indices: Vec<usize> = if batch == n {
                (0..n).collect()
            } else {
                (0..batch).map(|_| rng.gen_range(0..n)).collect()
            };

            let mut grad_mu = vec![0.0; dim];
            let mut grad_rho = vec![0.0; dim];
            let scale = n as f64 / indices.len() as f64 / self.config.mc_samples as f64;
            let mut data_loss = 0.0;

            for _ in 0..self.config.mc_samples {
                let eps: Vec<f64> = (0..dim).map(|_| StandardNormal.sample(rng)).collect();
                let w: Vec<f64> = mu
                    .iter()
                    .zip(&sigma)
                    .zip(&eps)
                    .map(|((m, s), e)| m + s * e)
                    .collect();

                for &i in &indices {
                    let phi = &features[i];
                    let residual = responses[i] - dot(&w, phi);
                    let coeff = residual / noise_var;
                    data_loss += 0.5 * residual * residual / noise_var * scale;

                    for j in 0..dim {
                        if phi[j] == 0.0 {
                            continue;
                        }
                        let g = -coeff * phi[j] * scale;
                        grad_mu[j] += g;
                        grad_rho[j] += g * eps[j] * sigma[j];
                    }
                }
            }

            // Closed-form KL(q || prior) and its gradient
            let mut kl = 0.0;
            for j in 0..dim {
                let var = sigma[j] * sigma[j];
                kl += (self.config.prior_scale / sigma[j]).ln()
                    + (var + mu[j] * mu[j]) / (2.0 * prior_var)
                    - 0.5;
                grad_mu[j] += mu[j] / prior_var;
                grad_rho[j] += var / prior_var - 1.0;
            }

            let neg_elbo = data_loss + kl;
            if !neg_elbo.is_finite() {
                return Err(SeqDesignError::Inference(format!(
                    "ELBO diverged at step {} (loss = {})",
                    step, neg_elbo
                )));
            }

            let t = step as f64;
            let bias1 = 1.0 - ADAM_BETA1.powf(t);
            let bias2 = 1.0 - ADAM_BETA2.powf(t);
            for j in 0..dim {
                m_mu[j] = ADAM_BETA1 * m_mu[j] + (1.0 - ADAM_BETA1) * grad_mu[j];
                v_mu[j] = ADAM_BETA2 * v_mu[j] + (1.0 - ADAM_BETA2) * grad_mu[j] * grad_mu[j];
                mu[j] -= self.config.learning_rate * (m_mu[j] / bias1)
                    / ((v_mu[j] / bias2).sqrt() + ADAM_EPS);

                m_rho[j] = ADAM_BETA1 * m_rho[j] + (1.0 - ADAM_BETA1) * grad_rho[j];
                v_rho[j] = ADAM_BETA2 * v_rho[j] + (1.0 - ADAM_BETA2) * grad_rho[j] * grad_rho[j];
                rho[j] -= self.config.learning_rate * (m_rho[j] / bias1)
                    / ((v_rho[j] / bias2).sqrt() + ADAM_EPS);
                rho[j] = rho[j].clamp(RHO_MIN, RHO_MAX);
            }

            if step % log_every == 0 {
                log::debug!(
                    "SVI step {}/{}: -ELBO ~ {:.3} (data {:.3}, KL {:.3})",
                    step,
                    self.config.svi_steps,
                    neg_elbo,
                    data_loss,
                    kl
                );
            }
        }

        let stddev = rho.iter().map(|r| r.exp()).collect();
        Ok(GaussianPosterior { mean: mu, stddev })
    }
}
