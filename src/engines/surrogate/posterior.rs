use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Mean-field Gaussian posterior over the surrogate weights
#[derive(Debug, Clone)]
pub struct GaussianPosterior {
    pub mean: Vec<f64>,
    pub stddev: Vec<f64>,
}

impl GaussianPosterior {
    /// Posterior before any data: the prior itself
    pub fn from_prior(dimension: usize, prior_scale: f64) -> Self {
        Self {
            mean: vec![0.0; dimension],
            stddev: vec![prior_scale; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// One Thompson draw of the weight vector
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.mean
            .iter()
            .zip(&self.stddev)
            .map(|(mu, sigma)| {
                let eps: f64 = StandardNormal.sample(rng);
                mu + sigma * eps
            })
            .collect()
    }

    /// Predictive mean and epistemic variance for an encoded design
    pub fn predict(&self, phi: &[f64]) -> (f64, f64) {
        let mean = dot(&self.mean, phi);
        let variance = self
            .stddev
            .iter()
            .zip(phi)
            .map(|(sigma, x)| sigma * sigma * x * x)
            .sum();
        (mean, variance)
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
