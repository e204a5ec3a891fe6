use super::traits::ConfigSection;
use crate::error::SeqDesignError;
use serde::{Deserialize, Serialize};

/// Stochastic variational inference hyperparameters for the surrogate fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Number of SVI gradient steps per posterior fit
    pub svi_steps: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Observations per stochastic gradient estimate
    pub minibatch_size: usize,
    /// Reparameterized weight draws per step
    pub mc_samples: usize,
    /// Prior standard deviation on every weight
    pub prior_scale: f64,
    /// Observation noise standard deviation assumed by the likelihood
    pub noise_scale: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            svi_steps: 2000,
            learning_rate: 0.05,
            minibatch_size: 64,
            mc_samples: 4,
            prior_scale: 1.0,
            noise_scale: 0.5,
        }
    }
}

impl ConfigSection for InferenceConfig {
    fn validate(&self) -> Result<(), SeqDesignError> {
        if self.svi_steps == 0 {
            return Err(SeqDesignError::Configuration(
                "SVI step count must be at least 1".to_string(),
            ));
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(SeqDesignError::Configuration(
                "Learning rate must be positive and finite".to_string(),
            ));
        }
        if self.minibatch_size == 0 {
            return Err(SeqDesignError::Configuration(
                "Minibatch size must be at least 1".to_string(),
            ));
        }
        if self.mc_samples == 0 {
            return Err(SeqDesignError::Configuration(
                "Monte Carlo sample count must be at least 1".to_string(),
            ));
        }
        if self.prior_scale <= 0.0 {
            return Err(SeqDesignError::Configuration(
                "Prior scale must be positive".to_string(),
            ));
        }
        if self.noise_scale <= 0.0 {
            return Err(SeqDesignError::Configuration(
                "Noise scale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
