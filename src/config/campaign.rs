use super::traits::ConfigSection;
use crate::error::SeqDesignError;
use serde::{Deserialize, Serialize};

/// Active-learning loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Thompson-sampling rounds after the seed batch
    pub rounds: usize,
    /// Designs proposed and measured per round
    pub batch_size: usize,
    /// Randomly chosen library designs measured before the first round
    pub seed_batch_size: usize,
    /// Standard deviation of extra noise added by the simulated measurement
    pub measurement_noise: f64,
    /// Bounds on G/C bases per design; None disables the constraint
    pub gc_bounds: Option<(usize, usize)>,
    /// Motifs (e.g. "GGGG") excluded from proposed designs
    pub forbidden_motifs: Vec<String>,
    /// Master seed; None draws one from entropy
    pub seed: Option<u64>,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            rounds: 6,
            batch_size: 16,
            seed_batch_size: 32,
            measurement_noise: 0.0,
            gc_bounds: None,
            forbidden_motifs: Vec::new(),
            seed: None,
        }
    }
}

impl ConfigSection for CampaignConfig {
    fn validate(&self) -> Result<(), SeqDesignError> {
        if self.rounds == 0 {
            return Err(SeqDesignError::Configuration(
                "Round count must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SeqDesignError::Configuration(
                "Batch size must be at least 1".to_string(),
            ));
        }
        if self.seed_batch_size == 0 {
            return Err(SeqDesignError::Configuration(
                "Seed batch size must be at least 1".to_string(),
            ));
        }
        if self.measurement_noise < 0.0 {
            return Err(SeqDesignError::Configuration(
                "Measurement noise must be non-negative".to_string(),
            ));
        }
        if let Some((min, max)) = self.gc_bounds {
            if min > max {
                return Err(SeqDesignError::Configuration(format!(
                    "GC bounds ({}, {}) are inverted",
                    min, max
                )));
            }
        }
        Ok(())
    }
}
