use super::traits::ConfigSection;
use crate::error::SeqDesignError;
use serde::{Deserialize, Serialize};

/// Simulated-annealing hyperparameters for the combinatorial design search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Full passes over the sequence per restart
    pub sweeps: usize,
    /// Independent annealing restarts (run in parallel, best result wins)
    pub restarts: usize,
    /// Starting temperature of the geometric cooling schedule
    pub base_temperature: f64,
    /// Multiplicative temperature decay per sweep, in (0, 1)
    pub cooling_ratio: f64,
    /// Probability of a blockwise pair move instead of a point substitution
    pub pair_move_rate: f64,
    /// Attempts to draw a feasible starting point before giving up
    pub feasible_start_retries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sweeps: 200,
            restarts: 8,
            base_temperature: 2.0,
            cooling_ratio: 0.97,
            pair_move_rate: 0.25,
            feasible_start_retries: 1000,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn validate(&self) -> Result<(), SeqDesignError> {
        if self.sweeps == 0 {
            return Err(SeqDesignError::Configuration(
                "Sweep count must be at least 1".to_string(),
            ));
        }
        if self.restarts == 0 {
            return Err(SeqDesignError::Configuration(
                "Restart count must be at least 1".to_string(),
            ));
        }
        if self.base_temperature <= 0.0 {
            return Err(SeqDesignError::Configuration(
                "Base temperature must be positive".to_string(),
            ));
        }
        if self.cooling_ratio <= 0.0 || self.cooling_ratio >= 1.0 {
            return Err(SeqDesignError::Configuration(
                "Cooling ratio must be between 0 and 1".to_string(),
            ));
        }
        if self.pair_move_rate < 0.0 || self.pair_move_rate > 1.0 {
            return Err(SeqDesignError::Configuration(
                "Pair move rate must be between 0 and 1".to_string(),
            ));
        }
        if self.feasible_start_retries == 0 {
            return Err(SeqDesignError::Configuration(
                "Feasible start retry budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
