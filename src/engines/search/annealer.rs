use super::constraints::ConstraintSet;
use super::moves::{pair_resample, point_substitution};
use crate::config::SearchConfig;
use crate::error::{Result, SeqDesignError};
use crate::types::{DesignSchema, FeatureBlocks, Sequence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashSet;

/// Library density below which search scans the library members directly.
/// Point and pair moves walk the full 4^L space, so against a sparse library
/// almost every proposal lands outside it and the chain never moves.
const SCAN_DENSITY: f64 = 0.5;

/// Simulated-annealing maximizer over the constrained design space.
///
/// Each restart walks the space with point substitutions and blockwise pair
/// moves under a geometric cooling schedule, accepting uphill moves always
/// and downhill moves with Metropolis probability. Restarts run in parallel
/// and the best feasible design visited anywhere wins.
pub struct Annealer {
    schema: DesignSchema,
    blocks: FeatureBlocks,
    config: SearchConfig,
}

/// Metropolis acceptance for a proposed score change
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta >= 0.0 {
        1.0
    } else {
        (delta / temperature.max(1e-9)).exp()
    }
}

impl Annealer {
    pub fn new(schema: DesignSchema, blocks: FeatureBlocks, config: SearchConfig) -> Result<Self> {
        blocks.validate(&schema)?;
        Ok(Self {
            schema,
            blocks,
            config,
        })
    }

    /// Find a high-scoring feasible design, restarting from several random
    /// starting points
    pub fn maximize<F>(
        &self,
        score: &F,
        constraints: &ConstraintSet,
        seed: u64,
    ) -> Result<(Sequence, f64)>
    where
        F: Fn(&Sequence) -> f64 + Sync,
    {
        if let Some(library) = constraints.library() {
            let density = library.len() as f64 / self.schema.cardinality() as f64;
            if density < SCAN_DENSITY {
                return Self::scan_library(score, constraints, library);
            }
        }

        let results: Vec<(Sequence, f64)> = (0..self.config.restarts)
            .into_par_iter()
            .map(|restart| {
                let restart_seed = seed.wrapping_add(restart as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                self.run_restart(score, constraints, restart_seed)
            })
            .collect::<Result<Vec<_>>>()?;

        results
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| SeqDesignError::Search("No annealing restarts ran".to_string()))
    }

    /// Exhaustively score the feasible library members and return the best
    fn scan_library<F>(
        score: &F,
        constraints: &ConstraintSet,
        library: &HashSet<Sequence>,
    ) -> Result<(Sequence, f64)>
    where
        F: Fn(&Sequence) -> f64 + Sync,
    {
        library
            .par_iter()
            .filter(|sequence| constraints.is_satisfied(sequence))
            .map(|sequence| (sequence.clone(), score(sequence)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| {
                SeqDesignError::Search("No feasible library member to propose".to_string())
            })
    }

    fn run_restart<F>(
        &self,
        score: &F,
        constraints: &ConstraintSet,
        seed: u64,
    ) -> Result<(Sequence, f64)>
    where
        F: Fn(&Sequence) -> f64 + Sync,
    {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut current = self.feasible_start(constraints, &mut rng)?;
        let mut current_score = score(&current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = self.config.base_temperature;
        for _ in 0..self.config.sweeps {
            for _ in 0..self.schema.length {
                let candidate = self.propose(&current, &mut rng);
                if !constraints.is_satisfied(&candidate) {
                    continue;
                }

                let candidate_score = score(&candidate);
                let delta = candidate_score - current_score;
                if rng.gen::<f64>() < acceptance_probability(delta, temperature) {
                    current = candidate;
                    current_score = candidate_score;
                    if current_score > best_score {
                        best = current.clone();
                        best_score = current_score;
                    }
                }
            }
            temperature *= self.config.cooling_ratio;
        }

        Ok((best, best_score))
    }

    fn propose(&self, current: &Sequence, rng: &mut StdRng) -> Sequence {
        let use_pair = !self.blocks.pair_blocks.is_empty()
            && rng.gen::<f64>() < self.config.pair_move_rate;
        if use_pair {
            let pair = self.blocks.pair_blocks[rng.gen_range(0..self.blocks.pair_blocks.len())];
            pair_resample(current, pair, rng)
        } else {
            point_substitution(current, rng)
        }
    }

    /// Draw a random feasible starting point, within the retry budget.
    /// When proposals are restricted to a library, start from one of its
    /// members instead of an arbitrary point of the full space.
    fn feasible_start(&self, constraints: &ConstraintSet, rng: &mut StdRng) -> Result<Sequence> {
        let library = constraints.library();
        for _ in 0..self.config.feasible_start_retries {
            let candidate = match library {
                Some(set) if !set.is_empty() => set
                    .iter()
                    .nth(rng.gen_range(0..set.len()))
                    .cloned()
                    .unwrap_or_else(|| self.schema.random_sequence(rng)),
                _ => self.schema.random_sequence(rng),
            };
            if constraints.is_satisfied(&candidate) {
                return Ok(candidate);
            }
        }
        Err(SeqDesignError::Search(format!(
            "No feasible starting point found in {} draws",
            self.config.feasible_start_retries
        )))
    }
}
