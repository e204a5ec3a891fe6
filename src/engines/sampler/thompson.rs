use crate::config::{InferenceConfig, SearchConfig};
use crate::data::EncodingCache;
use crate::engines::search::{Annealer, Constraint, ConstraintSet};
use crate::engines::surrogate::posterior::dot;
use crate::engines::surrogate::{FeatureEncoder, GaussianPosterior, SviEngine};
use crate::error::{Result, SeqDesignError};
use crate::experiment::ExperimentTable;
use crate::types::{DesignSchema, FeatureBlocks, Sequence};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

/// Thompson-sampling batch proposer.
///
/// Each call fits the variational posterior to the accumulated experiment
/// table, then fills the batch one slot at a time: draw a weight vector from
/// the posterior, anneal its linear score over the constrained design space,
/// and exclude the winner from later slots so the batch comes back distinct.
pub struct ThompsonSampler {
    encoder: FeatureEncoder,
    constraints: ConstraintSet,
    annealer: Annealer,
    svi: SviEngine,
    cache: EncodingCache,
}

impl ThompsonSampler {
    pub fn new(
        schema: DesignSchema,
        blocks: FeatureBlocks,
        constraints: ConstraintSet,
        inference: InferenceConfig,
        search: SearchConfig,
    ) -> Result<Self> {
        let encoder = FeatureEncoder::new(schema, blocks.clone())?;
        let annealer = Annealer::new(schema, blocks, search)?;
        Ok(Self {
            encoder,
            constraints,
            annealer,
            svi: SviEngine::new(inference),
            cache: EncodingCache::new(1 << 16),
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Propose `batch_size` distinct, feasible, not-yet-measured designs
    pub fn propose(
        &self,
        table: &ExperimentTable,
        batch_size: usize,
        seed: u64,
    ) -> Result<Vec<Sequence>> {
        if batch_size == 0 {
            return Err(SeqDesignError::Validation(
                "Batch size must be at least 1".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let posterior = self.fit_posterior(table, &mut rng)?;

        let mut excluded: HashSet<Sequence> = table.measured_sequences().clone();
        let mut batch = Vec::with_capacity(batch_size);

        for slot in 0..batch_size {
            let weights = posterior.sample(&mut rng);
            let score = |sequence: &Sequence| match self.encoder.encode(sequence) {
                Ok(phi) => dot(&weights, &phi),
                Err(_) => f64::NEG_INFINITY,
            };

            let effective = self
                .constraints
                .clone()
                .with(Constraint::ExcludeSequences(Arc::new(excluded.clone())));

            let slot_seed = seed
                .wrapping_add(1 + slot as u64)
                .wrapping_mul(0xD1B5_4A32_D192_ED03);
            let (winner, winner_score) =
                self.annealer.maximize(&score, &effective, slot_seed)?;

            log::debug!(
                "Thompson slot {}/{}: {} (sampled score {:.3})",
                slot + 1,
                batch_size,
                winner,
                winner_score
            );

            excluded.insert(winner.clone());
            batch.push(winner);
        }

        Ok(batch)
    }

    /// Fit the posterior to the table; an empty table yields the prior
    fn fit_posterior(&self, table: &ExperimentTable, rng: &mut StdRng) -> Result<GaussianPosterior> {
        if table.is_empty() {
            return Ok(GaussianPosterior::from_prior(
                self.encoder.dimension(),
                self.svi.config().prior_scale,
            ));
        }

        let mut features = Vec::with_capacity(table.len());
        for observation in table.observations() {
            let phi = match self.cache.get(&observation.sequence) {
                Some(phi) => phi,
                None => {
                    let phi = self.encoder.encode(&observation.sequence)?;
                    self.cache.set(observation.sequence.clone(), phi.clone());
                    phi
                }
            };
            features.push(phi);
        }

        // Standardize responses for the fit; a monotone transform leaves the
        // argmax of every Thompson draw unchanged
        let responses: Vec<f64> = table.observations().iter().map(|o| o.response).collect();
        let n = responses.len() as f64;
        let mean = responses.iter().sum::<f64>() / n;
        let variance = responses.iter().map(|y| (y - mean) * (y - mean)).sum::<f64>() / n;
        let scale = if variance > 0.0 { variance.sqrt() } else { 1.0 };
        let standardized: Vec<f64> = responses.iter().map(|y| (y - mean) / scale).collect();

        self.svi.fit(&features, &standardized, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Observation;

    fn sampler(length: usize, constraints: ConstraintSet) -> ThompsonSampler {
        ThompsonSampler::new(
            DesignSchema::new(length),
            FeatureBlocks::main_effects_only(),
            constraints,
            InferenceConfig {
                svi_steps: 300,
                ..InferenceConfig::default()
            },
            SearchConfig {
                sweeps: 50,
                restarts: 2,
                ..SearchConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_empty_table_proposes_from_prior() {
        let sampler = sampler(4, ConstraintSet::new());
        let batch = sampler.propose(&ExperimentTable::new(), 5, 17).unwrap();
        assert_eq!(batch.len(), 5);
        let distinct: HashSet<_> = batch.iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_excludes_measured_designs() {
        let mut table = ExperimentTable::new();
        for s in ["AAAA", "CCCC", "GGGG", "TTTT"] {
            table
                .append(Observation {
                    sequence: Sequence::parse(s, 4).unwrap(),
                    response: 1.0,
                    batch: 0,
                })
                .unwrap();
        }

        let sampler = sampler(4, ConstraintSet::new());
        let batch = sampler.propose(&table, 8, 3).unwrap();
        for proposed in &batch {
            assert!(!table.contains(proposed), "re-proposed {}", proposed);
        }
    }

    #[test]
    fn test_zero_batch_rejected() {
        let sampler = sampler(4, ConstraintSet::new());
        assert!(sampler.propose(&ExperimentTable::new(), 0, 1).is_err());
    }

    #[test]
    fn test_respects_gc_constraint() {
        let constraints = ConstraintSet::new().with(Constraint::GcContent { min: 0, max: 2 });
        let sampler = sampler(4, constraints);
        let batch = sampler.propose(&ExperimentTable::new(), 6, 29).unwrap();
        for proposed in &batch {
            assert!(proposed.gc_count() <= 2, "{} violates GC bound", proposed);
        }
    }
}
