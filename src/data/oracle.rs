use crate::data::connectors::types::RequiredColumn;
use crate::error::{Result, SeqDesignError};
use crate::types::{BatchId, DesignSchema, Observation, Sequence};
use polars::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;

/// Simulated measurement backend for the active-learning loop.
///
/// The semi-synthetic dataset acts as ground truth: proposed designs are
/// looked up by value and their recorded response is returned, optionally
/// perturbed by Gaussian measurement noise. Asking for a design outside the
/// library is an error.
pub struct MeasurementOracle {
    table: HashMap<Sequence, f64>,
    noise: f64,
}

impl MeasurementOracle {
    pub fn new(table: HashMap<Sequence, f64>, noise: f64) -> Self {
        Self { table, noise }
    }

    /// Build the lookup table from a validated dataset
    pub fn from_dataframe(
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
        schema: &DesignSchema,
        noise: f64,
    ) -> Result<Self> {
        let sequence_name = column_map
            .get(&RequiredColumn::Sequence)
            .ok_or_else(|| SeqDesignError::DataLoading("Sequence column unresolved".to_string()))?;
        let response_name = column_map
            .get(&RequiredColumn::Response)
            .ok_or_else(|| SeqDesignError::DataLoading("Response column unresolved".to_string()))?;

        let sequences = df.column(sequence_name)?.str()?;
        let responses = df.column(response_name)?.cast(&DataType::Float64)?;
        let responses = responses.f64()?;

        let mut table = HashMap::with_capacity(df.height());
        for i in 0..df.height() {
            let (Some(s), Some(y)) = (sequences.get(i), responses.get(i)) else {
                continue; // nulls were already reported by the validator
            };
            let sequence = Sequence::parse(s, schema.length)?;
            table.insert(sequence, y);
        }

        if table.is_empty() {
            return Err(SeqDesignError::DataLoading(
                "Dataset contains no usable rows".to_string(),
            ));
        }

        Ok(Self { table, noise })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, sequence: &Sequence) -> bool {
        self.table.contains_key(sequence)
    }

    /// Noise-free ground-truth response, if the design is in the library
    pub fn lookup(&self, sequence: &Sequence) -> Option<f64> {
        self.table.get(sequence).copied()
    }

    pub fn library(&self) -> impl Iterator<Item = &Sequence> {
        self.table.keys()
    }

    /// Best noise-free response across the whole library
    pub fn best_response(&self) -> Option<f64> {
        self.table
            .values()
            .copied()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// "Measure" a proposed batch: look up each design and tag it with the
    /// acquiring round
    pub fn measure<R: Rng>(
        &self,
        batch: &[Sequence],
        batch_id: BatchId,
        rng: &mut R,
    ) -> Result<Vec<Observation>> {
        let noise_dist = if self.noise > 0.0 {
            Some(Normal::new(0.0, self.noise).map_err(|e| {
                SeqDesignError::Campaign(format!("Invalid measurement noise: {}", e))
            })?)
        } else {
            None
        };

        batch
            .iter()
            .map(|sequence| {
                let truth = self.lookup(sequence).ok_or_else(|| {
                    SeqDesignError::Campaign(format!(
                        "Proposed design {} is not in the measurable library",
                        sequence
                    ))
                })?;
                let response = match &noise_dist {
                    Some(dist) => truth + dist.sample(rng),
                    None => truth,
                };
                Ok(Observation {
                    sequence: sequence.clone(),
                    response,
                    batch: batch_id,
                })
            })
            .collect()
    }
}
