use crate::error::Result;
use crate::types::{DesignSchema, Nucleotide, Sequence};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, StandardNormal};
use std::collections::HashSet;

/// Generator for the semi-synthetic binding-affinity ground truth.
///
/// Responses follow a position-weight-matrix energy plus couplings between
/// adjacent positions, with Gaussian noise on top, which keeps the response
/// approximately Gaussian while still rewarding a surrogate that models
/// interactions.
pub struct SyntheticDataset;

impl SyntheticDataset {
    /// Design spaces up to this size are enumerated exhaustively; larger
    /// ones are subsampled to this many rows
    pub const MAX_ROWS: u64 = 1 << 20;

    const COUPLING_SCALE: f64 = 0.3;

    pub fn generate(schema: &DesignSchema, noise: f64, seed: u64) -> Result<DataFrame> {
        let mut rng = StdRng::seed_from_u64(seed);

        // Per-position base weights
        let pwm: Vec<[f64; 4]> = (0..schema.length)
            .map(|_| {
                let mut row = [0.0; 4];
                for w in &mut row {
                    *w = StandardNormal.sample(&mut rng);
                }
                row
            })
            .collect();

        // Couplings between adjacent positions
        let couplings: Vec<[[f64; 4]; 4]> = (0..schema.length.saturating_sub(1))
            .map(|_| {
                let mut grid = [[0.0; 4]; 4];
                for row in &mut grid {
                    for w in row.iter_mut() {
                        let draw: f64 = StandardNormal.sample(&mut rng);
                        *w = draw * Self::COUPLING_SCALE;
                    }
                }
                grid
            })
            .collect();

        let sequences = Self::design_points(schema, &mut rng);

        let noise_dist = if noise > 0.0 {
            Some(Normal::new(0.0, noise).map_err(|e| {
                crate::error::SeqDesignError::Validation(format!("Invalid noise scale: {}", e))
            })?)
        } else {
            None
        };

        let mut names = Vec::with_capacity(sequences.len());
        let mut responses = Vec::with_capacity(sequences.len());
        for sequence in &sequences {
            let mut energy = 0.0;
            let bases = sequence.bases();
            for (pos, base) in bases.iter().enumerate() {
                energy += pwm[pos][base.index()];
            }
            for (pos, pair) in bases.windows(2).enumerate() {
                energy += couplings[pos][pair[0].index()][pair[1].index()];
            }
            if let Some(dist) = &noise_dist {
                energy += dist.sample(&mut rng);
            }
            names.push(sequence.to_string());
            responses.push(energy);
        }

        let df = df! {
            "sequence" => names,
            "affinity" => responses,
        }?;

        log::info!(
            "Generated synthetic dataset: {} designs of length {}",
            df.height(),
            schema.length
        );

        Ok(df)
    }

    fn design_points(schema: &DesignSchema, rng: &mut StdRng) -> Vec<Sequence> {
        let cardinality = schema.cardinality();
        if cardinality <= Self::MAX_ROWS {
            (0..cardinality).map(|i| Self::decode(i, schema.length)).collect()
        } else {
            let mut seen = HashSet::new();
            let mut points = Vec::with_capacity(Self::MAX_ROWS as usize);
            while points.len() < Self::MAX_ROWS as usize {
                let candidate = schema.random_sequence(rng);
                if seen.insert(candidate.clone()) {
                    points.push(candidate);
                }
            }
            points
        }
    }

    /// Decode a design index into a sequence (base-4 digits, leftmost first)
    fn decode(index: u64, length: usize) -> Sequence {
        let mut bases = vec![Nucleotide::A; length];
        let mut rest = index;
        for pos in (0..length).rev() {
            let digit = (rest % Nucleotide::COUNT as u64) as usize;
            bases[pos] = Nucleotide::from_index(digit).unwrap_or(Nucleotide::A);
            rest /= Nucleotide::COUNT as u64;
        }
        Sequence::new(bases)
    }
}
