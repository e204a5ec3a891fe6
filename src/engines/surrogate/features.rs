use crate::error::{Result, SeqDesignError};
use crate::types::{DesignSchema, FeatureBlocks, Nucleotide, Sequence};

/// One-hot block encoding of a design.
///
/// Layout: intercept, then a 4-wide main-effect block per position, then a
/// 16-wide joint block per configured position pair. Block boundaries are
/// what the grouping definitions in `FeatureBlocks` refer to.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: DesignSchema,
    blocks: FeatureBlocks,
}

impl FeatureEncoder {
    const PAIR_BLOCK_WIDTH: usize = Nucleotide::COUNT * Nucleotide::COUNT;

    pub fn new(schema: DesignSchema, blocks: FeatureBlocks) -> Result<Self> {
        blocks.validate(&schema)?;
        Ok(Self { schema, blocks })
    }

    pub fn schema(&self) -> &DesignSchema {
        &self.schema
    }

    pub fn blocks(&self) -> &FeatureBlocks {
        &self.blocks
    }

    /// Total feature dimension
    pub fn dimension(&self) -> usize {
        1 + self.schema.length * Nucleotide::COUNT
            + self.blocks.pair_blocks.len() * Self::PAIR_BLOCK_WIDTH
    }

    /// Feature index of the main effect (position, base)
    pub fn main_effect_index(&self, position: usize, base: Nucleotide) -> usize {
        1 + position * Nucleotide::COUNT + base.index()
    }

    pub fn encode(&self, sequence: &Sequence) -> Result<Vec<f64>> {
        if !self.schema.accepts(sequence) {
            return Err(SeqDesignError::Validation(format!(
                "Sequence {} does not fit schema length {}",
                sequence, self.schema.length
            )));
        }

        let mut phi = vec![0.0; self.dimension()];
        phi[0] = 1.0;

        for (position, base) in sequence.bases().iter().enumerate() {
            phi[self.main_effect_index(position, *base)] = 1.0;
        }

        let pair_base = 1 + self.schema.length * Nucleotide::COUNT;
        for (k, &(a, b)) in self.blocks.pair_blocks.iter().enumerate() {
            let ia = sequence.bases()[a].index();
            let ib = sequence.bases()[b].index();
            phi[pair_base + k * Self::PAIR_BLOCK_WIDTH + ia * Nucleotide::COUNT + ib] = 1.0;
        }

        Ok(phi)
    }
}
