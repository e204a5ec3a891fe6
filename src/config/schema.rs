use super::traits::ConfigSection;
use crate::error::SeqDesignError;
use crate::types::{DesignSchema, FeatureBlocks};
use serde::{Deserialize, Serialize};

/// Design-space schema: sequence length and feature/grouping blocks.
/// The alphabet itself is fixed (ACGT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub sequence_length: usize,
    /// Add a joint interaction block for every adjacent position pair
    pub adjacent_pair_blocks: bool,
}

impl SchemaConfig {
    pub fn design_schema(&self) -> DesignSchema {
        DesignSchema::new(self.sequence_length)
    }

    pub fn feature_blocks(&self) -> FeatureBlocks {
        if self.adjacent_pair_blocks {
            FeatureBlocks::with_adjacent_pairs(self.sequence_length)
        } else {
            FeatureBlocks::main_effects_only()
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            sequence_length: 8,
            adjacent_pair_blocks: true,
        }
    }
}

impl ConfigSection for SchemaConfig {
    fn validate(&self) -> Result<(), SeqDesignError> {
        if self.sequence_length == 0 {
            return Err(SeqDesignError::Configuration(
                "Sequence length must be at least 1".to_string(),
            ));
        }
        if self.sequence_length > 24 {
            return Err(SeqDesignError::Configuration(
                "Sequence length above 24 overflows the design-space cardinality".to_string(),
            ));
        }
        Ok(())
    }
}
