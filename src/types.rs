use crate::error::{Result, SeqDesignError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round identifier attached to every observation
pub type BatchId = u32;

/// Four-letter DNA alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const COUNT: usize = 4;

    pub fn all() -> [Nucleotide; 4] {
        [Self::A, Self::C, Self::G, Self::T]
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        }
    }

    /// Position of this symbol within the alphabet (0..4)
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::C),
            2 => Some(Self::G),
            3 => Some(Self::T),
            _ => None,
        }
    }

    pub fn is_gc(self) -> bool {
        matches!(self, Self::C | Self::G)
    }
}

/// Fixed-length DNA sequence. Length is set by the design schema and never
/// changes after construction; sequences compare and hash by value so that
/// previously measured designs can be looked up in the experiment table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
    pub fn new(bases: Vec<Nucleotide>) -> Self {
        Self(bases)
    }

    /// Parse from a string like "ACGTACGT", enforcing the expected length
    pub fn parse(s: &str, expected_len: usize) -> Result<Self> {
        if s.len() != expected_len {
            return Err(SeqDesignError::Validation(format!(
                "Sequence '{}' has length {}, expected {}",
                s,
                s.len(),
                expected_len
            )));
        }

        let bases = s
            .chars()
            .map(|c| {
                Nucleotide::from_char(c).ok_or_else(|| {
                    SeqDesignError::Validation(format!(
                        "Invalid symbol '{}' in sequence '{}' (alphabet is ACGT)",
                        c, s
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self(bases))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bases(&self) -> &[Nucleotide] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<Nucleotide> {
        self.0.get(position).copied()
    }

    pub fn set(&mut self, position: usize, base: Nucleotide) {
        self.0[position] = base;
    }

    /// Number of G/C bases, used by the GC-content constraint
    pub fn gc_count(&self) -> usize {
        self.0.iter().filter(|b| b.is_gc()).count()
    }

    /// True if `motif` occurs as a contiguous subsequence
    pub fn contains_motif(&self, motif: &[Nucleotide]) -> bool {
        if motif.is_empty() || motif.len() > self.0.len() {
            return false;
        }
        self.0.windows(motif.len()).any(|w| w == motif)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.0 {
            write!(f, "{}", base.to_char())?;
        }
        Ok(())
    }
}

/// Categorical design space: fixed-length sequences over the DNA alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSchema {
    pub length: usize,
}

impl DesignSchema {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Total number of designs in the space (4^length)
    pub fn cardinality(&self) -> u64 {
        (Nucleotide::COUNT as u64).pow(self.length as u32)
    }

    pub fn random_sequence<R: Rng>(&self, rng: &mut R) -> Sequence {
        let bases = (0..self.length)
            .map(|_| {
                Nucleotide::from_index(rng.gen_range(0..Nucleotide::COUNT))
                    .unwrap_or(Nucleotide::A)
            })
            .collect();
        Sequence::new(bases)
    }

    pub fn accepts(&self, sequence: &Sequence) -> bool {
        sequence.len() == self.length
    }
}

impl Default for DesignSchema {
    fn default() -> Self {
        Self { length: 8 }
    }
}

/// Feature/grouping block definitions for the surrogate model and blockwise
/// search moves. Every position always contributes a main-effect block;
/// `pair_blocks` lists position pairs that additionally get a joint
/// interaction block (16 features per pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBlocks {
    pub pair_blocks: Vec<(usize, usize)>,
}

impl FeatureBlocks {
    pub fn main_effects_only() -> Self {
        Self {
            pair_blocks: Vec::new(),
        }
    }

    /// One interaction block per adjacent position pair
    pub fn with_adjacent_pairs(length: usize) -> Self {
        Self {
            pair_blocks: (0..length.saturating_sub(1)).map(|i| (i, i + 1)).collect(),
        }
    }

    pub fn validate(&self, schema: &DesignSchema) -> Result<()> {
        for &(a, b) in &self.pair_blocks {
            if a >= schema.length || b >= schema.length {
                return Err(SeqDesignError::Validation(format!(
                    "Pair block ({}, {}) out of range for length {}",
                    a, b, schema.length
                )));
            }
            if a == b {
                return Err(SeqDesignError::Validation(format!(
                    "Pair block ({}, {}) references the same position twice",
                    a, b
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureBlocks {
    fn default() -> Self {
        Self::main_effects_only()
    }
}

/// One measured data point: a design, its response, and the round that
/// acquired it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub sequence: Sequence,
    pub response: f64,
    pub batch: BatchId,
}
