use crate::types::{Nucleotide, Sequence};
use rand::Rng;

/// Substitute one random position with a different base
pub fn point_substitution<R: Rng>(sequence: &Sequence, rng: &mut R) -> Sequence {
    let mut candidate = sequence.clone();
    let position = rng.gen_range(0..sequence.len());
    let current = sequence.bases()[position];

    // Offset in 1..4 never lands back on the current base
    let offset = rng.gen_range(1..Nucleotide::COUNT);
    let base = Nucleotide::from_index((current.index() + offset) % Nucleotide::COUNT)
        .unwrap_or(current);

    candidate.set(position, base);
    candidate
}

/// Resample both positions of a grouped pair uniformly
pub fn pair_resample<R: Rng>(sequence: &Sequence, pair: (usize, usize), rng: &mut R) -> Sequence {
    let mut candidate = sequence.clone();
    for position in [pair.0, pair.1] {
        let base = Nucleotide::from_index(rng.gen_range(0..Nucleotide::COUNT))
            .unwrap_or(sequence.bases()[position]);
        candidate.set(position, base);
    }
    candidate
}
