use crate::types::{Nucleotide, Sequence};
use std::collections::HashSet;
use std::sync::Arc;

/// One feasibility rule over the design space.
///
/// Sequence sets are shared behind Arc so that per-round constraint sets can
/// reference the (possibly large) library without copying it.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Designs that must not be proposed again (e.g. already measured)
    ExcludeSequences(Arc<HashSet<Sequence>>),
    /// Proposals must come from the measurable library
    RestrictToLibrary(Arc<HashSet<Sequence>>),
    /// Bounds on the number of G/C bases
    GcContent { min: usize, max: usize },
    /// Contiguous subsequence that must not occur
    ForbiddenMotif(Vec<Nucleotide>),
}

impl Constraint {
    pub fn is_satisfied(&self, sequence: &Sequence) -> bool {
        match self {
            Self::ExcludeSequences(set) => !set.contains(sequence),
            Self::RestrictToLibrary(set) => set.contains(sequence),
            Self::GcContent { min, max } => {
                let gc = sequence.gc_count();
                gc >= *min && gc <= *max
            }
            Self::ForbiddenMotif(motif) => !sequence.contains_motif(motif),
        }
    }
}

/// Conjunction of constraints; an empty set accepts everything
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.push(constraint);
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn is_satisfied(&self, sequence: &Sequence) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(sequence))
    }

    /// The library set, if proposals are restricted to one. Search uses it
    /// to draw starting points that stand a chance of being feasible.
    pub fn library(&self) -> Option<&Arc<HashSet<Sequence>>> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::RestrictToLibrary(set) => Some(set),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Sequence {
        Sequence::parse(s, s.len()).unwrap()
    }

    #[test]
    fn test_empty_set_accepts_all() {
        assert!(ConstraintSet::new().is_satisfied(&seq("ACGT")));
    }

    #[test]
    fn test_exclude_sequences() {
        let mut excluded = HashSet::new();
        excluded.insert(seq("ACGT"));
        let set = ConstraintSet::new().with(Constraint::ExcludeSequences(Arc::new(excluded)));
        assert!(!set.is_satisfied(&seq("ACGT")));
        assert!(set.is_satisfied(&seq("TTTT")));
    }

    #[test]
    fn test_restrict_to_library() {
        let mut library = HashSet::new();
        library.insert(seq("ACGT"));
        let set = ConstraintSet::new().with(Constraint::RestrictToLibrary(Arc::new(library)));
        assert!(set.is_satisfied(&seq("ACGT")));
        assert!(!set.is_satisfied(&seq("TTTT")));
    }

    #[test]
    fn test_gc_content() {
        let set = ConstraintSet::new().with(Constraint::GcContent { min: 1, max: 2 });
        assert!(set.is_satisfied(&seq("ACTT")));
        assert!(set.is_satisfied(&seq("GCTT")));
        assert!(!set.is_satisfied(&seq("AATT")));
        assert!(!set.is_satisfied(&seq("GGCC")));
    }

    #[test]
    fn test_forbidden_motif() {
        let motif = seq("GG").bases().to_vec();
        let set = ConstraintSet::new().with(Constraint::ForbiddenMotif(motif));
        assert!(!set.is_satisfied(&seq("AGGT")));
        assert!(set.is_satisfied(&seq("AGTG")));
    }

    #[test]
    fn test_conjunction() {
        let set = ConstraintSet::new()
            .with(Constraint::GcContent { min: 1, max: 4 })
            .with(Constraint::ForbiddenMotif(seq("CC").bases().to_vec()));
        assert!(set.is_satisfied(&seq("ACGT")));
        assert!(!set.is_satisfied(&seq("ACCT")));
        assert!(!set.is_satisfied(&seq("AATT")));
    }
}
