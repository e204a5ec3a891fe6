use seqdesign::config::{InferenceConfig, SearchConfig};
use seqdesign::engines::sampler::ThompsonSampler;
use seqdesign::engines::search::{Constraint, ConstraintSet};
use seqdesign::experiment::ExperimentTable;
use seqdesign::types::{DesignSchema, FeatureBlocks, Nucleotide, Observation, Sequence};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn sampler(constraints: ConstraintSet) -> ThompsonSampler {
    ThompsonSampler::new(
        DesignSchema::new(4),
        FeatureBlocks::main_effects_only(),
        constraints,
        InferenceConfig {
            svi_steps: 800,
            ..InferenceConfig::default()
        },
        SearchConfig {
            sweeps: 60,
            restarts: 4,
            ..SearchConfig::default()
        },
    )
    .unwrap()
}

/// Seed the table with random designs scored by a planted linear truth:
/// three points per G base
fn g_rich_table(rows: usize) -> ExperimentTable {
    let schema = DesignSchema::new(4);
    let mut rng = StdRng::seed_from_u64(99);
    let mut table = ExperimentTable::new();

    while table.len() < rows {
        let sequence = schema.random_sequence(&mut rng);
        if table.contains(&sequence) {
            continue;
        }
        let response = 3.0
            * sequence
                .bases()
                .iter()
                .filter(|b| **b == Nucleotide::G)
                .count() as f64;
        table
            .append(Observation {
                sequence,
                response,
                batch: 0,
            })
            .unwrap();
    }

    table
}

#[test]
fn test_batch_is_distinct_and_unmeasured() {
    let table = g_rich_table(40);
    let batch = sampler(ConstraintSet::new()).propose(&table, 10, 5).unwrap();

    assert_eq!(batch.len(), 10);
    let distinct: HashSet<&Sequence> = batch.iter().collect();
    assert_eq!(distinct.len(), 10);
    for proposed in &batch {
        assert!(!table.contains(proposed));
    }
}

#[test]
fn test_exploits_planted_signal() {
    let table = g_rich_table(60);
    let batch = sampler(ConstraintSet::new()).propose(&table, 8, 21).unwrap();

    // With a strong noiseless signal the posterior should steer proposals
    // toward G-rich designs; the library average is 1 G per design
    let mean_g: f64 = batch
        .iter()
        .map(|s| s.bases().iter().filter(|b| **b == Nucleotide::G).count() as f64)
        .sum::<f64>()
        / batch.len() as f64;
    assert!(mean_g > 2.0, "mean G count was {}", mean_g);
}

#[test]
fn test_constraints_bind_proposals() {
    let constraints = ConstraintSet::new()
        .with(Constraint::GcContent { min: 0, max: 2 })
        .with(Constraint::ForbiddenMotif(
            Sequence::parse("GG", 2).unwrap().bases().to_vec(),
        ));

    let table = g_rich_table(40);
    let batch = sampler(constraints).propose(&table, 8, 13).unwrap();

    let motif = Sequence::parse("GG", 2).unwrap();
    for proposed in &batch {
        assert!(proposed.gc_count() <= 2, "{}", proposed);
        assert!(!proposed.contains_motif(motif.bases()), "{}", proposed);
    }
}

#[test]
fn test_restrict_to_library() {
    let library: HashSet<Sequence> = ["AAAA", "ACGT", "GGTT", "TTAA", "CAGT", "TGCA"]
        .iter()
        .map(|s| Sequence::parse(s, 4).unwrap())
        .collect();
    let constraints = ConstraintSet::new()
        .with(Constraint::RestrictToLibrary(std::sync::Arc::new(library.clone())));

    let batch = sampler(constraints)
        .propose(&ExperimentTable::new(), 3, 77)
        .unwrap();
    for proposed in &batch {
        assert!(library.contains(proposed), "{} not in library", proposed);
    }
}
