use seqdesign::campaign::{CampaignRunner, NullCallback, ProgressCallback};
use seqdesign::config::AppConfig;
use seqdesign::data::connectors::DataValidator;
use seqdesign::data::{MeasurementOracle, SyntheticDataset};
use seqdesign::engines::metrics::RoundSummary;
use seqdesign::types::{BatchId, Sequence};
use std::collections::HashSet;

fn small_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.schema.sequence_length = 4;
    config.inference.svi_steps = 300;
    config.search.sweeps = 40;
    config.search.restarts = 2;
    config.campaign.rounds = 3;
    config.campaign.batch_size = 8;
    config.campaign.seed_batch_size = 16;
    config.campaign.seed = Some(1234);
    config
}

fn small_oracle(config: &AppConfig) -> MeasurementOracle {
    let schema = config.schema.design_schema();
    let df = SyntheticDataset::generate(&schema, 0.1, 7).unwrap();
    let column_map = DataValidator::validate_dataset(&df, &schema).unwrap();
    MeasurementOracle::from_dataframe(&df, &column_map, &schema, 0.0).unwrap()
}

#[test]
fn test_campaign_accumulates_table() {
    let config = small_config();
    let oracle = small_oracle(&config);
    let runner = CampaignRunner::new(config, oracle).unwrap();

    let result = runner.run(NullCallback).unwrap();

    // 16 seed designs + 3 rounds of 8
    assert_eq!(result.table.len(), 16 + 3 * 8);
    assert_eq!(result.summaries.len(), 4);

    // Every design distinct, every batch tag in range
    let distinct: HashSet<&Sequence> =
        result.table.observations().iter().map(|o| &o.sequence).collect();
    assert_eq!(distinct.len(), result.table.len());
    for observation in result.table.observations() {
        assert!(observation.batch <= 3);
        assert_eq!(observation.sequence.len(), 4);
    }

    // Cumulative best never goes down
    for pair in result.summaries.windows(2) {
        assert!(pair[1].cumulative_best >= pair[0].cumulative_best);
    }
}

#[test]
fn test_campaign_deterministic_under_seed() {
    let config = small_config();

    let first = CampaignRunner::new(config.clone(), small_oracle(&config))
        .unwrap()
        .run(NullCallback)
        .unwrap();
    let second = CampaignRunner::new(config.clone(), small_oracle(&config))
        .unwrap()
        .run(NullCallback)
        .unwrap();

    assert_eq!(first.table.len(), second.table.len());
    let first_best = first.table.best().unwrap();
    let second_best = second.table.best().unwrap();
    assert_eq!(first_best.sequence, second_best.sequence);
    assert_eq!(first_best.response, second_best.response);
}

#[test]
fn test_campaign_respects_constraints() {
    let mut config = small_config();
    config.campaign.gc_bounds = Some((0, 2));
    config.campaign.forbidden_motifs = vec!["TTT".to_string()];
    let oracle = small_oracle(&config);

    let runner = CampaignRunner::new(config, oracle).unwrap();
    let result = runner.run(NullCallback).unwrap();

    let forbidden = Sequence::parse("TTT", 3).unwrap();
    for observation in result.table.observations() {
        // Constraints bind proposed rounds, not the random seed batch
        if observation.batch == 0 {
            continue;
        }
        assert!(observation.sequence.gc_count() <= 2, "{}", observation.sequence);
        assert!(
            !observation.sequence.contains_motif(forbidden.bases()),
            "{}",
            observation.sequence
        );
    }
}

#[test]
fn test_callbacks_fire_per_round() {
    struct Counter {
        starts: Vec<BatchId>,
        proposed: usize,
        completed: Vec<BatchId>,
    }

    impl ProgressCallback for Counter {
        fn on_round_start(&mut self, round: BatchId) {
            self.starts.push(round);
        }
        fn on_batch_proposed(&mut self, _round: BatchId, batch: &[Sequence]) {
            self.proposed += batch.len();
        }
        fn on_round_complete(&mut self, round: BatchId, _summary: &RoundSummary) {
            self.completed.push(round);
        }
    }

    let config = small_config();
    let oracle = small_oracle(&config);
    let runner = CampaignRunner::new(config, oracle).unwrap();

    let mut counter = Counter {
        starts: Vec::new(),
        proposed: 0,
        completed: Vec::new(),
    };
    runner.run(&mut counter).unwrap();

    assert_eq!(counter.starts, vec![0, 1, 2, 3]);
    assert_eq!(counter.completed, vec![0, 1, 2, 3]);
    assert_eq!(counter.proposed, 16 + 3 * 8);
}

#[test]
fn test_seed_batch_larger_than_library_fails() {
    let mut config = small_config();
    config.campaign.seed_batch_size = 1000;
    config.schema.sequence_length = 2; // library of 16
    let oracle = small_oracle(&config);

    let runner = CampaignRunner::new(config, oracle).unwrap();
    assert!(runner.run(NullCallback).is_err());
}
