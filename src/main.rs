use anyhow::Context;
use seqdesign::campaign::{CampaignRunner, ProgressCallback};
use seqdesign::config::ConfigManager;
use seqdesign::data::{CsvConnector, MeasurementOracle, SyntheticDataset};
use seqdesign::engines::metrics::RoundSummary;
use seqdesign::types::{BatchId, Sequence};

struct LogCallback;

impl ProgressCallback for LogCallback {
    fn on_round_start(&mut self, round: BatchId) {
        log::info!("--- round {} ---", round);
    }

    fn on_batch_proposed(&mut self, round: BatchId, batch: &[Sequence]) {
        for sequence in batch {
            log::debug!("round {} proposes {}", round, sequence);
        }
    }

    fn on_round_complete(&mut self, _round: BatchId, summary: &RoundSummary) {
        if let Some(regret) = summary.regret {
            log::info!("remaining regret: {:.3}", regret);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Usage: seqdesign [config.toml] [dataset.csv]
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1);
    let dataset_path = args.get(2);

    let manager = ConfigManager::new();
    if let Some(path) = config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading config from {}", path))?;
    }
    let config = manager.get();

    let schema = config.schema.design_schema();
    let (dataset, column_map) = match dataset_path {
        Some(path) => {
            let (df, map) = CsvConnector::load_and_validate(path, &schema, None)
                .with_context(|| format!("loading dataset from {}", path))?;
            let preview = CsvConnector::create_preview(path, &df, &map, &schema)?;
            log::info!(
                "Loaded {} designs from {} (response range {:.3}..{:.3})",
                preview.metadata.num_rows,
                preview.metadata.file_path,
                preview.metadata.response_range.0,
                preview.metadata.response_range.1
            );
            for stats in &preview.column_stats {
                log::info!(
                    "  column {} ({}): {} nulls, mean {:?}",
                    stats.name,
                    stats.dtype,
                    stats.null_count,
                    stats.mean
                );
            }
            for row in &preview.first_rows {
                log::debug!("  {}", row.join(", "));
            }
            (df, map)
        }
        None => {
            let seed = config.campaign.seed.unwrap_or(0);
            let df = SyntheticDataset::generate(&schema, 0.25, seed)?;
            let map = seqdesign::data::connectors::DataValidator::validate_dataset(&df, &schema)?;
            (df, map)
        }
    };

    let oracle = MeasurementOracle::from_dataframe(
        &dataset,
        &column_map,
        &schema,
        config.campaign.measurement_noise,
    )?;

    let runner = CampaignRunner::new(config, oracle)?;
    log::info!("Campaign seed: {}", runner.seed());

    let result = runner.run(LogCallback)?;

    let summary = runner.metrics().summary_frame(&result.summaries)?;
    println!("{}", summary);

    if let Some(best) = result.table.best() {
        println!(
            "Best design after {} measurements: {} (response {:.4}, found in round {})",
            result.table.len(),
            best.sequence,
            best.response,
            best.batch
        );
    }

    Ok(())
}
