use crate::error::{Result, SeqDesignError};
use crate::experiment::ExperimentTable;
use crate::types::BatchId;
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary statistics for one acquisition round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub batch: BatchId,
    pub batch_size: usize,
    pub batch_mean: f64,
    pub batch_std: f64,
    pub batch_min: f64,
    pub batch_max: f64,
    /// Best response over everything measured up to and including this round
    pub cumulative_best: f64,
    /// Gap to the known library optimum, when one is available
    pub regret: Option<f64>,
    pub completed_at: DateTime<Utc>,
}

/// Computes per-round summaries; stands in for the notebook-style plots
pub struct MetricsEngine {
    library_best: Option<f64>,
}

impl MetricsEngine {
    pub fn new(library_best: Option<f64>) -> Self {
        Self { library_best }
    }

    pub fn summarize(&self, table: &ExperimentTable, batch_id: BatchId) -> Result<RoundSummary> {
        let batch = table.batch(batch_id);
        if batch.is_empty() {
            return Err(SeqDesignError::Campaign(format!(
                "Round {} produced no observations",
                batch_id
            )));
        }

        let responses: Vec<f64> = batch.iter().map(|o| o.response).collect();
        let n = responses.len() as f64;
        let mean = responses.iter().sum::<f64>() / n;
        let variance = responses.iter().map(|y| (y - mean) * (y - mean)).sum::<f64>() / n;
        let min = responses.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = responses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let cumulative_best = table
            .observations()
            .iter()
            .filter(|o| o.batch <= batch_id)
            .map(|o| o.response)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(RoundSummary {
            batch: batch_id,
            batch_size: batch.len(),
            batch_mean: mean,
            batch_std: variance.sqrt(),
            batch_min: min,
            batch_max: max,
            cumulative_best,
            regret: self.library_best.map(|best| best - cumulative_best),
            completed_at: Utc::now(),
        })
    }

    /// All round summaries as one table
    pub fn summary_frame(&self, summaries: &[RoundSummary]) -> Result<DataFrame> {
        let batches: Vec<u32> = summaries.iter().map(|s| s.batch).collect();
        let sizes: Vec<u32> = summaries.iter().map(|s| s.batch_size as u32).collect();
        let means: Vec<f64> = summaries.iter().map(|s| s.batch_mean).collect();
        let stds: Vec<f64> = summaries.iter().map(|s| s.batch_std).collect();
        let maxs: Vec<f64> = summaries.iter().map(|s| s.batch_max).collect();
        let bests: Vec<f64> = summaries.iter().map(|s| s.cumulative_best).collect();
        let regrets: Vec<Option<f64>> = summaries.iter().map(|s| s.regret).collect();

        let df = df! {
            "batch" => batches,
            "batch_size" => sizes,
            "batch_mean" => means,
            "batch_std" => stds,
            "batch_max" => maxs,
            "cumulative_best" => bests,
            "regret" => regrets,
        }?;

        Ok(df)
    }
}
