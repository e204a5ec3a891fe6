use crate::config::AppConfig;
use crate::data::MeasurementOracle;
use crate::engines::metrics::{MetricsEngine, RoundSummary};
use crate::engines::sampler::ThompsonSampler;
use crate::engines::search::{Constraint, ConstraintSet};
use crate::error::{Result, SeqDesignError};
use crate::experiment::ExperimentTable;
use crate::types::{BatchId, Nucleotide, Sequence};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

/// Observer hooks for the active-learning loop
pub trait ProgressCallback: Send {
    fn on_round_start(&mut self, round: BatchId);
    fn on_batch_proposed(&mut self, round: BatchId, batch: &[Sequence]);
    fn on_round_complete(&mut self, round: BatchId, summary: &RoundSummary);
}

/// Callback that does nothing; handy for tests
pub struct NullCallback;

impl ProgressCallback for NullCallback {
    fn on_round_start(&mut self, _round: BatchId) {}
    fn on_batch_proposed(&mut self, _round: BatchId, _batch: &[Sequence]) {}
    fn on_round_complete(&mut self, _round: BatchId, _summary: &RoundSummary) {}
}

// Lets callers keep their callback and inspect it after the run
impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_round_start(&mut self, round: BatchId) {
        (**self).on_round_start(round);
    }

    fn on_batch_proposed(&mut self, round: BatchId, batch: &[Sequence]) {
        (**self).on_batch_proposed(round, batch);
    }

    fn on_round_complete(&mut self, round: BatchId, summary: &RoundSummary) {
        (**self).on_round_complete(round, summary);
    }
}

#[derive(Debug)]
pub struct CampaignResult {
    pub table: ExperimentTable,
    pub summaries: Vec<RoundSummary>,
}

/// Drives the simulated experimentation loop: a random seed batch, then a
/// configured number of Thompson-sampling rounds, each measured through the
/// oracle and appended to the experiment table.
pub struct CampaignRunner {
    config: AppConfig,
    oracle: MeasurementOracle,
    sampler: ThompsonSampler,
    metrics: MetricsEngine,
    seed: u64,
}

impl CampaignRunner {
    pub fn new(config: AppConfig, oracle: MeasurementOracle) -> Result<Self> {
        config.validate()?;

        let schema = config.schema.design_schema();
        let blocks = config.schema.feature_blocks();
        let constraints = Self::base_constraints(&config, &oracle)?;

        let sampler = ThompsonSampler::new(
            schema,
            blocks,
            constraints,
            config.inference.clone(),
            config.search.clone(),
        )?;

        let metrics = MetricsEngine::new(oracle.best_response());
        let seed = config.campaign.seed.unwrap_or_else(|| rand::thread_rng().gen());

        Ok(Self {
            config,
            oracle,
            sampler,
            metrics,
            seed,
        })
    }

    /// Constraints shared by every round: stay inside the measurable
    /// library, plus whatever the campaign config asks for
    fn base_constraints(config: &AppConfig, oracle: &MeasurementOracle) -> Result<ConstraintSet> {
        let library: HashSet<Sequence> = oracle.library().cloned().collect();
        let mut constraints =
            ConstraintSet::new().with(Constraint::RestrictToLibrary(Arc::new(library)));

        if let Some((min, max)) = config.campaign.gc_bounds {
            constraints.push(Constraint::GcContent { min, max });
        }

        for motif in &config.campaign.forbidden_motifs {
            let bases = motif
                .chars()
                .map(|c| {
                    Nucleotide::from_char(c).ok_or_else(|| {
                        SeqDesignError::Configuration(format!(
                            "Forbidden motif '{}' contains a non-ACGT symbol",
                            motif
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            constraints.push(Constraint::ForbiddenMotif(bases));
        }

        Ok(constraints)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the full campaign
    pub fn run<C: ProgressCallback>(&self, mut callback: C) -> Result<CampaignResult> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut table = ExperimentTable::new();
        let mut summaries = Vec::with_capacity(self.config.campaign.rounds + 1);

        // Round 0: random seed batch from the library
        callback.on_round_start(0);
        let seed_batch: Vec<Sequence> = self
            .oracle
            .library()
            .cloned()
            .choose_multiple(&mut rng, self.config.campaign.seed_batch_size);
        if seed_batch.len() < self.config.campaign.seed_batch_size {
            return Err(SeqDesignError::Campaign(format!(
                "Library has only {} designs, seed batch needs {}",
                self.oracle.len(),
                self.config.campaign.seed_batch_size
            )));
        }
        callback.on_batch_proposed(0, &seed_batch);
        self.measure_round(&seed_batch, 0, &mut rng, &mut table, &mut summaries, &mut callback)?;

        // Thompson-sampling rounds
        for round in 1..=self.config.campaign.rounds as BatchId {
            callback.on_round_start(round);

            let round_seed = self
                .seed
                .wrapping_add(round as u64)
                .wrapping_mul(0xA076_1D64_78BD_642F);
            let batch =
                self.sampler
                    .propose(&table, self.config.campaign.batch_size, round_seed)?;
            callback.on_batch_proposed(round, &batch);

            self.measure_round(&batch, round, &mut rng, &mut table, &mut summaries, &mut callback)?;
        }

        Ok(CampaignResult { table, summaries })
    }

    fn measure_round<C: ProgressCallback>(
        &self,
        batch: &[Sequence],
        round: BatchId,
        rng: &mut StdRng,
        table: &mut ExperimentTable,
        summaries: &mut Vec<RoundSummary>,
        callback: &mut C,
    ) -> Result<()> {
        let observations = self.oracle.measure(batch, round, rng)?;
        table.append_batch(observations)?;

        let summary = self.metrics.summarize(table, round)?;
        log::info!(
            "Round {}: measured {} designs, batch max {:.3}, best so far {:.3}",
            round,
            summary.batch_size,
            summary.batch_max,
            summary.cumulative_best
        );
        callback.on_round_complete(round, &summary);
        summaries.push(summary);
        Ok(())
    }

    pub fn metrics(&self) -> &MetricsEngine {
        &self.metrics
    }
}
