use crate::error::{Result, SeqDesignError};
use crate::types::{BatchId, Observation, Sequence};
use polars::prelude::*;
use std::collections::HashSet;

/// Append-only table of everything measured so far.
///
/// Each design appears at most once; the set of measured sequences is
/// indexed by value so proposals can be checked against history cheaply.
#[derive(Debug, Clone, Default)]
pub struct ExperimentTable {
    observations: Vec<Observation>,
    measured: HashSet<Sequence>,
}

impl ExperimentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn contains(&self, sequence: &Sequence) -> bool {
        self.measured.contains(sequence)
    }

    pub fn measured_sequences(&self) -> &HashSet<Sequence> {
        &self.measured
    }

    pub fn append(&mut self, observation: Observation) -> Result<()> {
        if !self.measured.insert(observation.sequence.clone()) {
            return Err(SeqDesignError::Campaign(format!(
                "Design {} was already measured",
                observation.sequence
            )));
        }
        self.observations.push(observation);
        Ok(())
    }

    pub fn append_batch(&mut self, batch: Vec<Observation>) -> Result<()> {
        for observation in batch {
            self.append(observation)?;
        }
        Ok(())
    }

    /// Observations acquired by one round
    pub fn batch(&self, batch_id: BatchId) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|o| o.batch == batch_id)
            .collect()
    }

    /// Highest batch id present, if any
    pub fn last_batch(&self) -> Option<BatchId> {
        self.observations.iter().map(|o| o.batch).max()
    }

    /// Observation with the highest response
    pub fn best(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .max_by(|a, b| a.response.partial_cmp(&b.response).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Export the accumulated table for summaries and IO
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let sequences: Vec<String> = self.observations.iter().map(|o| o.sequence.to_string()).collect();
        let responses: Vec<f64> = self.observations.iter().map(|o| o.response).collect();
        let batches: Vec<u32> = self.observations.iter().map(|o| o.batch).collect();

        let df = df! {
            "sequence" => sequences,
            "response" => responses,
            "batch" => batches,
        }?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(s: &str, response: f64, batch: BatchId) -> Observation {
        Observation {
            sequence: Sequence::parse(s, 4).unwrap(),
            response,
            batch,
        }
    }

    #[test]
    fn test_append_and_lookup() {
        let mut table = ExperimentTable::new();
        table.append(obs("ACGT", 1.0, 0)).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains(&Sequence::parse("ACGT", 4).unwrap()));
        assert!(!table.contains(&Sequence::parse("TTTT", 4).unwrap()));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = ExperimentTable::new();
        table.append(obs("ACGT", 1.0, 0)).unwrap();
        assert!(table.append(obs("ACGT", 2.0, 1)).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_batch_slices() {
        let mut table = ExperimentTable::new();
        table
            .append_batch(vec![obs("AAAA", 0.1, 0), obs("CCCC", 0.2, 0), obs("GGGG", 0.9, 1)])
            .unwrap();
        assert_eq!(table.batch(0).len(), 2);
        assert_eq!(table.batch(1).len(), 1);
        assert_eq!(table.last_batch(), Some(1));
    }

    #[test]
    fn test_best() {
        let mut table = ExperimentTable::new();
        table
            .append_batch(vec![obs("AAAA", 0.1, 0), obs("GGGG", 0.9, 0)])
            .unwrap();
        assert_eq!(table.best().unwrap().sequence.to_string(), "GGGG");
    }

    #[test]
    fn test_to_dataframe() {
        let mut table = ExperimentTable::new();
        table
            .append_batch(vec![obs("AAAA", 0.1, 0), obs("GGGG", 0.9, 1)])
            .unwrap();
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }
}
