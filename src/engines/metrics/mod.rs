pub mod engine;

pub use engine::{MetricsEngine, RoundSummary};
