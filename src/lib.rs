//! Thompson-sampling experimental design over fixed-length DNA sequences.
//!
//! A semi-synthetic binding-affinity dataset acts as the measurement
//! backend; the crate fits a Bayesian linear surrogate to everything
//! measured so far, draws from its posterior, and anneals each draw over
//! the constrained design space to propose the next batch.

pub mod campaign;
pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod experiment;
pub mod types;

pub use campaign::{CampaignResult, CampaignRunner, NullCallback, ProgressCallback};
pub use error::{Result, SeqDesignError};
