pub mod metrics;
pub mod sampler;
pub mod search;
pub mod surrogate;
